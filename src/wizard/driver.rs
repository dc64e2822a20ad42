//! Strings requests together into a full wizard run.
//!
//! Each form submission and each redirect starts a fresh [`Request`], the
//! way a browser would post a form or follow a `Location` header.

use crate::error::Result;
use crate::messages::Message;
use crate::route::{Route, TaskName};

use super::context::WizardContext;
use super::engine::{PendingForm, Request, Turn, WizardEngine};
use super::render::FormRenderer;

/// Default cap on requests per run.
pub const DEFAULT_MAX_TURNS: usize = 50;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    /// A task finished with its completion message.
    Completed { task: TaskName, message: Message },
    /// A step failed.
    Fatal {
        task: TaskName,
        step: String,
        reason: Message,
    },
    /// The user declined to submit a form.
    Stopped { task: TaskName, step: String },
    /// A submission changed nothing, so the same form came back.
    Stalled { task: TaskName, step: String },
    /// Submitted values failed validation and nobody can correct them.
    Rejected {
        task: TaskName,
        step: String,
        reason: Message,
    },
    /// Too many requests without finishing.
    TurnLimit { turns: usize },
}

impl RunResult {
    /// Whether the run reached a completion message.
    pub fn is_complete(&self) -> bool {
        matches!(self, RunResult::Completed { .. })
    }
}

/// Drives a [`WizardEngine`] through a [`FormRenderer`].
pub struct WizardDriver<'e> {
    engine: &'e WizardEngine,
    interactive: bool,
    max_turns: usize,
}

impl<'e> WizardDriver<'e> {
    /// Create a driver.
    ///
    /// Non-interactive drivers stop when a form comes back with a
    /// validation error or unchanged after a submission, since the same
    /// values would be submitted again.
    pub fn new(engine: &'e WizardEngine, interactive: bool) -> Self {
        Self {
            engine,
            interactive,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Override the request cap.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    /// Run from `route` until the wizard completes, fails or stops.
    pub fn drive(
        &self,
        ctx: &WizardContext<'_>,
        route: &Route,
        renderer: &mut dyn FormRenderer,
    ) -> Result<RunResult> {
        tracing::info!("Starting wizard at {}", route);
        let mut turn = self.engine.run_route(&mut Request::new(), ctx, route)?;
        let mut last_submitted: Option<PendingForm> = None;

        for _ in 0..self.max_turns {
            match turn {
                Turn::Complete { task, message } => {
                    renderer.complete(&message);
                    return Ok(RunResult::Completed { task, message });
                }
                Turn::Fatal { task, step, reason } => {
                    renderer.fatal(&reason);
                    return Ok(RunResult::Fatal { task, step, reason });
                }
                Turn::Redirect(next) => {
                    renderer.redirect(&next);
                    last_submitted = None;
                    turn = self.engine.run_route(&mut Request::new(), ctx, &next)?;
                }
                Turn::Form(pending) => {
                    if !self.interactive {
                        if let Some(reason) = pending.error {
                            renderer.fatal(&reason);
                            return Ok(RunResult::Rejected {
                                task: pending.task,
                                step: pending.step,
                                reason,
                            });
                        }
                        if last_submitted.as_ref() == Some(&pending) {
                            tracing::warn!(
                                "{}/{} unchanged after submission",
                                pending.task,
                                pending.step
                            );
                            return Ok(RunResult::Stalled {
                                task: pending.task,
                                step: pending.step,
                            });
                        }
                    }

                    let Some(values) = renderer.render(&pending)? else {
                        return Ok(RunResult::Stopped {
                            task: pending.task,
                            step: pending.step,
                        });
                    };

                    let mut spinner = renderer.begin_submit(&pending);
                    let next = self.engine.submit(
                        &mut Request::new(),
                        ctx,
                        pending.task,
                        &pending.step,
                        &values,
                    )?;
                    match &next {
                        Turn::Fatal { reason, .. } => spinner.finish_error(&reason.text()),
                        Turn::Form(retry) if retry.error.is_some() => {
                            spinner.finish_error(&pending.form.submit_label.text())
                        }
                        _ => spinner.finish_success(&pending.form.submit_label.text()),
                    }

                    last_submitted = Some(pending);
                    turn = next;
                }
            }
        }

        tracing::warn!("Wizard gave up after {} requests", self.max_turns);
        Ok(RunResult::TurnLimit {
            turns: self.max_turns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::builtin_engine;
    use crate::ui::{MockUI, SpinnerHandle};
    use crate::wizard::fixture::{Fixture, REPO};
    use crate::wizard::form::FormValues;
    use crate::wizard::render::UiFormRenderer;

    /// Renderer that records forms and submits their defaults.
    #[derive(Default)]
    struct Recorder {
        forms: Vec<String>,
        decline: bool,
    }

    impl FormRenderer for Recorder {
        fn render(&mut self, pending: &PendingForm) -> Result<Option<FormValues>> {
            self.forms.push(format!("{}/{}", pending.task, pending.step));
            if self.decline {
                return Ok(None);
            }
            Ok(Some(FormValues::defaults_of(&pending.form.descriptor)))
        }

        fn begin_submit(&mut self, _pending: &PendingForm) -> Box<dyn SpinnerHandle> {
            Box::new(crate::ui::MockSpinner::new())
        }

        fn complete(&mut self, _message: &Message) {}

        fn fatal(&mut self, _reason: &Message) {}
    }

    /// A repository that already went through setup and import.
    fn imported() -> Fixture {
        let fixture = Fixture::new().with_repo().serving("Example Wiki");
        fixture.git.set_remote("origin", &fixture.settings.remote_url());
        fixture.git.set_objects(12);
        fixture
    }

    #[test]
    fn declining_a_form_stops_the_run() {
        let fixture = Fixture::new();
        let engine = builtin_engine(&fixture.settings).unwrap();
        let mut renderer = Recorder {
            decline: true,
            ..Default::default()
        };

        let result = WizardDriver::new(&engine, true)
            .drive(&fixture.ctx(), &Route::task(TaskName::Setup), &mut renderer)
            .unwrap();

        assert_eq!(
            result,
            RunResult::Stopped {
                task: TaskName::Setup,
                step: "prepare".to_string()
            }
        );
    }

    #[test]
    fn unfixable_condition_stalls_non_interactive_run() {
        let fixture = Fixture::new();
        fixture.fs.add_dir(REPO, false);
        let engine = builtin_engine(&fixture.settings).unwrap();
        let mut renderer = Recorder::default();

        let result = WizardDriver::new(&engine, false)
            .drive(&fixture.ctx(), &Route::task(TaskName::Setup), &mut renderer)
            .unwrap();

        assert_eq!(
            result,
            RunResult::Stalled {
                task: TaskName::Setup,
                step: "prepare".to_string()
            }
        );
        assert_eq!(renderer.forms, ["setup/prepare"]);
    }

    #[test]
    fn interactive_run_hits_turn_limit_on_unfixable_condition() {
        let fixture = Fixture::new();
        let engine = builtin_engine(&fixture.settings).unwrap();
        let mut renderer = Recorder::default();

        let result = WizardDriver::new(&engine, true)
            .with_max_turns(3)
            .drive(&fixture.ctx(), &Route::task(TaskName::Setup), &mut renderer)
            .unwrap();

        assert_eq!(result, RunResult::TurnLimit { turns: 3 });
        assert_eq!(renderer.forms.len(), 3);
    }

    #[test]
    fn setup_redirects_through_to_export() {
        let fixture = imported();
        fixture.git.set_config(&fixture.settings.username_key(), "Admin@mabs");
        fixture.git.set_config(&fixture.settings.password_key(), "pw");
        fixture.credentials.seed("Admin", "mabs", "pw");
        let engine = builtin_engine(&fixture.settings).unwrap();
        let mut renderer = Recorder::default();

        let result = WizardDriver::new(&engine, false)
            .drive(&fixture.ctx(), &Route::task(TaskName::Setup), &mut renderer)
            .unwrap();

        // The export form has no destination yet, so the run stops there.
        assert_eq!(renderer.forms, ["setup/complete", "export/push"]);
        assert!(matches!(
            result,
            RunResult::Rejected { task: TaskName::Export, ref step, .. } if step == "push"
        ));
    }

    #[test]
    fn full_import_then_export_completes() {
        let fixture = Fixture::new().with_repo().serving("Example Wiki");
        let engine = builtin_engine(&fixture.settings).unwrap();
        let mut ui = MockUI::new();
        ui.set_prompt_response("remote", "https://git.example/wiki.git");

        let result = {
            let mut renderer = UiFormRenderer::new(&mut ui);
            WizardDriver::new(&engine, false)
                .drive(&fixture.ctx(), &Route::task(TaskName::Import), &mut renderer)
                .unwrap()
        };

        assert_eq!(
            result,
            RunResult::Completed {
                task: TaskName::Export,
                message: Message::new("mabs-export-complete"),
            }
        );
        assert!(fixture
            .git
            .ran("remote add origin mediawiki::https://wiki.example/w/api.php"));
        assert!(fixture.git.ran("fetch origin"));
        assert!(fixture
            .git
            .ran("remote add other https://git.example/wiki.git"));
        assert!(fixture
            .git
            .ran("push other refs/remotes/origin/*:refs/heads/*"));
        assert!(ui.has_success("The wiki's history has been exported."));
        assert_eq!(
            ui.headers(),
            ["Import wiki content", "Export to another repository"]
        );
    }

    #[test]
    fn fatal_outcome_ends_the_run() {
        let fixture = imported();
        fixture.git.set_objects(0);
        fixture.git.fail("fetch", "fatal: unable to access");
        fixture.git.set_config(&fixture.settings.username_key(), "Admin@mabs");
        fixture.git.set_config(&fixture.settings.password_key(), "pw");
        fixture.credentials.seed("Admin", "mabs", "pw");
        let engine = builtin_engine(&fixture.settings).unwrap();
        let mut renderer = Recorder::default();

        let result = WizardDriver::new(&engine, false)
            .drive(&fixture.ctx(), &Route::task(TaskName::Import), &mut renderer)
            .unwrap();

        assert!(matches!(
            result,
            RunResult::Fatal { ref step, ref reason, .. }
                if step == "fetch" && reason.key == "mabs-config-import-fetch-error"
        ));
    }
}
