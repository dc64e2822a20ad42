//! The step-scanning wizard engine.
//!
//! One call to [`WizardEngine::run`] or [`WizardEngine::submit`] is one
//! request: the engine re-evaluates steps from live state, stops at the
//! first step that needs input and reports what to show next as a
//! [`Turn`]. Nothing is remembered between requests except what the
//! handlers wrote to the filesystem, git config or credential store.

use std::collections::BTreeMap;

use crate::error::{MabsError, Result};
use crate::messages::Message;
use crate::route::{Route, TaskName};

use super::context::WizardContext;
use super::form::{FormValues, StepForm};
use super::handler::HandlerRegistry;
use super::state::{Outcome, Reason, StepState};
use super::task::{SuccessAction, Task, TaskDefinition};

/// A form waiting for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingForm {
    /// Task the form belongs to.
    pub task: TaskName,
    /// Step the form belongs to.
    pub step: String,
    /// The form and its submit label.
    pub form: StepForm,
    /// Validation error from the previous submission.
    pub error: Option<Reason>,
}

/// What one request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Show a form and wait for a submission.
    Form(PendingForm),
    /// The wizard cannot continue.
    Fatal {
        task: TaskName,
        step: String,
        reason: Reason,
    },
    /// Go to another route.
    Redirect(Route),
    /// The task finished with a completion message.
    Complete { task: TaskName, message: Message },
}

/// Per-request bookkeeping.
///
/// Records the tasks whose success action already ran, so a task chain
/// that loops back on itself fails instead of recursing forever.
#[derive(Debug, Default)]
pub struct Request {
    succeeded: Vec<TaskName>,
}

impl Request {
    /// Start a request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks that completed during this request, in order.
    pub fn succeeded(&self) -> &[TaskName] {
        &self.succeeded
    }

    fn enter_success(&mut self, task: TaskName) -> Result<()> {
        if self.succeeded.contains(&task) {
            return Err(MabsError::configuration(format!(
                "task '{task}' reached its success action twice in one request"
            )));
        }
        self.succeeded.push(task);
        Ok(())
    }
}

/// Result of inspecting one step without rendering anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// Nothing to do.
    Satisfied,
    /// Waiting for input with this form.
    NeedsInput(StepForm),
    /// Cannot be evaluated.
    Fatal(Reason),
    /// Behind an earlier unsatisfied step.
    NotReached,
}

/// Resolved tasks, keyed by name.
#[derive(Debug, Clone)]
pub struct WizardEngine {
    tasks: BTreeMap<TaskName, Task>,
}

impl WizardEngine {
    /// Resolve every definition against `registry`.
    ///
    /// A task defined twice, or any error from
    /// [`TaskDefinition::resolve`], fails construction.
    pub fn new(definitions: &[TaskDefinition], registry: &HandlerRegistry) -> Result<Self> {
        let mut tasks = BTreeMap::new();
        for definition in definitions {
            let task = definition.resolve(registry)?;
            if tasks.insert(task.name, task).is_some() {
                return Err(MabsError::configuration(format!(
                    "task '{}' is defined twice",
                    definition.name
                )));
            }
        }
        Ok(Self { tasks })
    }

    /// Look up a task.
    pub fn task(&self, name: TaskName) -> Result<&Task> {
        self.tasks.get(&name).ok_or_else(|| MabsError::NoSuchWizard {
            name: name.to_string(),
        })
    }

    /// Defined tasks in chaining order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Scan `task`, starting at `requested_step` when given.
    pub fn run(
        &self,
        request: &mut Request,
        ctx: &WizardContext<'_>,
        task: TaskName,
        requested_step: Option<&str>,
    ) -> Result<Turn> {
        let task = self.task(task)?;
        let start = match requested_step {
            Some(step) => task.step(step)?.0,
            None => 0,
        };
        self.scan(request, ctx, task, start)
    }

    /// Run [`run`](Self::run) for a route.
    pub fn run_route(
        &self,
        request: &mut Request,
        ctx: &WizardContext<'_>,
        route: &Route,
    ) -> Result<Turn> {
        self.run(request, ctx, route.task, route.step.as_deref())
    }

    /// Hand submitted values to a step and decide what comes next.
    pub fn submit(
        &self,
        request: &mut Request,
        ctx: &WizardContext<'_>,
        task: TaskName,
        step: &str,
        values: &FormValues,
    ) -> Result<Turn> {
        let task = self.task(task)?;
        let (_, bound) = task.step(step)?;

        tracing::info!("Submitting {}/{}", task.name, bound.name);
        match bound.handler.submit(ctx, values) {
            Outcome::Success => self.scan(request, ctx, task, 0),
            Outcome::Retry(reason) => {
                tracing::debug!("{}/{} rejected input: {}", task.name, bound.name, reason.key);
                match bound.handler.evaluate(ctx).normalized() {
                    StepState::NeedsInput(form) => Ok(Turn::Form(PendingForm {
                        task: task.name,
                        step: bound.name.clone(),
                        form,
                        error: Some(reason),
                    })),
                    StepState::Satisfied => self.scan(request, ctx, task, 0),
                    StepState::Fatal(fatal) => Ok(fatal_turn(task, &bound.name, fatal)),
                }
            }
            Outcome::Fatal(reason) => Ok(fatal_turn(task, &bound.name, reason)),
            Outcome::Redirect(route) => {
                tracing::debug!("{}/{} redirects to {}", task.name, bound.name, route);
                Ok(Turn::Redirect(route))
            }
        }
    }

    /// Evaluate steps up to the first unsatisfied one and report each.
    pub fn inspect(
        &self,
        ctx: &WizardContext<'_>,
        task: TaskName,
    ) -> Result<Vec<(String, StepStatus)>> {
        let task = self.task(task)?;
        let mut blocked = false;
        let mut report = Vec::with_capacity(task.steps.len());

        for step in &task.steps {
            let status = if blocked {
                StepStatus::NotReached
            } else {
                match step.handler.evaluate(ctx).normalized() {
                    StepState::Satisfied => StepStatus::Satisfied,
                    StepState::NeedsInput(form) => {
                        blocked = true;
                        StepStatus::NeedsInput(form)
                    }
                    StepState::Fatal(reason) => {
                        blocked = true;
                        StepStatus::Fatal(reason)
                    }
                }
            };
            report.push((step.name.clone(), status));
        }

        Ok(report)
    }

    fn scan(
        &self,
        request: &mut Request,
        ctx: &WizardContext<'_>,
        task: &Task,
        start: usize,
    ) -> Result<Turn> {
        for step in &task.steps[start..] {
            tracing::debug!("Evaluating {}/{}", task.name, step.name);
            match step.handler.evaluate(ctx).normalized() {
                StepState::Satisfied => continue,
                StepState::NeedsInput(form) => {
                    return Ok(Turn::Form(PendingForm {
                        task: task.name,
                        step: step.name.clone(),
                        form,
                        error: None,
                    }))
                }
                StepState::Fatal(reason) => return Ok(fatal_turn(task, &step.name, reason)),
            }
        }

        self.finish(request, ctx, task)
    }

    fn finish(&self, request: &mut Request, ctx: &WizardContext<'_>, task: &Task) -> Result<Turn> {
        request.enter_success(task.name)?;
        tracing::info!("Task {} complete", task.name);

        match &task.on_success {
            SuccessAction::Render(message) => Ok(Turn::Complete {
                task: task.name,
                message: message.clone(),
            }),
            SuccessAction::Redirect(route) => Ok(Turn::Redirect(route.clone())),
            SuccessAction::Continue(next) => {
                let next = self.task(*next)?;
                self.scan(request, ctx, next, 0)
            }
        }
    }
}

fn fatal_turn(task: &Task, step: &str, reason: Reason) -> Turn {
    tracing::warn!("{}/{} failed: {}", task.name, step, reason);
    Turn::Fatal {
        task: task.name,
        step: step.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::fixture::Fixture;
    use crate::wizard::form::{Field, FormDescriptor};
    use crate::wizard::handler::StepHandler;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Handler whose state and submit outcome tests flip by hand.
    struct Scripted {
        name: &'static str,
        satisfied: AtomicBool,
        fatal: AtomicBool,
        satisfy_on_submit: AtomicBool,
        evaluations: AtomicUsize,
        submissions: AtomicUsize,
        outcome: Mutex<Outcome>,
    }

    impl Scripted {
        fn new(name: &'static str, satisfied: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                satisfied: AtomicBool::new(satisfied),
                fatal: AtomicBool::new(false),
                satisfy_on_submit: AtomicBool::new(true),
                evaluations: AtomicUsize::new(0),
                submissions: AtomicUsize::new(0),
                outcome: Mutex::new(Outcome::Success),
            })
        }

        fn answer(&self, outcome: Outcome) {
            *self.outcome.lock().unwrap() = outcome;
        }

        fn evaluations(&self) -> usize {
            self.evaluations.load(Ordering::SeqCst)
        }

        fn form(&self) -> StepForm {
            StepForm::new(
                FormDescriptor::for_step(self.name)
                    .field("info", Field::info(Message::new("mabs-config-fix-problems"))),
                Message::new("mabs-config-try-again"),
            )
        }
    }

    impl StepHandler for Scripted {
        fn evaluate(&self, _ctx: &WizardContext<'_>) -> StepState {
            self.evaluations.fetch_add(1, Ordering::SeqCst);
            if self.fatal.load(Ordering::SeqCst) {
                StepState::Fatal(Message::new("mabs-config-count-objects-error"))
            } else if self.satisfied.load(Ordering::SeqCst) {
                StepState::Satisfied
            } else {
                StepState::NeedsInput(self.form())
            }
        }

        fn submit(&self, _ctx: &WizardContext<'_>, _values: &FormValues) -> Outcome {
            self.submissions.fetch_add(1, Ordering::SeqCst);
            let outcome = self.outcome.lock().unwrap().clone();
            if outcome == Outcome::Success && self.satisfy_on_submit.load(Ordering::SeqCst) {
                self.satisfied.store(true, Ordering::SeqCst);
            }
            outcome
        }
    }

    fn done() -> SuccessAction {
        SuccessAction::Render(Message::new("mabs-export-complete"))
    }

    fn engine(steps: &[Arc<Scripted>], on_success: SuccessAction) -> WizardEngine {
        let mut registry = HandlerRegistry::new();
        for step in steps {
            registry.register(TaskName::Export, step.name, step.clone());
        }
        let names: Vec<&str> = steps.iter().map(|s| s.name).collect();
        WizardEngine::new(
            &[TaskDefinition::new(TaskName::Export, names, on_success)],
            &registry,
        )
        .unwrap()
    }

    #[test]
    fn all_satisfied_completes_once_without_forms() {
        let fixture = Fixture::new();
        let steps = [Scripted::new("a", true), Scripted::new("b", true)];
        let engine = engine(&steps, done());
        let mut request = Request::new();

        let turn = engine
            .run(&mut request, &fixture.ctx(), TaskName::Export, None)
            .unwrap();

        assert_eq!(
            turn,
            Turn::Complete {
                task: TaskName::Export,
                message: Message::new("mabs-export-complete")
            }
        );
        assert_eq!(request.succeeded(), [TaskName::Export]);
        assert!(steps.iter().all(|s| s.evaluations() == 1));
    }

    #[test]
    fn first_unsatisfied_step_stops_the_scan() {
        let fixture = Fixture::new();
        let steps = [
            Scripted::new("a", true),
            Scripted::new("b", false),
            Scripted::new("c", false),
        ];
        let engine = engine(&steps, done());

        let turn = engine
            .run(&mut Request::new(), &fixture.ctx(), TaskName::Export, None)
            .unwrap();

        let pending = match turn {
            Turn::Form(pending) => pending,
            other => panic!("expected a form, got {other:?}"),
        };
        assert_eq!(pending.step, "b");
        assert_eq!(pending.error, None);
        assert_eq!(steps[2].evaluations(), 0);
    }

    #[test]
    fn rescanning_unchanged_state_is_idempotent() {
        let fixture = Fixture::new();
        let steps = [Scripted::new("a", true), Scripted::new("b", false)];
        let engine = engine(&steps, done());

        let first = engine
            .run(&mut Request::new(), &fixture.ctx(), TaskName::Export, None)
            .unwrap();
        let second = engine
            .run(&mut Request::new(), &fixture.ctx(), TaskName::Export, None)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fatal_evaluation_stops_the_scan() {
        let fixture = Fixture::new();
        let steps = [Scripted::new("a", true), Scripted::new("b", true)];
        steps[0].fatal.store(true, Ordering::SeqCst);
        let engine = engine(&steps, done());

        let turn = engine
            .run(&mut Request::new(), &fixture.ctx(), TaskName::Export, None)
            .unwrap();
        assert!(matches!(turn, Turn::Fatal { ref step, .. } if step == "a"));
        assert_eq!(steps[1].evaluations(), 0);
    }

    #[test]
    fn success_action_looping_back_is_a_configuration_error() {
        let fixture = Fixture::new();
        let steps = [Scripted::new("a", true)];
        let engine = engine(&steps, SuccessAction::Continue(TaskName::Export));

        let err = engine
            .run(&mut Request::new(), &fixture.ctx(), TaskName::Export, None)
            .unwrap_err();
        assert!(matches!(err, MabsError::Configuration { .. }));
        assert_eq!(steps[0].evaluations(), 2);
    }

    #[test]
    fn cycle_across_tasks_is_caught() {
        let fixture = Fixture::new();
        let a = Scripted::new("a", true);
        let b = Scripted::new("b", true);
        let mut registry = HandlerRegistry::new();
        registry.register(TaskName::Setup, "a", a.clone());
        registry.register(TaskName::Import, "b", b.clone());
        let engine = WizardEngine::new(
            &[
                TaskDefinition::new(
                    TaskName::Setup,
                    ["a"],
                    SuccessAction::Continue(TaskName::Import),
                ),
                TaskDefinition::new(
                    TaskName::Import,
                    ["b"],
                    SuccessAction::Continue(TaskName::Setup),
                ),
            ],
            &registry,
        )
        .unwrap();

        let mut request = Request::new();
        let err = engine
            .run(&mut request, &fixture.ctx(), TaskName::Setup, None)
            .unwrap_err();
        assert!(matches!(err, MabsError::Configuration { .. }));
        assert_eq!(request.succeeded(), [TaskName::Setup, TaskName::Import]);
    }

    #[test]
    fn continue_chains_within_one_request() {
        let fixture = Fixture::new();
        let a = Scripted::new("a", true);
        let b = Scripted::new("b", false);
        let mut registry = HandlerRegistry::new();
        registry.register(TaskName::Setup, "a", a.clone());
        registry.register(TaskName::Import, "b", b.clone());
        let engine = WizardEngine::new(
            &[
                TaskDefinition::new(
                    TaskName::Setup,
                    ["a"],
                    SuccessAction::Continue(TaskName::Import),
                ),
                TaskDefinition::new(TaskName::Import, ["b"], done()),
            ],
            &registry,
        )
        .unwrap();

        let turn = engine
            .run(&mut Request::new(), &fixture.ctx(), TaskName::Setup, None)
            .unwrap();
        assert!(matches!(turn, Turn::Form(ref p) if p.task == TaskName::Import && p.step == "b"));
    }

    #[test]
    fn redirect_success_action() {
        let fixture = Fixture::new();
        let steps = [Scripted::new("a", true)];
        let engine = engine(&steps, SuccessAction::Redirect(Route::task(TaskName::Setup)));
        let turn = engine
            .run(&mut Request::new(), &fixture.ctx(), TaskName::Export, None)
            .unwrap();
        assert_eq!(turn, Turn::Redirect(Route::task(TaskName::Setup)));
    }

    #[test]
    fn requested_step_skips_earlier_steps() {
        let fixture = Fixture::new();
        let steps = [Scripted::new("a", false), Scripted::new("b", false)];
        let engine = engine(&steps, done());

        let turn = engine
            .run(&mut Request::new(), &fixture.ctx(), TaskName::Export, Some("b"))
            .unwrap();
        assert!(matches!(turn, Turn::Form(ref p) if p.step == "b"));
        assert_eq!(steps[0].evaluations(), 0);
    }

    #[test]
    fn unknown_requested_step_is_a_configuration_error() {
        let fixture = Fixture::new();
        let engine = engine(&[Scripted::new("a", true)], done());
        let err = engine
            .run(&mut Request::new(), &fixture.ctx(), TaskName::Export, Some("zzz"))
            .unwrap_err();
        assert!(matches!(err, MabsError::Configuration { .. }));
    }

    #[test]
    fn undefined_task_has_no_wizard() {
        let fixture = Fixture::new();
        let engine = engine(&[Scripted::new("a", true)], done());
        let err = engine
            .run(&mut Request::new(), &fixture.ctx(), TaskName::Setup, None)
            .unwrap_err();
        assert!(matches!(err, MabsError::NoSuchWizard { .. }));
    }

    #[test]
    fn task_defined_twice_fails() {
        let a = Scripted::new("a", true);
        let registry = {
            let mut r = HandlerRegistry::new();
            r.register(TaskName::Export, "a", a);
            r
        };
        let def = TaskDefinition::new(TaskName::Export, ["a"], done());
        let err = WizardEngine::new(&[def.clone(), def], &registry).unwrap_err();
        assert!(err.to_string().contains("defined twice"));
    }

    #[test]
    fn successful_submit_rescans_from_the_top() {
        let fixture = Fixture::new();
        let steps = [Scripted::new("a", true), Scripted::new("b", false)];
        let engine = engine(&steps, done());

        let turn = engine
            .submit(
                &mut Request::new(),
                &fixture.ctx(),
                TaskName::Export,
                "b",
                &FormValues::new(),
            )
            .unwrap();

        assert!(matches!(turn, Turn::Complete { .. }));
        assert_eq!(steps[0].evaluations(), 1);
        assert_eq!(steps[1].submissions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn retry_shows_same_step_with_error() {
        let fixture = Fixture::new();
        let steps = [Scripted::new("a", false)];
        steps[0].answer(Outcome::retry("mabs-config-export-remote-needed"));
        let engine = engine(&steps, done());

        let turn = engine
            .submit(
                &mut Request::new(),
                &fixture.ctx(),
                TaskName::Export,
                "a",
                &FormValues::new(),
            )
            .unwrap();

        let pending = match turn {
            Turn::Form(pending) => pending,
            other => panic!("expected a form, got {other:?}"),
        };
        assert_eq!(pending.step, "a");
        assert_eq!(
            pending.error,
            Some(Message::new("mabs-config-export-remote-needed"))
        );
    }

    #[test]
    fn fatal_submit_aborts() {
        let fixture = Fixture::new();
        let steps = [Scripted::new("a", false), Scripted::new("b", false)];
        steps[0].answer(Outcome::fatal("mabs-config-export-push-error"));
        let engine = engine(&steps, done());

        let turn = engine
            .submit(
                &mut Request::new(),
                &fixture.ctx(),
                TaskName::Export,
                "a",
                &FormValues::new(),
            )
            .unwrap();
        assert_eq!(
            turn,
            Turn::Fatal {
                task: TaskName::Export,
                step: "a".to_string(),
                reason: Message::new("mabs-config-export-push-error"),
            }
        );
        assert_eq!(steps[1].evaluations(), 0);
    }

    #[test]
    fn redirect_submit_leaves_the_task() {
        let fixture = Fixture::new();
        let steps = [Scripted::new("a", false)];
        steps[0].answer(Outcome::Redirect(Route::task(TaskName::Import)));
        let engine = engine(&steps, done());

        let turn = engine
            .submit(
                &mut Request::new(),
                &fixture.ctx(),
                TaskName::Export,
                "a",
                &FormValues::new(),
            )
            .unwrap();
        assert_eq!(turn, Turn::Redirect(Route::task(TaskName::Import)));
    }

    #[test]
    fn inspect_marks_steps_behind_a_blocker() {
        let fixture = Fixture::new();
        let steps = [
            Scripted::new("a", true),
            Scripted::new("b", false),
            Scripted::new("c", true),
        ];
        let engine = engine(&steps, done());

        let report = engine.inspect(&fixture.ctx(), TaskName::Export).unwrap();
        assert_eq!(report[0], ("a".to_string(), StepStatus::Satisfied));
        assert!(matches!(report[1].1, StepStatus::NeedsInput(_)));
        assert_eq!(report[2], ("c".to_string(), StepStatus::NotReached));
        assert_eq!(steps[2].evaluations(), 0);
    }

    /// Handler that always asks with a form carrying no fields.
    struct FieldlessForm;

    impl StepHandler for FieldlessForm {
        fn evaluate(&self, _ctx: &WizardContext<'_>) -> StepState {
            StepState::NeedsInput(StepForm::new(
                FormDescriptor::for_step("blank"),
                Message::new("mabs-config-continue"),
            ))
        }

        fn submit(&self, _ctx: &WizardContext<'_>, _values: &FormValues) -> Outcome {
            Outcome::retry("mabs-config-invalid-url")
        }
    }

    fn fieldless_engine() -> WizardEngine {
        let registry = HandlerRegistry::new().with(TaskName::Export, "blank", FieldlessForm);
        WizardEngine::new(
            &[TaskDefinition::new(TaskName::Export, ["blank"], done())],
            &registry,
        )
        .unwrap()
    }

    #[test]
    fn form_without_fields_counts_as_satisfied() {
        let fixture = Fixture::new();
        let engine = fieldless_engine();

        let turn = engine
            .run(&mut Request::new(), &fixture.ctx(), TaskName::Export, None)
            .unwrap();
        assert!(matches!(turn, Turn::Complete { .. }));

        let report = engine.inspect(&fixture.ctx(), TaskName::Export).unwrap();
        assert_eq!(report, [("blank".to_string(), StepStatus::Satisfied)]);
    }

    #[test]
    fn retry_into_a_form_without_fields_moves_on() {
        let fixture = Fixture::new();
        let engine = fieldless_engine();

        let turn = engine
            .submit(
                &mut Request::new(),
                &fixture.ctx(),
                TaskName::Export,
                "blank",
                &FormValues::new(),
            )
            .unwrap();
        assert!(matches!(turn, Turn::Complete { .. }));
    }
}
