//! Run command implementation.
//!
//! The `mabs run` command walks through a wizard starting at a route.

use crate::cli::args::RunArgs;
use crate::error::{MabsError, Result};
use crate::route::Route;
use crate::ui::UserInterface;
use crate::wizard::{RunResult, UiFormRenderer, WizardDriver};

use super::dispatcher::{Command, CommandResult};
use super::workspace::WorkspaceOptions;

/// Exit code when the user declined to continue.
pub const EXIT_STOPPED: i32 = 3;

/// The run command implementation.
pub struct RunCommand {
    options: WorkspaceOptions,
    args: RunArgs,
    interactive: bool,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(options: WorkspaceOptions, args: RunArgs, interactive: bool) -> Self {
        Self {
            options,
            args,
            interactive,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }
}

/// Exit code for a finished run.
pub fn exit_code(result: &RunResult) -> i32 {
    match result {
        RunResult::Completed { .. } => 0,
        RunResult::Stopped { .. } => EXIT_STOPPED,
        RunResult::Fatal { .. }
        | RunResult::Rejected { .. }
        | RunResult::Stalled { .. }
        | RunResult::TurnLimit { .. } => 1,
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let route = match Route::parse(&self.args.route) {
            Ok(route) => route,
            Err(e @ MabsError::NoSuchWizard { .. }) => {
                ui.error(&e.to_string());
                ui.show_hint("Known wizards: setup, import, export");
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        let workspace = match self.options.load_or_report(ui)? {
            Ok(workspace) => workspace,
            Err(result) => return Ok(result),
        };
        let engine = workspace.engine()?;
        let ctx = workspace.context();

        let driver = WizardDriver::new(&engine, self.interactive)
            .with_max_turns(workspace.config.settings.max_turns);
        let result = {
            let mut renderer = UiFormRenderer::new(ui);
            driver.drive(&ctx, &route, &mut renderer)?
        };
        tracing::debug!("Wizard finished: {:?}", result);

        match &result {
            RunResult::Completed { .. } | RunResult::Fatal { .. } | RunResult::Rejected { .. } => {}
            RunResult::Stopped { task, step } => {
                ui.warning(&format!("Stopped at {task}/{step}."));
                ui.show_hint(&format!("Resume with `mabs run {task}/{step}`."));
            }
            RunResult::Stalled { task, step } => {
                ui.error(&format!("{task}/{step} did not change after submitting it."));
            }
            RunResult::TurnLimit { turns } => {
                ui.error(&format!("Gave up after {turns} requests."));
            }
        }

        let code = exit_code(&result);
        Ok(if code == 0 {
            CommandResult::success()
        } else {
            CommandResult::failure(code)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Message;
    use crate::route::TaskName;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn args(route: &str) -> RunArgs {
        RunArgs {
            route: route.to_string(),
            non_interactive: true,
        }
    }

    #[test]
    fn exit_codes() {
        let task = TaskName::Import;
        let step = "fetch".to_string();
        let reason = Message::new("mabs-import-fetch-error");

        assert_eq!(
            exit_code(&RunResult::Completed {
                task,
                message: Message::new("mabs-export-complete"),
            }),
            0
        );
        assert_eq!(
            exit_code(&RunResult::Stopped {
                task,
                step: step.clone()
            }),
            EXIT_STOPPED
        );
        assert_eq!(
            exit_code(&RunResult::Fatal {
                task,
                step: step.clone(),
                reason: reason.clone(),
            }),
            1
        );
        assert_eq!(
            exit_code(&RunResult::Rejected {
                task,
                step: step.clone(),
                reason,
            }),
            1
        );
        assert_eq!(exit_code(&RunResult::Stalled { task, step }), 1);
        assert_eq!(exit_code(&RunResult::TurnLimit { turns: 50 }), 1);
    }

    #[test]
    fn unknown_route_fails_before_loading_config() {
        let temp = TempDir::new().unwrap();
        let cmd = RunCommand::new(WorkspaceOptions::new(temp.path()), args("frobnicate"), false);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("frobnicate"));
        assert_eq!(ui.hints(), ["Known wizards: setup, import, export"]);
    }

    #[test]
    fn missing_config_exits_with_two() {
        let temp = TempDir::new().unwrap();
        let cmd = RunCommand::new(WorkspaceOptions::new(temp.path()), args("setup"), false);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".mabs")).unwrap();
        fs::write(temp.path().join(".mabs/config.yml"), "repo: /srv/repo\n").unwrap();
        let cmd = RunCommand::new(WorkspaceOptions::new(temp.path()), args("setup"), false);
        let mut ui = MockUI::new();

        assert!(matches!(
            cmd.execute(&mut ui),
            Err(MabsError::ConfigValidationError { .. })
        ));
    }
}
