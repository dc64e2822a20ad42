//! Status command implementation.
//!
//! The `mabs status` command evaluates every step without submitting
//! anything and shows where each wizard would stop.

use crate::cli::args::StatusArgs;
use crate::error::{MabsError, Result};
use crate::messages::Message;
use crate::route::TaskName;
use crate::ui::UserInterface;
use crate::wizard::StepStatus;

use super::dispatcher::{Command, CommandResult};
use super::workspace::WorkspaceOptions;

/// The status command implementation.
pub struct StatusCommand {
    options: WorkspaceOptions,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(options: WorkspaceOptions, args: StatusArgs) -> Self {
        Self { options, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &StatusArgs {
        &self.args
    }

    fn selected(&self) -> Result<Vec<TaskName>> {
        match &self.args.task {
            Some(name) => Ok(vec![name.parse()?]),
            None => Ok(TaskName::ALL.to_vec()),
        }
    }
}

/// Icon for a step status.
pub fn status_icon(status: &StepStatus) -> &'static str {
    match status {
        StepStatus::Satisfied => "✓",
        StepStatus::NeedsInput(_) => "→",
        StepStatus::Fatal(_) => "✗",
        StepStatus::NotReached => "◌",
    }
}

/// Show one step line, plus what it is waiting for.
pub fn show_step_status(ui: &mut dyn UserInterface, name: &str, status: &StepStatus) {
    let line = format!("  {} {}", status_icon(status), name);
    match status {
        StepStatus::Satisfied => ui.success(&line),
        StepStatus::NeedsInput(form) => {
            ui.warning(&format!("{line} (waiting: {})", form.submit_label.text()));
        }
        StepStatus::Fatal(reason) => ui.error(&format!("{line}: {}", reason.text())),
        StepStatus::NotReached => ui.message(&line),
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let tasks = match self.selected() {
            Ok(tasks) => tasks,
            Err(e @ MabsError::NoSuchWizard { .. }) => {
                ui.error(&e.to_string());
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

        let mut all_done = true;
        for task in tasks {
            ui.show_header(&Message::new(task.title_key()).text());
            let report = engine.inspect(&ctx, task)?;
            all_done &= report
                .iter()
                .all(|(_, status)| *status == StepStatus::Satisfied);
            for (name, status) in &report {
                show_step_status(ui, name, status);
            }
        }

        if !all_done {
            ui.show_hint("Continue with `mabs run`.");
        }
        Ok(CommandResult::success())
    }
}
