//! List command implementation.
//!
//! The `mabs list` command lists wizards and their steps.

use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::messages::Message;
use crate::ui::theme::MabsTheme;
use crate::ui::UserInterface;
use crate::wizard::{SuccessAction, WizardEngine};

use super::dispatcher::{Command, CommandResult};
use super::workspace::WorkspaceOptions;

/// The list command implementation.
pub struct ListCommand {
    options: WorkspaceOptions,
    args: ListArgs,
}

/// One wizard as shown by `mabs list`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TaskListing {
    /// Route name.
    pub name: String,
    /// Human readable title.
    pub title: String,
    /// Step names in order.
    pub steps: Vec<String>,
    /// What happens once every step is done.
    pub then: String,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(options: WorkspaceOptions, args: ListArgs) -> Self {
        Self { options, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }
}

/// Describe every task of `engine`.
pub fn listings(engine: &WizardEngine) -> Vec<TaskListing> {
    engine
        .tasks()
        .map(|task| TaskListing {
            name: task.name.to_string(),
            title: Message::new(task.name.title_key()).text(),
            steps: task.step_names().map(str::to_string).collect(),
            then: match &task.on_success {
                SuccessAction::Render(message) => format!("show {}", message.key),
                SuccessAction::Redirect(route) => format!("go to {route}"),
                SuccessAction::Continue(next) => format!("continue with {next}"),
            },
        })
        .collect()
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = match self.options.load_or_report(ui)? {
            Ok(workspace) => workspace,
            Err(result) => return Ok(result),
        };
        let tasks = listings(&workspace.engine()?);

        if self.args.json {
            let json = serde_json::to_string_pretty(&tasks).map_err(anyhow::Error::from)?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        let theme = MabsTheme::new();
        for task in &tasks {
            ui.message(&format!(
                "  {} {}",
                theme.highlight.apply_to(&task.name),
                theme.dim.apply_to(format!("({})", task.title))
            ));
            ui.message(&format!("    {}", task.steps.join(" → ")));
            ui.message(&format!("    {}", theme.dim.apply_to(&task.then)));
        }

        Ok(CommandResult::success())
    }
}
