//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::Path;

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::error::Result;
use crate::ui::UserInterface;

use super::workspace::WorkspaceOptions;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, reporting success or failure and an exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    options: WorkspaceOptions,
    interactive: bool,
}

impl CommandDispatcher {
    /// Create a new dispatcher.
    ///
    /// `interactive` is false in CI; `run --non-interactive` can only
    /// narrow it further.
    pub fn new(options: WorkspaceOptions, interactive: bool) -> Self {
        Self {
            options,
            interactive,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.options.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Run(args)) => self.run(args.clone(), ui),
            Some(Commands::Status(args)) => {
                let cmd = super::status::StatusCommand::new(self.options.clone(), args.clone());
                cmd.execute(ui)
            }
            Some(Commands::List(args)) => {
                let cmd = super::list::ListCommand::new(self.options.clone(), args.clone());
                cmd.execute(ui)
            }
            None => self.run(RunArgs::default(), ui),
        }
    }

    fn run(&self, args: RunArgs, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let interactive = self.interactive && !args.non_interactive;
        let cmd = super::run::RunCommand::new(self.options.clone(), args, interactive);
        cmd.execute(ui)
    }
}
