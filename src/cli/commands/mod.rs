//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`]. Commands share [`workspace`] for loading the
//! configuration and building the wizard's collaborators.

pub mod dispatcher;
pub mod list;
pub mod run;
pub mod status;
pub mod workspace;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use workspace::{Workspace, WorkspaceOptions, EXIT_CONFIG_MISSING};
