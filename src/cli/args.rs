//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MABS - connect a wiki to a git repository, one wizard step at a time.
#[derive(Debug, Parser)]
#[command(name = "mabs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .mabs/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Path of the bare repository (overrides `repo` in the config)
    #[arg(long, global = true, env = "MABS_REPO")]
    pub repo: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Walk through a wizard (default if no command specified)
    Run(RunArgs),

    /// Show which steps of a wizard are done
    Status(StatusArgs),

    /// List wizards and their steps
    List(ListArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Where to start, e.g. `setup`, `import/fetch` or `mabs/export`
    #[arg(default_value = "setup")]
    pub route: String,

    /// Use defaults and MABS_PROMPT_* variables, no prompts
    #[arg(long)]
    pub non_interactive: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            route: "setup".to_string(),
            non_interactive: false,
        }
    }
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Wizard to inspect (all wizards when omitted)
    pub task: Option<String>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
