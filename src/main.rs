//! MABS CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use mabs::cli::{Cli, CommandDispatcher, Commands, WorkspaceOptions};
use mabs::config::find_project_root;
use mabs::ui::{create_ui, is_ci, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("mabs=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mabs=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("MABS starting with args: {:?}", cli);

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    // An explicit --project wins; otherwise walk up to the nearest `.mabs`.
    let cwd = std::env::current_dir().unwrap_or_default();
    let project_root = cli
        .project
        .clone()
        .or_else(|| find_project_root(&cwd))
        .unwrap_or(cwd);

    let is_interactive = match &cli.command {
        Some(Commands::Run(args)) => !args.non_interactive && !is_ci(),
        _ => !is_ci(),
    };

    let mut ui = create_ui(is_interactive, output_mode);

    let options = WorkspaceOptions {
        project_root,
        config: cli.config.clone(),
        repo: cli.repo.clone(),
    };
    let dispatcher = CommandDispatcher::new(options, is_interactive);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
