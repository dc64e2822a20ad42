//! MABS - connect a wiki to a git repository, one wizard step at a time.
//!
//! Three wizards run in order: `setup` creates a bare repository,
//! `import` issues a service credential and fetches the wiki's history
//! through the `mediawiki::` remote helper, and `export` pushes that
//! history to another remote. Every step inspects the world first and
//! only asks for input when something is left to do, so a wizard can be
//! re-run at any point.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`credentials`] - Service credential storage
//! - [`error`] - Error types and result aliases
//! - [`git`] - Git plumbing behind a trait
//! - [`http`] - Wiki API access behind a trait
//! - [`messages`] - Message catalogue
//! - [`probe`] - Filesystem checks
//! - [`route`] - Wizard routes
//! - [`tasks`] - The built-in wizards and their steps
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`wizard`] - The step engine and its driver
//!
//! # Example
//!
//! ```
//! use mabs::route::{Route, TaskName};
//! use mabs::tasks::builtin_engine;
//! use mabs::wizard::WizardSettings;
//!
//! let settings = WizardSettings::new("/srv/repo", "https://wiki.example", "/w", "Example");
//! let engine = builtin_engine(&settings).unwrap();
//! let steps: Vec<_> = engine.task(TaskName::Setup).unwrap().step_names().collect();
//! assert_eq!(steps, ["dependency", "prepare", "initialize", "complete"]);
//!
//! let route = Route::parse("mabs/import/fetch").unwrap();
//! assert_eq!(route.task, TaskName::Import);
//! ```

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod git;
pub mod http;
pub mod messages;
pub mod probe;
pub mod route;
pub mod tasks;
pub mod ui;
pub mod wizard;

pub use error::{MabsError, Result};
