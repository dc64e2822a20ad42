//! Wizard routes.
//!
//! A route names a task and optionally a step inside it, mirroring the
//! `.../mabs/<task>[/<step>]` sub-page layout of the wiki special page.

use std::fmt;
use std::str::FromStr;

use crate::error::{MabsError, Result};

/// The wizards this crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskName {
    /// Create and initialize the bare repository.
    Setup,
    /// Connect the repository to the wiki and fetch its history.
    Import,
    /// Push the imported history somewhere else.
    Export,
}

impl TaskName {
    /// All tasks in chaining order.
    pub const ALL: [TaskName; 3] = [TaskName::Setup, TaskName::Import, TaskName::Export];

    /// Lower-case identifier used in routes.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskName::Setup => "setup",
            TaskName::Import => "import",
            TaskName::Export => "export",
        }
    }

    /// Message key of the task title.
    pub fn title_key(&self) -> String {
        format!("mabs-{}", self.as_str())
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskName {
    type Err = MabsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "setup" => Ok(TaskName::Setup),
            "import" => Ok(TaskName::Import),
            "export" => Ok(TaskName::Export),
            _ => Err(MabsError::NoSuchWizard {
                name: s.to_string(),
            }),
        }
    }
}

/// A task plus an optional step to jump to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Task to run.
    pub task: TaskName,
    /// Step to start scanning at, if any.
    pub step: Option<String>,
}

impl Route {
    /// Route to the start of a task.
    pub fn task(task: TaskName) -> Self {
        Self { task, step: None }
    }

    /// Route to a specific step of a task.
    pub fn step(task: TaskName, step: impl Into<String>) -> Self {
        Self {
            task,
            step: Some(step.into()),
        }
    }

    /// Parse `mabs/<task>[/<step>]` or `<task>[/<step>]`.
    ///
    /// An empty route (or a bare `mabs`) is the setup wizard, which is the
    /// entry point of the chain.
    pub fn parse(input: &str) -> Result<Self> {
        let mut segments: Vec<&str> = input
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if segments
            .first()
            .is_some_and(|s| s.eq_ignore_ascii_case("mabs"))
        {
            segments.remove(0);
        }

        match segments.as_slice() {
            [] => Ok(Route::task(TaskName::Setup)),
            [task] => Ok(Route::task(task.parse()?)),
            [task, step] => Ok(Route::step(task.parse()?, step.to_ascii_lowercase())),
            _ => Err(MabsError::NoSuchWizard {
                name: input.to_string(),
            }),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.step {
            Some(step) => write!(f, "mabs/{}/{}", self.task, step),
            None => write!(f, "mabs/{}", self.task),
        }
    }
}

impl FromStr for Route {
    type Err = MabsError;

    fn from_str(s: &str) -> Result<Self> {
        Route::parse(s)
    }
}
