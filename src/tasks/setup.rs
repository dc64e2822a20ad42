//! Setup wizard: check for git, then create the bare repository.

use crate::messages::Message;
use crate::route::{Route, TaskName};
use crate::wizard::{FormValues, Outcome, StepHandler, StepState, WizardContext};

use super::{info_form, problem_form};

/// Git must be runnable.
pub struct DependencyStep;

impl StepHandler for DependencyStep {
    fn evaluate(&self, ctx: &WizardContext<'_>) -> StepState {
        match ctx.git.version() {
            Ok(version) => {
                tracing::debug!("Found {}", version.trim());
                StepState::Satisfied
            }
            Err(e) => {
                tracing::warn!("git is not usable: {}", e);
                StepState::NeedsInput(problem_form(
                    "dependency",
                    Message::new("mabs-dependency-gitlib").param(&ctx.settings.git_binary),
                ))
            }
        }
    }

    fn submit(&self, _ctx: &WizardContext<'_>, _values: &FormValues) -> Outcome {
        Outcome::Success
    }
}

/// The repository directory must exist, be a directory and be writable.
///
/// Nothing here can be fixed from the wizard; the form only describes
/// the problem.
pub struct PrepareStep;

impl StepHandler for PrepareStep {
    fn evaluate(&self, ctx: &WizardContext<'_>) -> StepState {
        let repo = ctx.repo();
        let path = repo.display().to_string();

        let problem = if !ctx.fs.exists(repo) {
            "mabs-config-please-fix-exists"
        } else if !ctx.fs.is_dir(repo) {
            "mabs-config-please-fix-directory"
        } else if !ctx.fs.is_writable(repo) {
            "mabs-config-please-fix-writable"
        } else {
            return StepState::Satisfied;
        };

        StepState::NeedsInput(problem_form("prepare", Message::new(problem).param(path)))
    }

    fn submit(&self, _ctx: &WizardContext<'_>, _values: &FormValues) -> Outcome {
        Outcome::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepoCondition {
    Ready,
    NotADirectory,
    DirNotWritable,
    ConfigNotWritable,
    Missing,
}

fn repo_condition(ctx: &WizardContext<'_>) -> RepoCondition {
    let repo = ctx.repo();
    let config = ctx.settings.config_file();

    if ctx.fs.exists(repo) && !ctx.fs.is_dir(repo) {
        RepoCondition::NotADirectory
    } else if !ctx.fs.is_writable(repo) {
        RepoCondition::DirNotWritable
    } else if !ctx.fs.exists(&config) {
        RepoCondition::Missing
    } else if !ctx.fs.is_writable(&config) {
        RepoCondition::ConfigNotWritable
    } else {
        RepoCondition::Ready
    }
}

/// A bare repository must exist with a writable config file.
pub struct InitializeStep;

impl StepHandler for InitializeStep {
    fn evaluate(&self, ctx: &WizardContext<'_>) -> StepState {
        let repo = ctx.repo().display().to_string();
        let config = ctx.settings.config_file().display().to_string();

        let form = match repo_condition(ctx) {
            RepoCondition::Ready => return StepState::Satisfied,
            RepoCondition::NotADirectory => problem_form(
                "initialize",
                Message::new("mabs-config-please-fix-directory").param(repo),
            ),
            RepoCondition::DirNotWritable => info_form(
                "initialize",
                Message::new("mabs-config-gitdir-not-writable").param(repo),
                "mabs-config-try-again",
            ),
            RepoCondition::ConfigNotWritable => info_form(
                "initialize",
                Message::new("mabs-config-not-writable")
                    .param(repo)
                    .param(config),
                "mabs-config-try-again",
            ),
            RepoCondition::Missing => info_form(
                "initialize",
                Message::new("mabs-config-not-exists").param(repo),
                "mabs-config-create",
            ),
        };
        StepState::NeedsInput(form)
    }

    fn submit(&self, ctx: &WizardContext<'_>, _values: &FormValues) -> Outcome {
        if repo_condition(ctx) != RepoCondition::Missing {
            return Outcome::Success;
        }

        match ctx.git.init_bare(ctx.repo()) {
            Ok(output) => {
                tracing::info!("{}", output.trim());
                Outcome::Success
            }
            Err(e) => {
                Outcome::Fatal(Message::new("mabs-config-init-repo").param(e.to_string()))
            }
        }
    }
}

/// Last page of the setup wizard; continuing moves on to the import.
pub struct CompleteStep;

impl StepHandler for CompleteStep {
    fn evaluate(&self, _ctx: &WizardContext<'_>) -> StepState {
        StepState::NeedsInput(info_form(
            "complete",
            Message::new("mabs-config-complete"),
            "mabs-config-continue",
        ))
    }

    fn submit(&self, _ctx: &WizardContext<'_>, _values: &FormValues) -> Outcome {
        Outcome::Redirect(Route::task(TaskName::Import))
    }
}
