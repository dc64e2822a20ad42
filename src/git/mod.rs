//! Git plumbing.
//!
//! The wizard never touches repository internals itself; every question it
//! asks about the repository goes through [`GitClient`]. [`GitCli`] shells
//! out to the `git` binary, [`MockGit`] keeps everything in memory for tests.

pub mod cli;
pub mod mock;
pub mod output;

#[cfg(test)]
pub(crate) mod testing;

use std::path::Path;

use thiserror::Error;

pub use cli::GitCli;
pub use mock::MockGit;
pub use output::{parse_object_count, parse_push_status, parse_remotes, PushStatus};

/// A git invocation that could not be run or exited non-zero.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("git {command}: {message}")]
pub struct GitError {
    /// The subcommand and arguments.
    pub command: String,
    /// Error text reported by git (or by the OS when git could not start).
    pub message: String,
    /// Whatever git wrote to stdout before failing.
    pub output: String,
}

impl GitError {
    /// Create an error for `args`.
    pub fn new(args: &[&str], message: impl Into<String>) -> Self {
        Self {
            command: args.join(" "),
            message: message.into(),
            output: String::new(),
        }
    }

    /// Attach the stdout of the failed invocation.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }
}

/// Operations the wizard needs from git.
///
/// Everything except [`version`](GitClient::version),
/// [`run`](GitClient::run), [`config_get`](GitClient::config_get) and
/// [`init_bare`](GitClient::init_bare) has a default built on `run`.
pub trait GitClient {
    /// `git --version`; fails when git is unusable.
    fn version(&self) -> Result<String, GitError>;

    /// Run an arbitrary subcommand against the repository, returning stdout.
    fn run(&self, args: &[&str]) -> Result<String, GitError>;

    /// Read a config value; `None` when the key is unset.
    fn config_get(&self, key: &str) -> Result<Option<String>, GitError>;

    /// Create a bare repository at `path`.
    fn init_bare(&self, path: &Path) -> Result<String, GitError>;

    /// Write a config value.
    fn config_set(&self, key: &str, value: &str) -> Result<(), GitError> {
        self.run(&["config", key, value]).map(|_| ())
    }

    /// `git remote <args>`.
    fn remote(&self, args: &[&str]) -> Result<String, GitError> {
        let mut argv = vec!["remote"];
        argv.extend_from_slice(args);
        self.run(&argv)
    }

    /// Fetch from a remote.
    fn fetch(&self, remote: &str) -> Result<String, GitError> {
        self.run(&["fetch", remote])
    }

    /// Push to a remote, optionally with an explicit refspec.
    fn push(&self, remote: &str, refspec: Option<&str>) -> Result<String, GitError> {
        let mut argv = vec!["push", remote];
        argv.extend(refspec);
        self.run(&argv)
    }

    /// What a push would do, from a porcelain dry run.
    fn push_status(&self, remote: &str, refspec: Option<&str>) -> Result<PushStatus, GitError> {
        let mut argv = vec!["push", "--dry-run", "--porcelain", remote];
        argv.extend(refspec);
        match self.run(&argv) {
            Ok(out) => Ok(parse_push_status(&out)),
            // A rejected ref fails the dry run, but the ref lines are still printed.
            Err(e) => match parse_push_status(&e.output) {
                rejected @ PushStatus::Rejected(_) => Ok(rejected),
                _ => Err(e),
            },
        }
    }

    /// `git count-objects -v` output, with loose and packed counts.
    fn count_objects(&self) -> Result<String, GitError> {
        self.run(&["count-objects", "-v"])
    }
}
