//! In-memory git for testing.
//!
//! `MockGit` understands the handful of subcommands the wizard issues
//! (`remote`, `config`, `count-objects`, `fetch`, `push`) and records every
//! invocation so tests can assert on what would have been run.
//!
//! # Example
//!
//! ```
//! use mabs::git::{GitClient, MockGit};
//!
//! let git = MockGit::new();
//! git.remote(&["add", "origin", "mediawiki::https://wiki.example/w/api.php"]).unwrap();
//!
//! assert!(git.ran("remote add origin mediawiki::https://wiki.example/w/api.php"));
//! assert!(git.remote(&["-v"]).unwrap().contains("origin"));
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::{GitClient, GitError, PushStatus};

#[derive(Debug)]
struct State {
    available: bool,
    config: BTreeMap<String, String>,
    remotes: BTreeMap<String, String>,
    objects: u64,
    objects_after_fetch: u64,
    push: PushStatus,
    failures: HashMap<String, String>,
    calls: Vec<String>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            available: true,
            config: BTreeMap::new(),
            remotes: BTreeMap::new(),
            objects: 0,
            objects_after_fetch: 42,
            push: PushStatus::UpToDate,
            failures: HashMap::new(),
            calls: Vec::new(),
        }
    }
}

/// Scriptable in-memory [`GitClient`].
#[derive(Debug, Default)]
pub struct MockGit {
    state: RefCell<State>,
}

impl MockGit {
    /// Create a mock with git available, an empty repository and no remotes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `git --version` fail.
    pub fn set_unavailable(&self) {
        self.state.borrow_mut().available = false;
    }

    /// Make every invocation of `subcommand` fail with `message`.
    ///
    /// `subcommand` is the first argument (`"fetch"`, `"remote"`, `"init"`, ...).
    pub fn fail(&self, subcommand: &str, message: &str) {
        self.state
            .borrow_mut()
            .failures
            .insert(subcommand.to_string(), message.to_string());
    }

    /// Set a config value directly.
    pub fn set_config(&self, key: &str, value: &str) {
        self.state
            .borrow_mut()
            .config
            .insert(key.to_string(), value.to_string());
    }

    /// Read a config value directly.
    pub fn config_value(&self, key: &str) -> Option<String> {
        self.state.borrow().config.get(key).cloned()
    }

    /// Add a remote directly.
    pub fn set_remote(&self, name: &str, url: &str) {
        self.state
            .borrow_mut()
            .remotes
            .insert(name.to_string(), url.to_string());
    }

    /// Current remotes.
    pub fn remotes(&self) -> BTreeMap<String, String> {
        self.state.borrow().remotes.clone()
    }

    /// Set the object count reported by `count-objects`.
    pub fn set_objects(&self, count: u64) {
        self.state.borrow_mut().objects = count;
    }

    /// Object count a successful fetch leaves behind.
    pub fn set_objects_after_fetch(&self, count: u64) {
        self.state.borrow_mut().objects_after_fetch = count;
    }

    /// Whether a dry-run push reports pending updates.
    pub fn set_pending_push(&self, pending: bool) {
        self.state.borrow_mut().push = if pending {
            PushStatus::Pending
        } else {
            PushStatus::UpToDate
        };
    }

    /// Make the remote refuse `refs/heads/master` as a non-fast-forward.
    pub fn set_push_rejected(&self) {
        self.state.borrow_mut().push =
            PushStatus::Rejected("refs/heads/master [rejected] (non-fast-forward)".to_string());
    }

    /// Every invocation so far, as space-joined arguments.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    /// Whether an invocation with exactly these space-joined arguments ran.
    pub fn ran(&self, command: &str) -> bool {
        self.state.borrow().calls.iter().any(|c| c == command)
    }

    fn record(&self, args: &[&str]) -> Result<(), GitError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(args.join(" "));
        match args.first().and_then(|cmd| state.failures.get(*cmd)) {
            Some(message) => Err(GitError::new(args, message.clone())),
            None => Ok(()),
        }
    }

    fn listing(remotes: &BTreeMap<String, String>) -> String {
        remotes
            .iter()
            .map(|(name, url)| format!("{name}\t{url} (fetch)\n{name}\t{url} (push)\n"))
            .collect()
    }
}

impl GitClient for MockGit {
    fn version(&self) -> Result<String, GitError> {
        if self.state.borrow().available {
            Ok("git version 2.45.0".to_string())
        } else {
            Err(GitError::new(&["--version"], "cannot run git: not found"))
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        self.record(args)?;
        let mut state = self.state.borrow_mut();

        match args {
            ["remote"] => Ok(state.remotes.keys().map(|k| format!("{k}\n")).collect()),
            ["remote", "-v"] => Ok(Self::listing(&state.remotes)),
            ["remote", "add", name, url] => {
                if state.remotes.contains_key(*name) {
                    return Err(GitError::new(
                        args,
                        format!("error: remote {name} already exists."),
                    ));
                }
                state.remotes.insert(name.to_string(), url.to_string());
                Ok(String::new())
            }
            ["remote", "set-url", name, url] => match state.remotes.get_mut(*name) {
                Some(existing) => {
                    *existing = url.to_string();
                    Ok(String::new())
                }
                None => Err(GitError::new(
                    args,
                    format!("error: No such remote '{name}'"),
                )),
            },
            ["config", key, value] => {
                state.config.insert(key.to_string(), value.to_string());
                Ok(String::new())
            }
            ["count-objects", "-v"] => Ok(format!(
                "count: 0\nsize: 0\nin-pack: {}\npacks: 1\nsize-pack: 4\n",
                state.objects
            )),
            ["fetch", remote] => {
                if !state.remotes.contains_key(*remote) {
                    return Err(GitError::new(
                        args,
                        format!("fatal: '{remote}' does not appear to be a git repository"),
                    ));
                }
                state.objects = state.objects_after_fetch;
                Ok(String::new())
            }
            ["push", "--dry-run", "--porcelain", remote, ..] => {
                if !state.remotes.contains_key(*remote) {
                    return Err(GitError::new(
                        args,
                        format!("fatal: '{remote}' does not appear to be a git repository"),
                    ));
                }
                match state.push {
                    PushStatus::UpToDate => Ok(
                        "=\trefs/heads/master:refs/heads/master\t[up to date]\nDone\n".to_string(),
                    ),
                    PushStatus::Pending => Ok(
                        "*\trefs/heads/master:refs/heads/master\t[new branch]\nDone\n".to_string(),
                    ),
                    PushStatus::Rejected(_) => Err(GitError::new(
                        args,
                        "error: failed to push some refs",
                    )
                    .with_output(
                        "!\trefs/heads/master:refs/heads/master\t[rejected] (non-fast-forward)\nDone\n",
                    )),
                }
            }
            ["push", remote, ..] => {
                if !state.remotes.contains_key(*remote) {
                    return Err(GitError::new(
                        args,
                        format!("fatal: '{remote}' does not appear to be a git repository"),
                    ));
                }
                if let PushStatus::Rejected(summary) = &state.push {
                    return Err(GitError::new(args, format!("! {summary}")));
                }
                state.push = PushStatus::UpToDate;
                Ok(String::new())
            }
            _ => Err(GitError::new(args, "unsupported by MockGit")),
        }
    }

    fn config_get(&self, key: &str) -> Result<Option<String>, GitError> {
        self.record(&["config", "--get", key])?;
        Ok(self.state.borrow().config.get(key).cloned())
    }

    fn init_bare(&self, path: &Path) -> Result<String, GitError> {
        let path = path.to_string_lossy();
        self.record(&["init", "--bare", path.as_ref()])?;
        Ok(format!("Initialized empty Git repository in {path}/\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls() {
        let git = MockGit::new();
        git.count_objects().unwrap();
        assert!(git.ran("count-objects -v"));
    }

    #[test]
    fn scripted_failure() {
        let git = MockGit::new();
        git.set_remote("origin", "mediawiki::x");
        git.fail("fetch", "fatal: could not read from remote");
        let err = git.fetch("origin").unwrap_err();
        assert_eq!(err.message, "fatal: could not read from remote");
    }

    #[test]
    fn fetch_fills_repository() {
        let git = MockGit::new();
        git.set_remote("origin", "mediawiki::x");
        git.set_objects_after_fetch(7);
        git.fetch("origin").unwrap();
        let count = git.count_objects().unwrap();
        assert_eq!(crate::git::parse_object_count(&count), Some(7));
    }

    #[test]
    fn duplicate_remote_is_rejected() {
        let git = MockGit::new();
        git.remote(&["add", "origin", "a"]).unwrap();
        assert!(git.remote(&["add", "origin", "b"]).is_err());
    }

    #[test]
    fn config_set_is_visible_to_config_get() {
        let git = MockGit::new();
        git.config_set("credential.x.username", "Admin@mabs").unwrap();
        assert_eq!(
            git.config_get("credential.x.username").unwrap().as_deref(),
            Some("Admin@mabs")
        );
    }

    #[test]
    fn push_clears_pending() {
        let git = MockGit::new();
        git.set_remote("other", "https://git.example/wiki.git");
        git.set_pending_push(true);
        assert_eq!(git.push_status("other", None).unwrap(), PushStatus::Pending);
        git.push("other", None).unwrap();
        assert_eq!(git.push_status("other", None).unwrap(), PushStatus::UpToDate);
    }

    #[test]
    fn rejected_dry_run_still_reports_the_refs() {
        let git = MockGit::new();
        git.set_remote("other", "https://git.example/wiki.git");
        git.set_push_rejected();
        assert_eq!(
            git.push_status("other", None).unwrap(),
            PushStatus::Rejected("refs/heads/master [rejected] (non-fast-forward)".to_string())
        );
        assert!(git.push("other", None).is_err());
    }
}
