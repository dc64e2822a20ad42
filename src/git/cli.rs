//! [`GitClient`] backed by the `git` executable.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::{GitClient, GitError};

/// Runs `git --git-dir <repo> ...` as a subprocess.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: PathBuf,
    git_dir: PathBuf,
}

impl GitCli {
    /// Create a client for the repository at `git_dir`.
    pub fn new(binary: impl Into<PathBuf>, git_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            git_dir: git_dir.into(),
        }
    }

    /// The repository this client operates on.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    fn spawn(&self, args: &[&str], with_git_dir: bool) -> Result<Output, GitError> {
        let mut cmd = Command::new(&self.binary);
        if with_git_dir {
            cmd.arg("--git-dir").arg(&self.git_dir);
        }
        cmd.args(args);
        // Never block on a credential or ssh prompt.
        cmd.env("GIT_TERMINAL_PROMPT", "0");

        tracing::debug!("git {}", args.join(" "));
        cmd.output()
            .map_err(|e| GitError::new(args, format!("cannot run {}: {e}", self.binary.display())))
    }
}

fn failure_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    match output.status.code() {
        Some(code) => format!("exited with code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl GitClient for GitCli {
    fn version(&self) -> Result<String, GitError> {
        let output = self.spawn(&["--version"], false)?;
        if !output.status.success() {
            return Err(GitError::new(&["--version"], failure_text(&output)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.spawn(args, true)?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() {
            return Err(GitError::new(args, failure_text(&output)).with_output(stdout));
        }
        Ok(stdout)
    }

    fn config_get(&self, key: &str) -> Result<Option<String>, GitError> {
        let args = ["config", "--get", key];
        let output = self.spawn(&args, true)?;
        if output.status.success() {
            let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
            return Ok(Some(value));
        }
        // Exit status 1 means the key is not set.
        if output.status.code() == Some(1) {
            return Ok(None);
        }
        Err(GitError::new(&args, failure_text(&output)))
    }

    fn init_bare(&self, path: &Path) -> Result<String, GitError> {
        let path_str = path.to_string_lossy();
        let args = ["init", "--bare", path_str.as_ref()];
        let output = self.spawn(&args, false)?;
        if !output.status.success() {
            return Err(GitError::new(&args, failure_text(&output)));
        }
        tracing::info!("Initialized bare repository at {}", path.display());
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testing::{self, commit, imported_repo, run_git, wiki_repo, GIT_LOCK};
    use crate::git::{parse_object_count, PushStatus};
    use crate::tasks::export::EXPORT_REFSPEC;
    use crate::tasks::import::IMPORT_PUSH_REFSPEC;
    use tempfile::TempDir;

    fn bare_repo(temp: &TempDir) -> GitCli {
        testing::bare_repo(&temp.path().join("wiki.git"))
    }

    #[test]
    fn missing_binary_is_an_error() {
        let git = GitCli::new("/nonexistent/bin/git", "/tmp/none.git");
        let err = git.version().unwrap_err();
        assert!(err.message.contains("cannot run"));
    }

    #[test]
    fn version_reports_git() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let git = GitCli::new("git", "/tmp/none.git");
        assert!(git.version().unwrap().starts_with("git version"));
    }

    #[test]
    fn init_bare_creates_config() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let git = bare_repo(&temp);
        assert!(git.git_dir().join("config").is_file());
        assert_eq!(
            git.config_get("core.bare").unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn unset_config_key_is_none() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let git = bare_repo(&temp);
        assert_eq!(git.config_get("credential.x.username").unwrap(), None);
    }

    #[test]
    fn config_round_trip() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let git = bare_repo(&temp);
        let key = "credential.https://wiki.example/w/api.php.username";
        git.config_set(key, "Admin@mabs").unwrap();
        assert_eq!(git.config_get(key).unwrap().as_deref(), Some("Admin@mabs"));
    }

    #[test]
    fn fresh_repository_has_no_objects() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let git = bare_repo(&temp);
        let count = git.count_objects().unwrap();
        assert_eq!(parse_object_count(&count), Some(0));
    }

    #[test]
    fn packed_objects_are_counted() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let wiki = wiki_repo(&temp.path().join("wiki"));
        let git = imported_repo(&temp.path().join("wiki.git"), &wiki);

        let output = git.count_objects().unwrap();
        assert!(output.contains("count: 0"), "{output}");
        assert!(parse_object_count(&output).unwrap() > 0, "{output}");
    }

    #[test]
    fn import_push_follows_local_branches() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let wiki = wiki_repo(&temp.path().join("wiki"));
        let git = imported_repo(&temp.path().join("wiki.git"), &wiki);

        // A freshly imported repository has no branches of its own.
        assert_eq!(
            git.push_status("origin", Some(IMPORT_PUSH_REFSPEC)).unwrap(),
            PushStatus::UpToDate
        );

        git.run(&["update-ref", "refs/heads/drafts", "refs/remotes/origin/master"])
            .unwrap();
        assert_eq!(
            git.push_status("origin", Some(IMPORT_PUSH_REFSPEC)).unwrap(),
            PushStatus::Pending
        );
        git.push("origin", Some(IMPORT_PUSH_REFSPEC)).unwrap();
        assert_eq!(
            git.push_status("origin", Some(IMPORT_PUSH_REFSPEC)).unwrap(),
            PushStatus::UpToDate
        );
    }

    #[test]
    fn diverged_destination_reports_rejection() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let wiki = wiki_repo(&temp.path().join("wiki"));
        let git = imported_repo(&temp.path().join("wiki.git"), &wiki);

        let dest = temp.path().join("mirror.git");
        let dest_str = dest.to_string_lossy().to_string();
        run_git(&["init", "-q", "--bare", &dest_str]);
        let stranger = temp.path().join("stranger");
        run_git(&["init", "-q", "-b", "master", &stranger.to_string_lossy()]);
        commit(&stranger, "Unrelated");
        run_git(&["-C", &stranger.to_string_lossy(), "push", "-q", &dest_str, "master"]);

        git.remote(&["add", "other", &dest_str]).unwrap();
        match git.push_status("other", Some(EXPORT_REFSPEC)).unwrap() {
            PushStatus::Rejected(summary) => {
                assert!(summary.starts_with("refs/heads/master"), "{summary}");
                assert!(summary.contains("[rejected]"), "{summary}");
            }
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[test]
    fn remote_add_then_list() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let git = bare_repo(&temp);
        git.remote(&["add", "origin", "mediawiki::https://wiki.example/w/api.php"])
            .unwrap();
        let listing = git.remote(&["-v"]).unwrap();
        let remotes = crate::git::parse_remotes(&listing);
        assert_eq!(
            remotes.get("origin").map(String::as_str),
            Some("mediawiki::https://wiki.example/w/api.php")
        );
    }

    #[test]
    fn failing_command_carries_git_error_text() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let git = bare_repo(&temp);
        let err = git.fetch("nowhere").unwrap_err();
        assert_eq!(err.command, "fetch nowhere");
        assert!(!err.message.is_empty());
    }
}
