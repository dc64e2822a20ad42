//! Real repositories on disk for tests that run the `git` binary.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use super::{GitCli, GitClient};

// Serialize git-process tests to avoid flaky failures under parallel execution
pub static GIT_LOCK: Mutex<()> = Mutex::new(());

/// Run `git` outside any [`GitCli`], panicking on failure.
pub fn run_git(args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .status()
        .unwrap();
    assert!(status.success(), "git {} failed", args.join(" "));
}

/// Commit nothing on the current branch of the work tree at `repo`.
pub fn commit(repo: &Path, message: &str) {
    let repo = repo.to_string_lossy();
    run_git(&[
        "-C",
        &repo,
        "-c",
        "user.name=Wiki",
        "-c",
        "user.email=wiki@example.invalid",
        "-c",
        "commit.gpgsign=false",
        "commit",
        "-q",
        "--allow-empty",
        "-m",
        message,
    ]);
}

/// A work tree standing in for the wiki, with a couple of revisions on `master`.
pub fn wiki_repo(dir: &Path) -> PathBuf {
    run_git(&["init", "-q", "-b", "master", &dir.to_string_lossy()]);
    commit(dir, "Main Page");
    commit(dir, "Talk:Main Page");
    dir.to_path_buf()
}

/// Empty bare repository at `path`.
pub fn bare_repo(path: &Path) -> GitCli {
    let git = GitCli::new("git", path);
    git.init_bare(path).unwrap();
    git
}

/// Bare repository that has fetched `wiki` as `origin`, keeping what it
/// received packed the way a large fetch would.
pub fn imported_repo(path: &Path, wiki: &Path) -> GitCli {
    let git = bare_repo(path);
    git.config_set("fetch.unpackLimit", "1").unwrap();
    git.remote(&["add", "origin", &wiki.to_string_lossy()]).unwrap();
    git.fetch("origin").unwrap();
    git
}
