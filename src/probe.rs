//! Filesystem checks the setup wizard makes before touching the repository.
//!
//! [`PathProbe`] is the seam: [`LocalProbe`] asks the real filesystem,
//! [`MemoryProbe`] answers from a table so tests can describe unwritable
//! directories without changing permissions on disk.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Existence, type and writability checks on paths.
pub trait PathProbe {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether the current process may write to `path`.
    fn is_writable(&self, path: &Path) -> bool;
}

/// Probe backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProbe;

impl PathProbe for LocalProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    #[cfg(unix)]
    fn is_writable(&self, path: &Path) -> bool {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
            return false;
        };
        // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
        unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
    }

    #[cfg(not(unix))]
    fn is_writable(&self, path: &Path) -> bool {
        std::fs::metadata(path)
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    dir: bool,
    writable: bool,
}

/// Table-driven probe for tests.
///
/// Paths that were never added do not exist.
#[derive(Debug, Default)]
pub struct MemoryProbe {
    entries: RefCell<BTreeMap<PathBuf, Entry>>,
}

impl MemoryProbe {
    /// Create a probe where nothing exists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directory.
    pub fn add_dir(&self, path: impl Into<PathBuf>, writable: bool) {
        self.entries
            .borrow_mut()
            .insert(path.into(), Entry { dir: true, writable });
    }

    /// Record a regular file.
    pub fn add_file(&self, path: impl Into<PathBuf>, writable: bool) {
        self.entries.borrow_mut().insert(
            path.into(),
            Entry {
                dir: false,
                writable,
            },
        );
    }

    /// Forget a path.
    pub fn remove(&self, path: &Path) {
        self.entries.borrow_mut().remove(path);
    }

    fn entry(&self, path: &Path) -> Option<Entry> {
        self.entries.borrow().get(path).copied()
    }
}

impl PathProbe for MemoryProbe {
    fn exists(&self, path: &Path) -> bool {
        self.entry(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.entry(path).is_some_and(|e| e.dir)
    }

    fn is_writable(&self, path: &Path) -> bool {
        self.entry(path).is_some_and(|e| e.writable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn local_probe_sees_temp_dir() {
        let temp = TempDir::new().unwrap();
        assert!(LocalProbe.exists(temp.path()));
        assert!(LocalProbe.is_dir(temp.path()));
        assert!(LocalProbe.is_writable(temp.path()));
    }

    #[test]
    fn local_probe_missing_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert!(!LocalProbe.exists(&missing));
        assert!(!LocalProbe.is_dir(&missing));
        assert!(!LocalProbe.is_writable(&missing));
    }

    #[test]
    fn local_probe_file_is_not_dir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config");
        std::fs::write(&file, "").unwrap();
        assert!(LocalProbe.exists(&file));
        assert!(!LocalProbe.is_dir(&file));
    }

    #[test]
    fn memory_probe_answers_from_table() {
        let probe = MemoryProbe::new();
        probe.add_dir("/srv/repo", false);
        probe.add_file("/srv/repo/config", true);

        assert!(probe.is_dir(Path::new("/srv/repo")));
        assert!(!probe.is_writable(Path::new("/srv/repo")));
        assert!(!probe.is_dir(Path::new("/srv/repo/config")));
        assert!(probe.is_writable(Path::new("/srv/repo/config")));
        assert!(!probe.exists(Path::new("/srv/other")));

        probe.remove(Path::new("/srv/repo/config"));
        assert!(!probe.exists(Path::new("/srv/repo/config")));
    }
}
