//! YAML-file backed credential store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CredentialError, CredentialStore, SaveMode, ServiceCredential};

/// On-disk layout of the credential file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialFile {
    /// Schema version for migration.
    version: u32,
    #[serde(default)]
    credentials: Vec<ServiceCredential>,
}

impl Default for CredentialFile {
    fn default() -> Self {
        Self {
            version: FileCredentialStore::CURRENT_VERSION,
            credentials: Vec::new(),
        }
    }
}

/// Stores credentials in a single YAML file.
///
/// Every operation re-reads the file, so several wizard runs against the
/// same store see each other's changes. Writes are atomic (temp file plus
/// rename).
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Current schema version.
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, action: &str, err: impl std::fmt::Display) -> CredentialError {
        CredentialError::Storage {
            message: format!("{} {}: {}", action, self.path.display(), err),
        }
    }

    fn load(&self) -> Result<CredentialFile, CredentialError> {
        if !self.path.exists() {
            return Ok(CredentialFile::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.storage_error("read", e))?;
        if content.trim().is_empty() {
            return Ok(CredentialFile::default());
        }
        serde_yaml::from_str(&content).map_err(|e| self.storage_error("parse", e))
    }

    fn store(&self, file: &CredentialFile) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.storage_error("create", e))?;
            }
        }

        let content =
            serde_yaml::to_string(file).map_err(|e| self.storage_error("serialize", e))?;

        let temp_path = self.path.with_extension("yml.tmp");
        fs::write(&temp_path, content).map_err(|e| self.storage_error("write", e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.storage_error("write", e))?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn find(
        &self,
        principal: &str,
        app_id: &str,
    ) -> Result<Option<ServiceCredential>, CredentialError> {
        Ok(self
            .load()?
            .credentials
            .into_iter()
            .find(|c| c.principal == principal && c.app_id == app_id))
    }

    fn save(
        &self,
        credential: &ServiceCredential,
        mode: SaveMode,
        hashed_password: &str,
    ) -> Result<(), CredentialError> {
        let mut file = self.load()?;
        let existing = file
            .credentials
            .iter_mut()
            .find(|c| c.principal == credential.principal && c.app_id == credential.app_id);

        match (mode, existing) {
            (SaveMode::Insert, Some(_)) => {
                return Err(CredentialError::AlreadyExists {
                    username: credential.username(),
                })
            }
            (SaveMode::Update, None) => {
                return Err(CredentialError::NotFound {
                    username: credential.username(),
                })
            }
            (SaveMode::Insert, None) => {
                let mut record = credential.clone();
                record.password_hash = Some(hashed_password.to_string());
                file.credentials.push(record);
            }
            (SaveMode::Update, Some(record)) => {
                record.grants = credential.grants.clone();
                record.password_hash = Some(hashed_password.to_string());
            }
        }

        self.store(&file)?;
        tracing::info!(
            "Saved credential {} to {}",
            credential.username(),
            self.path.display()
        );
        Ok(())
    }
}
