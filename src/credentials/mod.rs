//! Service credentials for git-over-HTTP access to the wiki.
//!
//! A service credential is an application-scoped password issued to a wiki
//! principal: the username git presents is `<principal>@<app id>`. The
//! [`CredentialStore`] is authoritative; the copy in the repository's git
//! config is a cache refreshed whenever a credential is created or rotated.
//!
//! - [`FileCredentialStore`] persists records to a YAML file
//! - [`MemoryCredentialStore`] keeps them in memory for tests

pub mod file;
pub mod memory;
pub mod password;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;
pub use password::{generate_password, hash_password, verify_password};

/// An application-scoped credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCredential {
    /// The wiki principal the credential belongs to.
    pub principal: String,
    /// Application id, e.g. `mabs`.
    pub app_id: String,
    /// Capability grants.
    #[serde(default)]
    pub grants: Vec<String>,
    /// Hash of the current password; `None` until saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl ServiceCredential {
    /// The username git authenticates with.
    pub fn username(&self) -> String {
        format!("{}@{}", self.principal, self.app_id)
    }
}

/// Split `<principal>@<app id>` at the last `@`.
pub fn split_username(username: &str) -> Option<(&str, &str)> {
    let (principal, app_id) = username.rsplit_once('@')?;
    if principal.is_empty() || app_id.is_empty() {
        return None;
    }
    Some((principal, app_id))
}

/// How [`CredentialStore::save`] writes a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Create a new record; fails if one exists.
    Insert,
    /// Replace the password of an existing record; fails if none exists.
    Update,
}

/// Errors from a credential store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// Username or password did not match a stored credential.
    #[error("login failed for {username}")]
    LoginFailed { username: String },

    /// Insert of a credential that already exists.
    #[error("credential {username} already exists")]
    AlreadyExists { username: String },

    /// Update of a credential that does not exist.
    #[error("credential {username} does not exist")]
    NotFound { username: String },

    /// The backing storage failed.
    #[error("credential storage failed: {message}")]
    Storage { message: String },
}

/// Storage for service credentials.
///
/// Implementors provide [`find`](CredentialStore::find) and
/// [`save`](CredentialStore::save); the rest have defaults.
pub trait CredentialStore {
    /// Look up the credential of `principal` for `app_id`.
    fn find(
        &self,
        principal: &str,
        app_id: &str,
    ) -> Result<Option<ServiceCredential>, CredentialError>;

    /// Persist `credential` with the already-hashed password.
    fn save(
        &self,
        credential: &ServiceCredential,
        mode: SaveMode,
        hashed_password: &str,
    ) -> Result<(), CredentialError>;

    /// Check a username/password pair.
    fn login(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        let failed = || CredentialError::LoginFailed {
            username: username.to_string(),
        };

        let (principal, app_id) = split_username(username).ok_or_else(failed)?;
        let credential = self.find(principal, app_id)?.ok_or_else(failed)?;
        match credential.password_hash.as_deref() {
            Some(hash) if verify_password(password, hash) => Ok(()),
            _ => Err(failed()),
        }
    }

    /// A credential that is not stored anywhere yet.
    fn create_unsaved(&self, principal: &str, app_id: &str, grants: &[String]) -> ServiceCredential {
        ServiceCredential {
            principal: principal.to_string(),
            app_id: app_id.to_string(),
            grants: grants.to_vec(),
            password_hash: None,
        }
    }

    /// A fresh random password.
    fn generate_password(&self) -> String {
        generate_password()
    }

    /// Hash a plaintext password for storage.
    fn hash(&self, plaintext: &str) -> String {
        hash_password(plaintext)
    }
}
