//! In-memory credential store for tests.

use std::cell::{Cell, RefCell};

use super::{CredentialError, CredentialStore, SaveMode, ServiceCredential};

/// Keeps credentials in a `Vec`; saves can be made to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RefCell<Vec<ServiceCredential>>,
    fail_saves: Cell<bool>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail with a storage error.
    pub fn fail_saves(&self) {
        self.fail_saves.set(true);
    }

    /// Insert a record with a known plaintext password.
    pub fn seed(&self, principal: &str, app_id: &str, password: &str) {
        let mut credential = self.create_unsaved(principal, app_id, &[]);
        credential.password_hash = Some(self.hash(password));
        self.records.borrow_mut().push(credential);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn find(
        &self,
        principal: &str,
        app_id: &str,
    ) -> Result<Option<ServiceCredential>, CredentialError> {
        Ok(self
            .records
            .borrow()
            .iter()
            .find(|c| c.principal == principal && c.app_id == app_id)
            .cloned())
    }

    fn save(
        &self,
        credential: &ServiceCredential,
        mode: SaveMode,
        hashed_password: &str,
    ) -> Result<(), CredentialError> {
        if self.fail_saves.get() {
            return Err(CredentialError::Storage {
                message: "store is read-only".to_string(),
            });
        }

        let mut records = self.records.borrow_mut();
        let existing = records
            .iter_mut()
            .find(|c| c.principal == credential.principal && c.app_id == credential.app_id);

        match (mode, existing) {
            (SaveMode::Insert, Some(_)) => Err(CredentialError::AlreadyExists {
                username: credential.username(),
            }),
            (SaveMode::Update, None) => Err(CredentialError::NotFound {
                username: credential.username(),
            }),
            (SaveMode::Insert, None) => {
                let mut record = credential.clone();
                record.password_hash = Some(hashed_password.to_string());
                records.push(record);
                Ok(())
            }
            (SaveMode::Update, Some(record)) => {
                record.grants = credential.grants.clone();
                record.password_hash = Some(hashed_password.to_string());
                Ok(())
            }
        }
    }
}
