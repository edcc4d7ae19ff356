//! File-based credential store adapter.
//!
//! Wraps [`CredentialsManager`] and serializes every load and save through
//! one mutex, so a save is all-or-nothing and a concurrent load never sees a
//! half-written record.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::auth::credentials::{Credential, CredentialsManager};
use crate::error::PersistenceError;
use crate::traits::CredentialStore;

/// File-backed singleton credential store.
///
/// # Example
///
/// ```ignore
/// use killstreaks::adapters::FileCredentialStore;
/// use killstreaks::traits::CredentialStore;
///
/// let store = FileCredentialStore::open_default()?;
/// let credential = store.load().await?;
/// println!("signed in: {}", credential.is_logged_in());
/// ```
#[derive(Debug)]
pub struct FileCredentialStore {
    manager: Mutex<CredentialsManager>,
    path: PathBuf,
}

impl FileCredentialStore {
    /// Open the store at `path`, writing the empty record on first use.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        Self::from_manager(CredentialsManager::with_path(path))
    }

    /// Open the store at `~/.killstreaks/credentials.json`.
    pub fn open_default() -> Result<Self, PersistenceError> {
        let manager = CredentialsManager::new().ok_or_else(|| {
            PersistenceError::Unavailable("failed to determine home directory".to_string())
        })?;
        Self::from_manager(manager)
    }

    fn from_manager(manager: CredentialsManager) -> Result<Self, PersistenceError> {
        if manager.initialize()? {
            debug!(path = %manager.credentials_path().display(), "Initialized empty credential store");
        }
        let path = manager.credentials_path().to_path_buf();
        Ok(Self {
            manager: Mutex::new(manager),
            path,
        })
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        &self.path
    }

    fn with_manager<T>(
        &self,
        f: impl FnOnce(&CredentialsManager) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        let manager = self
            .manager
            .lock()
            .map_err(|_| PersistenceError::Unavailable("credential store lock poisoned".to_string()))?;
        f(&manager)
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Credential, PersistenceError> {
        self.with_manager(|manager| manager.load())
    }

    async fn save(&self, credential: &Credential) -> Result<(), PersistenceError> {
        self.with_manager(|manager| manager.save(credential))
    }
}
