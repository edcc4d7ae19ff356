//! In-memory credential store for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::auth::Credential;
use crate::error::PersistenceError;
use crate::traits::CredentialStore;

/// In-memory credential store for testing.
///
/// Starts with the empty credential, like a freshly initialized file store.
/// Clones share state, so a test can keep one handle for inspection while
/// the code under test owns another.
///
/// # Example
///
/// ```ignore
/// use killstreaks::adapters::mock::InMemoryCredentialStore;
/// use killstreaks::traits::CredentialStore;
///
/// let store = InMemoryCredentialStore::new();
/// assert!(store.load().await?.is_empty());
///
/// store.set_save_should_fail(true);
/// assert!(store.save(&credential).await.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryCredentialStore {
    credential: Arc<Mutex<Credential>>,
    save_should_fail: Arc<Mutex<bool>>,
    load_should_fail: Arc<Mutex<bool>>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryCredentialStore {
    /// Create a store holding the empty credential.
    pub fn new() -> Self {
        Self::with_credential(Credential::empty())
    }

    /// Create a store holding `credential`.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Arc::new(Mutex::new(credential)),
            save_should_fail: Arc::new(Mutex::new(false)),
            load_should_fail: Arc::new(Mutex::new(false)),
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Configure whether save should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether load should fail.
    pub fn set_load_should_fail(&self, should_fail: bool) {
        *self.load_should_fail.lock().unwrap() = should_fail;
    }

    /// Current credential, read synchronously.
    pub fn snapshot(&self) -> Credential {
        self.credential.lock().unwrap().clone()
    }

    /// Replace the credential synchronously.
    pub fn set_credential(&self, credential: Credential) {
        *self.credential.lock().unwrap() = credential;
    }

    /// Number of successful saves (including clears).
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Credential, PersistenceError> {
        if *self.load_should_fail.lock().unwrap() {
            return Err(PersistenceError::Unavailable("mock load failure".to_string()));
        }
        Ok(self.snapshot())
    }

    async fn save(&self, credential: &Credential) -> Result<(), PersistenceError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(PersistenceError::Unavailable("mock save failure".to_string()));
        }
        *self.credential.lock().unwrap() = credential.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
