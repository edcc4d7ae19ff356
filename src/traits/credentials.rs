//! Credential store trait abstraction.
//!
//! The store holds exactly one [`Credential`] record. An absent session is an
//! all-empty record, never a missing one.

use async_trait::async_trait;

use crate::auth::Credential;
use crate::error::PersistenceError;

/// Trait for persisting the singleton session credential.
///
/// Implementations must make `save` all-or-nothing and must never let a
/// concurrent `load` observe a partially written record.
///
/// # Example
///
/// ```ignore
/// use killstreaks::traits::CredentialStore;
///
/// async fn signed_in<S: CredentialStore + ?Sized>(store: &S) -> bool {
///     store.load().await.map(|c| c.is_logged_in()).unwrap_or(false)
/// }
/// ```
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the singleton credential.
    ///
    /// An empty credential is a valid result; an uninitialized or unreadable
    /// store is an error.
    async fn load(&self) -> Result<Credential, PersistenceError>;

    /// Overwrite the singleton credential.
    async fn save(&self, credential: &Credential) -> Result<(), PersistenceError>;

    /// Reset the credential to the empty record.
    async fn clear(&self) -> Result<(), PersistenceError> {
        self.save(&Credential::empty()).await
    }
}
