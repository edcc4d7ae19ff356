//! Credential storage errors.

use std::path::PathBuf;
use thiserror::Error;

use super::category::ErrorCategory;

/// Failure to read or write the persisted session credential.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The credential record has never been initialized at this location.
    #[error("credential store not initialized at {}", path.display())]
    Missing { path: PathBuf },

    /// Reading or writing the backing file failed.
    #[error("credential store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored record could not be parsed.
    #[error("credential store at {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The record could not be serialized for writing.
    #[error("failed to serialize credential: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store cannot be used at all (no home directory, poisoned lock).
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

impl PersistenceError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            PersistenceError::Missing { .. } => "E_STORE_MISSING",
            PersistenceError::Io { .. } => "E_STORE_IO",
            PersistenceError::Corrupt { .. } => "E_STORE_CORRUPT",
            PersistenceError::Serialization(_) => "E_STORE_SERIALIZE",
            PersistenceError::Unavailable(_) => "E_STORE_UNAVAILABLE",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            PersistenceError::Missing { .. } | PersistenceError::Unavailable(_) => {
                "Your saved session could not be found. Please sign in again.".to_string()
            }
            PersistenceError::Corrupt { .. } => {
                "Your saved session is damaged. Please sign in again.".to_string()
            }
            PersistenceError::Io { .. } | PersistenceError::Serialization(_) => {
                "Could not save your session. Please check file permissions.".to_string()
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::System
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_display_names_path() {
        let err = PersistenceError::Missing {
            path: PathBuf::from("/tmp/creds.json"),
        };
        assert!(err.to_string().contains("/tmp/creds.json"));
        assert_eq!(err.error_code(), "E_STORE_MISSING");
        assert_eq!(err.category(), ErrorCategory::System);
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = PersistenceError::Io {
            path: PathBuf::from("/tmp/creds.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.user_message().contains("permissions"));
    }

    #[test]
    fn test_serialization_from_serde() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PersistenceError = json_err.into();
        assert_eq!(err.error_code(), "E_STORE_SERIALIZE");
    }
}
