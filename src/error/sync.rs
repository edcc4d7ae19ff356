//! Achievement sync errors.

use std::fmt;
use thiserror::Error;

use super::category::ErrorCategory;
use super::persistence::PersistenceError;
use crate::traits::HttpError;

/// Step of the sync job that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// Fetching the last sync checkpoint.
    Checkpoint,
    /// Uploading the compressed payload.
    Upload,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStage::Checkpoint => write!(f, "checkpoint fetch"),
            SyncStage::Upload => write!(f, "upload"),
        }
    }
}

/// Failure to read local achievements.
#[derive(Debug, Clone, Error)]
#[error("achievement source failed: {0}")]
pub struct SourceError(pub String);

/// Failure to encode or decode the achievements payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// JSON (de)serialization failed.
    #[error("payload JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// zlib compression or decompression failed.
    #[error("payload compression error: {0}")]
    Compression(#[from] std::io::Error),
}

/// Failure of a sync job. Fatal to that job only.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading or writing the credential failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The request never produced a response.
    #[error("{stage} request failed: {source}")]
    Connection {
        stage: SyncStage,
        #[source]
        source: HttpError,
    },

    /// The service answered with a non-2xx status.
    #[error("{stage} rejected: HTTP {status}: {body}")]
    Status {
        stage: SyncStage,
        status: u16,
        body: String,
    },

    /// The checkpoint list could not be interpreted.
    #[error("invalid checkpoint response: {0}")]
    InvalidCheckpoint(String),

    /// Local achievements could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The payload could not be encoded.
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl SyncError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            SyncError::Persistence(err) => err.error_code(),
            SyncError::Connection { .. } => "E_SYNC_CONNECTION",
            SyncError::Status { .. } => "E_SYNC_STATUS",
            SyncError::InvalidCheckpoint(_) => "E_SYNC_CHECKPOINT",
            SyncError::Source(_) => "E_SYNC_SOURCE",
            SyncError::Payload(_) => "E_SYNC_PAYLOAD",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Persistence(err) => err.user_message(),
            SyncError::Connection { .. } => {
                "Could not reach the leaderboard server. Medals will sync next time.".to_string()
            }
            SyncError::Status { status: 401, .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            SyncError::Status { status, .. } => {
                format!("The leaderboard server rejected the sync (HTTP {}).", status)
            }
            SyncError::InvalidCheckpoint(_) => {
                "The leaderboard server sent an unexpected sync history.".to_string()
            }
            SyncError::Source(_) => "Could not read your local medals.".to_string(),
            SyncError::Payload(_) => "Could not prepare your medals for upload.".to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::Persistence(err) => err.category(),
            SyncError::Connection { .. } => ErrorCategory::Network,
            SyncError::Status { status: 401, .. } => ErrorCategory::Auth,
            SyncError::Status { .. } => ErrorCategory::Server,
            SyncError::InvalidCheckpoint(_) => ErrorCategory::Server,
            SyncError::Source(_) => ErrorCategory::System,
            SyncError::Payload(_) => ErrorCategory::Client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_names_stage() {
        let err = SyncError::Status {
            stage: SyncStage::Upload,
            status: 500,
            body: "oops".to_string(),
        };
        assert_eq!(err.to_string(), "upload rejected: HTTP 500: oops");
        assert_eq!(err.category(), ErrorCategory::Server);
    }

    #[test]
    fn test_unauthorized_status_is_auth() {
        let err = SyncError::Status {
            stage: SyncStage::Checkpoint,
            status: 401,
            body: String::new(),
        };
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert!(err.user_message().contains("sign in"));
    }

    #[test]
    fn test_connection_error() {
        let err = SyncError::Connection {
            stage: SyncStage::Checkpoint,
            source: HttpError::Timeout("5s".to_string()),
        };
        assert_eq!(err.error_code(), "E_SYNC_CONNECTION");
        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(err.to_string().starts_with("checkpoint fetch request failed"));
    }

    #[test]
    fn test_source_error_converts() {
        let err: SyncError = SourceError("db locked".to_string()).into();
        assert_eq!(err.error_code(), "E_SYNC_SOURCE");
        assert!(err.to_string().contains("db locked"));
    }
}
