//! Session protocol errors.
//!
//! Only the fatal outcomes live here. Expected outcomes (401, 404, transport
//! failure) are reported through the typed results in `auth::session`.

use thiserror::Error;

use super::category::ErrorCategory;
use super::persistence::PersistenceError;
use crate::traits::HttpError;

/// Fatal failure of a session operation.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the credential failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// A successful response lacked one of the rotation headers.
    #[error("response is missing rotation header '{0}'")]
    MissingHeader(&'static str),

    /// The service answered with a status outside the protocol contract.
    #[error("unhandled response to {operation}: HTTP {status}: {body}")]
    UnhandledResponse {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The request could not be sent for a reason other than connectivity.
    #[error("request for {operation} failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: HttpError,
    },
}

impl SessionError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            SessionError::Persistence(err) => err.error_code(),
            SessionError::MissingHeader(_) => "E_AUTH_HEADER",
            SessionError::UnhandledResponse { .. } => "E_AUTH_UNHANDLED",
            SessionError::Transport { .. } => "E_AUTH_TRANSPORT",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Persistence(err) => err.user_message(),
            SessionError::MissingHeader(_) => {
                "The server did not return a usable session. Please try again later.".to_string()
            }
            SessionError::UnhandledResponse { status, .. } => {
                format!("The server returned an unexpected response (HTTP {}).", status)
            }
            SessionError::Transport { .. } => {
                "The request could not be sent. Check the configured server URL.".to_string()
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionError::Persistence(err) => err.category(),
            SessionError::MissingHeader(_) | SessionError::UnhandledResponse { .. } => {
                ErrorCategory::Server
            }
            SessionError::Transport { source, .. } => match source {
                HttpError::InvalidUrl(_) | HttpError::InvalidRequest(_) => {
                    ErrorCategory::Configuration
                }
                _ => ErrorCategory::Network,
            },
        }
    }
}
