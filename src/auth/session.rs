//! Session protocol: login, logout and token validation.
//!
//! The session is a two-state machine, `LoggedOut` and `Active(credential)`.
//! Transitions are driven by response status codes:
//!
//! | Operation | 200 | Handled failure | Anything else |
//! |-----------|-----|-----------------|---------------|
//! | login | persist rotation headers, `LoggedIn` | 401 `Unauthorized` (credential untouched) | `UnhandledResponse` |
//! | logout | clear credential, `LoggedOut` | 404 `NotFound` (credential untouched) | `UnhandledResponse` |
//! | validate | persist rotation headers, `Refreshed` | 401 clear credential, `Invalidated` | `UnhandledResponse` |
//!
//! Transport failures (refused connection, timeout) become `ConnectionFailed`
//! for all three operations and never touch the stored credential.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth::credentials::Credential;
use crate::auth::headers::{self, build_request_headers, credential_from_response};
use crate::config::{endpoints, ClientConfig};
use crate::error::{PersistenceError, SessionError};
use crate::traits::{CredentialStore, Headers, HttpClient, HttpError, Response};

/// Outcome of [`SessionManager::login`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoginResult {
    /// Credentials were accepted and the rotation headers are already persisted.
    /// Carries the `data` member of the response body.
    LoggedIn(Value),
    /// The service rejected the email/password pair. Carries the response body.
    Unauthorized(Value),
    /// The service could not be reached.
    ConnectionFailed,
}

/// Outcome of [`SessionManager::logout`].
#[derive(Debug, Clone, PartialEq)]
pub enum LogoutResult {
    /// The server ended the session and the local credential was cleared.
    LoggedOut,
    /// The server had no such session. The local credential is left as is.
    NotFound(Value),
    /// The service could not be reached.
    ConnectionFailed,
}

/// Outcome of [`SessionManager::validate_token`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// The token is valid and the rotated credential was persisted.
    Refreshed,
    /// The server rejected the token and the local credential was cleared.
    Invalidated(Value),
    /// The service could not be reached.
    ConnectionFailed,
}

/// Local view of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    Active { uid: String },
}

/// Owns the rotating-token protocol against the leaderboard service.
///
/// Every operation reads the credential fresh from the store, so several
/// managers (or a manager and a sync pipeline) can share one store.
#[derive(Clone)]
pub struct SessionManager {
    http: Arc<dyn HttpClient>,
    store: Arc<dyn CredentialStore>,
    config: Arc<ClientConfig>,
    shared_headers: Headers,
}

impl SessionManager {
    /// Create a manager using [`headers::shared_headers`] as request defaults.
    pub fn new(
        http: Arc<dyn HttpClient>,
        store: Arc<dyn CredentialStore>,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self {
            http,
            store,
            config,
            shared_headers: headers::shared_headers(),
        }
    }

    /// Replace the default headers sent with every JSON request.
    pub fn with_shared_headers(mut self, shared_headers: Headers) -> Self {
        self.shared_headers = shared_headers;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &Arc<dyn HttpClient> {
        &self.http
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Sign in with email and password.
    ///
    /// On success the rotation headers are persisted *before* this returns,
    /// so anything reacting to `LoggedIn` sees the new credential.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, SessionError> {
        let url = self.config.endpoint(endpoints::SIGN_IN);
        let body = serde_json::json!({
            "email": email,
            "password": password,
        })
        .to_string();

        debug!(url = %url, "Sending sign-in request");
        let response = match self.http.post(&url, &body, &self.shared_headers).await {
            Ok(response) => response,
            Err(err) => {
                return transport_failure("login", err).map(|()| LoginResult::ConnectionFailed)
            }
        };

        match response.status {
            200 => {
                let credential = credential_from_response(&response)?;
                self.store.save(&credential).await?;
                info!(uid = %credential.uid, "Logged in");

                let data = match response.json_or_text() {
                    Value::Object(mut body) if body.contains_key("data") => {
                        body.remove("data").unwrap_or_default()
                    }
                    other => other,
                };
                Ok(LoginResult::LoggedIn(data))
            }
            401 => {
                warn!("Sign-in rejected by server");
                Ok(LoginResult::Unauthorized(response.json_or_text()))
            }
            _ => Err(unhandled("login", &response)),
        }
    }

    /// Sign out of the current session.
    pub async fn logout(&self) -> Result<LogoutResult, SessionError> {
        let url = self.config.endpoint(endpoints::SIGN_OUT);
        let headers = self.request_headers().await?;

        debug!(url = %url, "Sending sign-out request");
        let response = match self.http.delete(&url, &headers).await {
            Ok(response) => response,
            Err(err) => {
                return transport_failure("logout", err).map(|()| LogoutResult::ConnectionFailed)
            }
        };

        match response.status {
            200 => {
                self.store.clear().await?;
                info!("Logged out");
                Ok(LogoutResult::LoggedOut)
            }
            404 => {
                warn!("Sign-out found no session on the server");
                Ok(LogoutResult::NotFound(response.json_or_text()))
            }
            _ => Err(unhandled("logout", &response)),
        }
    }

    /// Check the current token with the server, rotating it on success.
    ///
    /// Callers should run this periodically or before a sync to keep the
    /// rotating token alive.
    pub async fn validate_token(&self) -> Result<ValidationResult, SessionError> {
        let url = self.config.endpoint(endpoints::VALIDATE_TOKEN);
        let headers = self.request_headers().await?;

        debug!(url = %url, "Sending token validation request");
        let response = match self.http.get(&url, &headers).await {
            Ok(response) => response,
            Err(err) => {
                return transport_failure("validate_token", err)
                    .map(|()| ValidationResult::ConnectionFailed)
            }
        };

        match response.status {
            200 => {
                let credential = credential_from_response(&response)?;
                self.store.save(&credential).await?;
                info!(uid = %credential.uid, "Session token refreshed");
                Ok(ValidationResult::Refreshed)
            }
            401 => {
                self.store.clear().await?;
                warn!("Session token invalidated by server");
                Ok(ValidationResult::Invalidated(response.json_or_text()))
            }
            _ => Err(unhandled("validate_token", &response)),
        }
    }

    /// Local check: both access token and uid are present.
    pub async fn is_logged_in(&self) -> Result<bool, PersistenceError> {
        Ok(self.store.load().await?.is_logged_in())
    }

    /// Local view of the session.
    pub async fn status(&self) -> Result<SessionState, PersistenceError> {
        let credential = self.store.load().await?;
        Ok(if credential.is_logged_in() {
            SessionState::Active {
                uid: credential.uid,
            }
        } else {
            SessionState::LoggedOut
        })
    }

    /// The five rotation headers for the stored credential.
    pub async fn current_auth_headers(&self) -> Result<Headers, PersistenceError> {
        Ok(headers::auth_headers(&self.store.load().await?))
    }

    /// Shared headers overlaid with the stored credential.
    pub async fn request_headers(&self) -> Result<Headers, PersistenceError> {
        let credential = self.store.load().await?;
        Ok(build_request_headers(&self.shared_headers, &credential))
    }

    /// Persist the rotation headers of a successful authenticated response,
    /// if it carries a complete set.
    ///
    /// Returns whether a new credential was stored.
    pub async fn absorb_rotation(&self, response: &Response) -> Result<bool, PersistenceError> {
        if !response.is_success() {
            return Ok(false);
        }
        match headers::rotated_credential(response) {
            Some(credential) => {
                self.persist(&credential).await?;
                debug!(uid = %credential.uid, "Captured rotated session token");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn persist(&self, credential: &Credential) -> Result<(), PersistenceError> {
        self.store.save(credential).await
    }
}

/// Connection failures become a typed outcome; anything else is fatal.
fn transport_failure(operation: &'static str, err: HttpError) -> Result<(), SessionError> {
    if err.is_connection_failure() {
        warn!(operation, error = %err, "Could not reach leaderboard service");
        Ok(())
    } else {
        Err(SessionError::Transport {
            operation,
            source: err,
        })
    }
}

fn unhandled(operation: &'static str, response: &Response) -> SessionError {
    SessionError::UnhandledResponse {
        operation,
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    }
}
