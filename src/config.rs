//! Client configuration.
//!
//! Use the builder methods to customize, or [`ClientConfig::from_env`] to
//! apply `KILLSTREAKS_*` environment overrides on top of the defaults.
//!
//! # Example
//!
//! ```ignore
//! use killstreaks::config::ClientConfig;
//!
//! let config = ClientConfig::default()
//!     .with_base_url("http://localhost:3000")
//!     .with_upload_timeout(std::time::Duration::from_secs(10));
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Default leaderboard service.
pub const DEFAULT_BASE_URL: &str = "https://killstreaks-api.herokuapp.com";

/// Identifier this client reports with every sync upload.
pub const DEFAULT_CLIENT_UUID: &str = "fda4cb0d-b6e3-4e5f-b7b1-d338351ccead";

/// Upload timeout for the achievements file.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(5);

pub const ENV_BASE_URL: &str = "KILLSTREAKS_API_URL";
pub const ENV_CLIENT_UUID: &str = "KILLSTREAKS_CLIENT_UUID";
pub const ENV_CREDENTIALS: &str = "KILLSTREAKS_CREDENTIALS";
pub const ENV_UPLOAD_TIMEOUT_SECS: &str = "KILLSTREAKS_UPLOAD_TIMEOUT_SECS";

/// Service endpoint paths.
pub mod endpoints {
    pub const SIGN_IN: &str = "/api/v1/auth/sign_in";
    pub const SIGN_OUT: &str = "/api/v1/auth/sign_out";
    pub const VALIDATE_TOKEN: &str = "/api/v1/auth/validate_token";
    pub const SYNCS: &str = "/api/v1/syncs";
}

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid client UUID '{value}': {source}")]
    InvalidClientUuid {
        value: String,
        #[source]
        source: uuid::Error,
    },

    #[error("invalid upload timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),

    #[error("base URL must not be empty")]
    EmptyBaseUrl,
}

impl ConfigError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Configuration for the session and sync clients.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the leaderboard service
    pub base_url: String,
    /// Client identifier sent with sync uploads
    pub client_uuid: String,
    /// Timeout for the achievements upload
    pub upload_timeout: Duration,
    /// Timeout for auth and checkpoint requests (`None` = HTTP client default)
    pub request_timeout: Option<Duration>,
    /// Override for the credential file location
    pub credentials_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_uuid: DEFAULT_CLIENT_UUID.to_string(),
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
            request_timeout: None,
            credentials_path: None,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which maps variable names to values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(url);
        }
        if let Some(uuid) = lookup(ENV_CLIENT_UUID) {
            config = config.with_client_uuid(uuid);
        }
        if let Some(path) = lookup(ENV_CREDENTIALS) {
            config = config.with_credentials_path(path);
        }
        if let Some(secs) = lookup(ENV_UPLOAD_TIMEOUT_SECS) {
            let parsed = secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(secs.clone()))?;
            config = config.with_upload_timeout(Duration::from_secs(parsed));
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        uuid::Uuid::parse_str(&self.client_uuid).map_err(|source| {
            ConfigError::InvalidClientUuid {
                value: self.client_uuid.clone(),
                source,
            }
        })?;
        Ok(())
    }

    /// Set the service base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the client identifier.
    pub fn with_client_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.client_uuid = uuid.into();
        self
    }

    /// Set the upload timeout.
    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    /// Set the timeout for non-upload requests.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the credential file location.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Absolute URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
