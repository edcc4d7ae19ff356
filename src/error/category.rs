//! Error category classification.
//!
//! Categories give callers (the CLI, a host UI) one place to decide how to
//! present a failure without matching on every concrete variant.

use std::fmt;

/// High-level categorization of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport failures (connection refused, DNS, timeout).
    Network,

    /// The service rejected the session credential.
    Auth,

    /// The service answered with a status this client does not handle.
    Server,

    /// Local encoding failures or malformed service payloads.
    Client,

    /// Local storage or OS failures.
    System,

    /// Invalid configuration values.
    Configuration,
}

impl ErrorCategory {
    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns a user-friendly description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Network connectivity issue",
            ErrorCategory::Auth => "Authentication problem",
            ErrorCategory::Server => "Unexpected response from the leaderboard service",
            ErrorCategory::Client => "Application error",
            ErrorCategory::System => "Local storage error",
            ErrorCategory::Configuration => "Configuration problem",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
