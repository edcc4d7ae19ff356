//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileCredentialStore`] - file-backed credential singleton
//! - [`JsonFileAchievements`] - achievements read from a JSON export
//! - [`TokioExecutor`] - background jobs on a tokio runtime
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - scripted HTTP responses
//! - [`mock::InMemoryCredentialStore`] - in-memory credential storage
//! - [`mock::InMemoryAchievements`] - in-memory achievement records
//! - [`mock::QueuedExecutor`] - jobs held until the test runs them

pub mod file_credentials;
pub mod json_achievements;
pub mod mock;
pub mod reqwest_http;
pub mod tokio_executor;

pub use file_credentials::FileCredentialStore;
pub use json_achievements::JsonFileAchievements;
pub use mock::{InMemoryAchievements, InMemoryCredentialStore, MockHttpClient, QueuedExecutor};
pub use reqwest_http::ReqwestHttpClient;
pub use tokio_executor::TokioExecutor;
