//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP operations (GET, POST, DELETE, multipart POST)
//! - [`CredentialStore`] - Singleton session credential persistence
//! - [`AchievementSource`] - Read access to locally earned achievements
//! - [`Executor`] - Host-supplied background job runner

pub mod achievements;
pub mod credentials;
pub mod executor;
pub mod http;

pub use achievements::AchievementSource;
pub use credentials::CredentialStore;
pub use executor::{Executor, Job};
pub use http::{FilePart, Headers, HttpClient, HttpError, Multipart, Response};
