//! Mock implementations for testing.
//!
//! Every mock shares state between clones so a test can hand one handle to
//! the code under test and inspect through another.

pub mod achievements;
pub mod credentials;
pub mod executor;
pub mod http;

pub use achievements::InMemoryAchievements;
pub use credentials::InMemoryCredentialStore;
pub use executor::QueuedExecutor;
pub use http::MockHttpClient;
