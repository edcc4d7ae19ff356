//! Authentication for the leaderboard service.
//!
//! - [`credentials`] - the persisted credential record
//! - [`headers`] - the rotating-token header contract
//! - [`session`] - login, logout and token validation

pub mod credentials;
pub mod headers;
pub mod session;

pub use credentials::{Credential, CredentialsManager};
pub use session::{LoginResult, LogoutResult, SessionManager, SessionState, ValidationResult};
