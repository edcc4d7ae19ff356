//! Error types for the session and sync layers.
//!
//! Expected protocol outcomes (401, 404, connection failure on session calls)
//! are *not* errors; they are variants of the typed results in
//! [`crate::auth::session`]. The enums here cover everything that aborts an
//! operation:
//!
//! | Type | Raised by |
//! |------|-----------|
//! | [`PersistenceError`] | credential store reads and writes |
//! | [`SessionError`] | login, logout and token validation |
//! | [`SyncError`] | the sync job (checkpoint fetch, gather, upload) |
//!
//! Each exposes `error_code()` for logs, `user_message()` for display and
//! `category()` for coarse handling decisions.

mod category;
mod persistence;
mod session;
mod sync;

pub use category::ErrorCategory;
pub use persistence::PersistenceError;
pub use session::SessionError;
pub use sync::{PayloadError, SourceError, SyncError, SyncStage};
