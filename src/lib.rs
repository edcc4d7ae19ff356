//! Killstreaks - leaderboard client for review medals
//!
//! Signs a player in with a rotating-token session and uploads the medals
//! they earn to the leaderboard service. This library exposes modules for
//! use in integration tests and by the host application.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod error;
pub mod sync;
pub mod traits;
