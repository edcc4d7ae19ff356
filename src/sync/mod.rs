//! Achievement sync.
//!
//! - [`achievement`] - local records and the upload wire schema
//! - [`payload`] - JSON encoding and zlib compression
//! - [`pipeline`] - checkpoint, gather, compress and upload
//! - [`dispatch`] - review-activity trigger

pub mod achievement;
pub mod dispatch;
pub mod payload;
pub mod pipeline;

pub use achievement::{AchievementRecord, MedalDisplay, WireAchievement, WIRE_SCHEMA_VERSION};
pub use dispatch::{DispatchOutcome, SyncDispatcher};
pub use pipeline::{SyncPipeline, SyncReport};
