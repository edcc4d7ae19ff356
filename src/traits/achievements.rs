//! Achievement source trait abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SourceError;
use crate::sync::AchievementRecord;

/// Read-only access to locally earned achievements.
///
/// The streak engine that produces records owns them; the sync layer only
/// reads a time-bounded slice.
#[async_trait]
pub trait AchievementSource: Send + Sync {
    /// All records created at or after `since`, oldest first.
    async fn all_since(&self, since: DateTime<Utc>) -> Result<Vec<AchievementRecord>, SourceError>;
}
