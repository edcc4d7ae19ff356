//! In-memory achievement source for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use crate::error::SourceError;
use crate::sync::AchievementRecord;
use crate::traits::AchievementSource;

/// Achievement source backed by a vector.
///
/// Clones share state. Every `all_since` call is recorded so tests can check
/// which checkpoint the pipeline used.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAchievements {
    records: Arc<Mutex<Vec<AchievementRecord>>>,
    queries: Arc<Mutex<Vec<DateTime<Utc>>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl InMemoryAchievements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<AchievementRecord>) -> Self {
        let source = Self::new();
        *source.records.lock().unwrap() = records;
        source
    }

    /// Add a record.
    pub fn push(&self, record: AchievementRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Configure whether reads should fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    /// `since` values of every read, in call order.
    pub fn queries(&self) -> Vec<DateTime<Utc>> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AchievementSource for InMemoryAchievements {
    async fn all_since(&self, since: DateTime<Utc>) -> Result<Vec<AchievementRecord>, SourceError> {
        self.queries.lock().unwrap().push(since);
        if *self.should_fail.lock().unwrap() {
            return Err(SourceError("mock source failure".to_string()));
        }
        let mut records: Vec<AchievementRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.created_at >= since)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }
}
