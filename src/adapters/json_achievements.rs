//! Achievement source reading a JSON export.
//!
//! The file holds a JSON array of [`AchievementRecord`] objects as written
//! by the streak engine's export. It is read fresh on every call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SourceError;
use crate::sync::AchievementRecord;
use crate::traits::AchievementSource;

#[derive(Debug, Clone)]
pub struct JsonFileAchievements {
    path: PathBuf,
}

impl JsonFileAchievements {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AchievementSource for JsonFileAchievements {
    async fn all_since(&self, since: DateTime<Utc>) -> Result<Vec<AchievementRecord>, SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SourceError(format!("failed to read {}: {}", self.path.display(), e)))?;
        let records: Vec<AchievementRecord> = serde_json::from_slice(&bytes)
            .map_err(|e| SourceError(format!("failed to parse {}: {}", self.path.display(), e)))?;

        let total = records.len();
        let mut selected: Vec<AchievementRecord> = records
            .into_iter()
            .filter(|record| record.created_at >= since)
            .collect();
        selected.sort_by_key(|record| record.created_at);
        debug!(total, selected = selected.len(), "Read achievement export");
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_and_filters_export() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("achievements.json");
        std::fs::write(
            &path,
            r#"[
                {"id":2,"medal_id":"triple_kill","deck_id":1,"created_at":"2024-02-01T10:00:00Z"},
                {"id":1,"medal_id":"double_kill","deck_id":1,"created_at":"2024-01-01T10:00:00Z",
                 "medal":{"name":"Double Kill","image":"double_kill.png"}}
            ]"#,
        )
        .unwrap();
        let source = JsonFileAchievements::new(&path);

        let all = source.all_since(DateTime::<Utc>::MIN_UTC).await.unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(all[0].medal.is_some());

        let since = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let recent = source.all_since(since).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].medal_id, "triple_kill");
    }

    #[tokio::test]
    async fn test_missing_file_is_source_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = JsonFileAchievements::new(temp_dir.path().join("absent.json"));
        let err = source.all_since(DateTime::<Utc>::MIN_UTC).await.unwrap_err();
        assert!(err.0.contains("failed to read"));
    }

    #[tokio::test]
    async fn test_malformed_file_is_source_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = JsonFileAchievements::new(&path)
            .all_since(DateTime::<Utc>::MIN_UTC)
            .await
            .unwrap_err();
        assert!(err.0.contains("failed to parse"));
    }
}
