//! Achievement sync pipeline.
//!
//! One sync job runs four steps, aborting on the first failure:
//!
//! 1. fetch the checkpoint (GET syncs; `since` is the latest `created_at`)
//! 2. gather local records created at or after `since`
//! 3. serialize the wire objects and zlib-compress them
//! 4. upload the file as multipart with the client UUID
//!
//! A failed job leaves no partial state behind; the next trigger starts over.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::achievement::{WireAchievement, WIRE_SCHEMA_VERSION};
use super::dispatch::DispatchOutcome;
use super::payload::{self, PAYLOAD_CONTENT_TYPE, PAYLOAD_FILE_NAME};
use crate::auth::SessionManager;
use crate::config::endpoints;
use crate::error::{SyncError, SyncStage};
use crate::traits::{AchievementSource, Executor, Multipart, Response};

/// Multipart field carrying the client identifier.
pub const CLIENT_UUID_FIELD: &str = "client_uuid";

/// Multipart field carrying the compressed achievements.
pub const ACHIEVEMENTS_FIELD: &str = "achievements_file";

/// One element of the checkpoint list. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct SyncEntry {
    created_at: DateTime<Utc>,
}

/// What a completed sync job did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Checkpoint the gather step started from
    pub since: DateTime<Utc>,
    /// Number of achievements uploaded
    pub uploaded: usize,
    /// Size of the compressed file
    pub compressed_bytes: usize,
    /// Status of the upload response
    pub status: u16,
    /// Wire schema the payload was encoded with
    pub schema_version: u32,
}

/// Runs sync jobs against the leaderboard service.
pub struct SyncPipeline {
    session: SessionManager,
    source: Arc<dyn AchievementSource>,
}

impl SyncPipeline {
    pub fn new(session: SessionManager, source: Arc<dyn AchievementSource>) -> Self {
        Self { session, source }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Submit a sync job if a session is active.
    ///
    /// Logged out means no job and no network traffic.
    pub async fn sync_if_logged_in(self: &Arc<Self>, executor: &dyn Executor) -> DispatchOutcome {
        match self.session.is_logged_in().await {
            Ok(true) => {}
            Ok(false) => {
                debug!("Not logged in, skipping achievement sync");
                return DispatchOutcome::Skipped;
            }
            Err(err) => {
                warn!(error = %err, "Could not read credential, skipping achievement sync");
                return DispatchOutcome::Skipped;
            }
        }

        let pipeline = Arc::clone(self);
        executor.run_async(Box::pin(async move {
            match pipeline.sync().await {
                Ok(report) => info!(
                    uploaded = report.uploaded,
                    bytes = report.compressed_bytes,
                    status = report.status,
                    "Achievement sync finished"
                ),
                Err(err) => error!(
                    code = err.error_code(),
                    category = %err.category(),
                    error = %err,
                    "Achievement sync failed"
                ),
            }
        }));
        DispatchOutcome::Submitted
    }

    /// Run one sync job to completion.
    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        let since = self.fetch_checkpoint().await?;
        let achievements = self.gather(since).await?;
        let compressed = payload::encode(&achievements)?;
        let compressed_bytes = compressed.len();
        info!(
            since = %since.to_rfc3339(),
            schema = WIRE_SCHEMA_VERSION,
            count = achievements.len(),
            bytes = compressed_bytes,
            "Uploading achievements"
        );
        let response = self.upload(compressed).await?;
        Ok(SyncReport {
            since,
            uploaded: achievements.len(),
            compressed_bytes,
            status: response.status,
            schema_version: WIRE_SCHEMA_VERSION,
        })
    }

    /// Latest `created_at` in the server's sync history, or the minimum
    /// representable time when the history is empty.
    pub async fn fetch_checkpoint(&self) -> Result<DateTime<Utc>, SyncError> {
        let url = self.session.config().endpoint(endpoints::SYNCS);
        let headers = self.session.request_headers().await?;

        let response = self
            .session
            .http()
            .get(&url, &headers)
            .await
            .map_err(|source| SyncError::Connection {
                stage: SyncStage::Checkpoint,
                source,
            })?;

        if response.status != 200 {
            return Err(rejected(SyncStage::Checkpoint, &response));
        }
        self.session.absorb_rotation(&response).await?;

        let entries: Vec<SyncEntry> = response
            .json()
            .map_err(|e| SyncError::InvalidCheckpoint(e.to_string()))?;
        let since = latest_created_at(&entries);
        debug!(syncs = entries.len(), since = %since.to_rfc3339(), "Fetched sync checkpoint");
        Ok(since)
    }

    /// Wire objects for every local record created at or after `since`.
    pub async fn gather(&self, since: DateTime<Utc>) -> Result<Vec<WireAchievement>, SyncError> {
        let records = self.source.all_since(since).await?;
        Ok(payload::to_wire(&records))
    }

    /// Upload a compressed payload.
    ///
    /// Auth headers are read from the store again here, so a token rotated
    /// by the checkpoint response is the one that is sent.
    pub async fn upload(&self, compressed: Vec<u8>) -> Result<Response, SyncError> {
        let config = self.session.config();
        let url = config.endpoint(endpoints::SYNCS);
        let headers = self.session.current_auth_headers().await?;
        let form = Multipart::new()
            .text(CLIENT_UUID_FIELD, config.client_uuid.clone())
            .file(ACHIEVEMENTS_FIELD, PAYLOAD_FILE_NAME, PAYLOAD_CONTENT_TYPE, compressed);

        let response = self
            .session
            .http()
            .post_multipart(&url, form, &headers, Some(config.upload_timeout))
            .await
            .map_err(|source| SyncError::Connection {
                stage: SyncStage::Upload,
                source,
            })?;

        if !response.is_success() {
            return Err(rejected(SyncStage::Upload, &response));
        }
        self.session.absorb_rotation(&response).await?;
        Ok(response)
    }
}

fn latest_created_at(entries: &[SyncEntry]) -> DateTime<Utc> {
    entries
        .iter()
        .map(|entry| entry.created_at)
        .max()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn rejected(stage: SyncStage, response: &Response) -> SyncError {
    SyncError::Status {
        stage,
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    }
}
