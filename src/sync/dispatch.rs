//! Review-activity trigger.
//!
//! The host calls [`SyncDispatcher::on_review_activity`] after every review
//! event. The call returns as soon as the job is handed to the executor; it
//! never waits for the network.

use std::sync::Arc;

use super::pipeline::SyncPipeline;
use crate::traits::Executor;

/// Whether a trigger submitted a sync job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No active session; nothing was scheduled.
    Skipped,
    /// A sync job was handed to the executor.
    Submitted,
}

/// Glue between review events and the sync pipeline.
pub struct SyncDispatcher {
    pipeline: Arc<SyncPipeline>,
    executor: Arc<dyn Executor>,
}

impl SyncDispatcher {
    pub fn new(pipeline: Arc<SyncPipeline>, executor: Arc<dyn Executor>) -> Self {
        Self { pipeline, executor }
    }

    pub fn pipeline(&self) -> &Arc<SyncPipeline> {
        &self.pipeline
    }

    /// Schedule a sync if logged in.
    pub async fn sync_if_logged_in(&self) -> DispatchOutcome {
        self.pipeline.sync_if_logged_in(self.executor.as_ref()).await
    }

    /// Hook for the host's review events.
    pub async fn on_review_activity(&self) -> DispatchOutcome {
        self.sync_if_logged_in().await
    }
}
