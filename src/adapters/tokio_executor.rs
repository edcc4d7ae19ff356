//! Tokio-backed executor adapter.

use tokio::runtime::Handle;
use tracing::debug;

use crate::traits::{Executor, Job};

/// Runs jobs as tasks on a tokio runtime.
///
/// # Example
///
/// ```ignore
/// use killstreaks::adapters::TokioExecutor;
///
/// let runtime = tokio::runtime::Runtime::new()?;
/// let executor = TokioExecutor::new(runtime.handle().clone());
/// ```
#[derive(Debug, Clone)]
pub struct TokioExecutor {
    handle: Handle,
}

impl TokioExecutor {
    /// Spawn onto the runtime behind `handle`.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Spawn onto the runtime the caller is running in.
    ///
    /// Returns `None` outside a runtime.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Executor for TokioExecutor {
    fn run_async(&self, job: Job) {
        debug!("Spawning background job");
        // Detached: the job reports its own failures.
        drop(self.handle.spawn(job));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_current_outside_runtime() {
        assert!(TokioExecutor::current().is_none());
    }

    #[tokio::test]
    async fn test_runs_job() {
        let executor = TokioExecutor::current().unwrap();
        let ran = Arc::new(AtomicBool::new(false));
        let (tx, rx) = tokio::sync::oneshot::channel();

        let flag = Arc::clone(&ran);
        executor.run_async(Box::pin(async move {
            flag.store(true, Ordering::SeqCst);
            let _ = tx.send(());
        }));

        rx.await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }
}
