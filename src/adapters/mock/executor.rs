//! Queueing executor for testing.

use std::sync::{Arc, Mutex};

use crate::traits::{Executor, Job};

/// Executor that holds submitted jobs until the test runs them.
#[derive(Clone, Default)]
pub struct QueuedExecutor {
    jobs: Arc<Mutex<Vec<Job>>>,
}

impl QueuedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    /// Run every queued job to completion, in submission order.
    ///
    /// Returns how many jobs ran.
    pub async fn run_pending(&self) -> usize {
        let jobs: Vec<Job> = std::mem::take(&mut *self.jobs.lock().unwrap());
        let count = jobs.len();
        for job in jobs {
            job.await;
        }
        count
    }
}

impl std::fmt::Debug for QueuedExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedExecutor")
            .field("pending", &self.pending())
            .finish()
    }
}

impl Executor for QueuedExecutor {
    fn run_async(&self, job: Job) {
        self.jobs.lock().unwrap().push(job);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_jobs_wait_until_drained() {
        let executor = QueuedExecutor::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = Arc::clone(&counter);
            executor.run_async(Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        assert_eq!(executor.pending(), 3);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        assert_eq!(executor.run_pending().await, 3);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(executor.pending(), 0);
    }
}
