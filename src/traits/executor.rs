//! Background executor trait abstraction.

use futures::future::BoxFuture;

/// A unit of background work.
pub type Job = BoxFuture<'static, ()>;

/// "Run this later" capability supplied by the host.
///
/// No ordering or mutual exclusion between jobs is implied.
pub trait Executor: Send + Sync {
    /// Schedule `job` to run asynchronously and return immediately.
    fn run_async(&self, job: Job);
}
