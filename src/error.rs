use thiserror::Error;

/// Errors surfaced by [`StressTest::run`](crate::StressTest::run).
///
/// Workload failures are *not* errors; they are counted per operation in the
/// returned [`StressResult`](crate::StressResult). A run only fails on bad
/// configuration or on inability to create the worker pool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
