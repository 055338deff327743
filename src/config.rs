use crate::constants::{
    DEFAULT_CAPACITY_PER_WORKER, DEFAULT_DURATION, DEFAULT_WARMUP_CAP, DEFAULT_WORKERS,
};
use crate::error::Error;
use std::time::Duration;

/// Parameters for a single stress run. Immutable once the run starts.
///
/// Usually built through [`StressTest`](crate::StressTest) rather than
/// directly.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub name: String,
    pub workers: usize,
    pub duration: Duration,
    /// Sequential untimed invocations before measurement. `None` derives
    /// `min(workers * 10, 200)`.
    pub warmup: Option<usize>,
    pub capacity_per_worker: usize,
}

impl RunConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            workers: DEFAULT_WORKERS,
            duration: DEFAULT_DURATION,
            warmup: None,
            capacity_per_worker: DEFAULT_CAPACITY_PER_WORKER,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.workers == 0 {
            return Err(Error::InvalidWorkerCount);
        }
        Ok(())
    }

    pub(crate) fn warmup_iterations(&self) -> usize {
        self.warmup
            .unwrap_or_else(|| (self.workers * 10).min(DEFAULT_WARMUP_CAP))
    }

    pub(crate) fn buffer_len(&self) -> usize {
        self.workers.saturating_mul(self.capacity_per_worker)
    }
}
