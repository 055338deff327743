use crate::error::Error;
use crate::stats::StressResult;
use crate::stress::StressTest;
use std::time::Duration;
#[allow(unused_imports)]
use tracing::{debug, info, warn};

/// Runs named stress tests strictly sequentially and aggregates their
/// results.
///
/// Sequential execution is enforced by `&mut self`: two scenarios never run
/// concurrently, so one scenario's load cannot skew another's measurements.
/// Rendering the collected results (tables, reports) is left to the caller.
#[derive(Default)]
pub struct StressSuite {
    results: Vec<StressResult>,
}

impl StressSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one test and record its result in the suite.
    pub fn run<W, E>(&mut self, test: StressTest, workload: W) -> Result<StressResult, Error>
    where
        W: Fn() -> Result<(), E> + Send + Sync + 'static,
    {
        let result = test.run(workload)?;
        self.results.push(result.clone());
        Ok(result)
    }

    pub fn results(&self) -> &[StressResult] {
        &self.results
    }

    /// Total successful operations across all recorded runs.
    pub fn total_ok(&self) -> u64 {
        self.results.iter().map(|r| r.ok).sum()
    }

    /// Summed wall time across all recorded runs.
    pub fn total_wall_time(&self) -> Duration {
        self.results.iter().map(|r| r.wall_time).sum()
    }
}
