use crate::config::RunConfig;
use std::fmt;
use std::time::Duration;

/// Immutable aggregate snapshot of one stress run.
///
/// `ok + err` is the number of timed workload invocations attempted (warmup
/// excluded). `samples` is the number of latencies actually recorded, which
/// is capped at `workers * capacity_per_worker`; throughput and the error
/// tally are exact regardless.
#[derive(Clone, Debug)]
pub struct StressResult {
    pub name: String,
    pub workers: usize,
    /// Configured measurement window.
    pub duration: Duration,
    pub ok: u64,
    pub err: u64,
    /// Number of recorded latency samples backing the latency statistics.
    pub samples: usize,
    /// Successful operations per wall-clock second.
    pub ops_per_second: f64,
    pub avg_latency: Duration,
    pub p95_latency: Duration,
    /// Measured elapsed time from worker release to drain completion.
    pub wall_time: Duration,
}

impl StressResult {
    pub(crate) fn compute(
        config: &RunConfig,
        ok: u64,
        err: u64,
        latencies_ns: Vec<u64>,
        wall_time: Duration,
    ) -> Self {
        let wall_secs = wall_time.as_secs_f64();
        let ops_per_second = if wall_secs > 0.0 {
            ok as f64 / wall_secs
        } else {
            0.0
        };
        let samples = latencies_ns.len();
        let summary = LatencySummary::from_nanos(latencies_ns);

        Self {
            name: config.name.clone(),
            workers: config.workers,
            duration: config.duration,
            ok,
            err,
            samples,
            ops_per_second,
            avg_latency: summary.mean,
            p95_latency: summary.p95,
            wall_time,
        }
    }

    /// Total operations attempted, successful or not.
    pub fn total(&self) -> u64 {
        self.ok + self.err
    }

    pub fn avg_latency_ms(&self) -> f64 {
        self.avg_latency.as_secs_f64() * 1e3
    }

    pub fn p95_latency_ms(&self) -> f64 {
        self.p95_latency.as_secs_f64() * 1e3
    }

    pub fn wall_time_ms(&self) -> f64 {
        self.wall_time.as_secs_f64() * 1e3
    }
}

impl fmt::Display for StressResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] workers={} dur={} ok={} err={} ops={:.1} avg={:.2}ms p95={:.2}ms",
            self.name,
            self.workers,
            humantime::format_duration(self.duration),
            self.ok,
            self.err,
            self.ops_per_second,
            self.avg_latency_ms(),
            self.p95_latency_ms(),
        )
    }
}

pub(crate) struct LatencySummary {
    pub mean: Duration,
    pub p95: Duration,
}

impl LatencySummary {
    /// Mean and p95 over the recorded samples. The p95 index is
    /// `floor(n * 0.95)` clamped to `n - 1`; zero samples yield zeros by
    /// convention rather than NaN.
    pub fn from_nanos(mut samples: Vec<u64>) -> Self {
        if samples.is_empty() {
            return Self {
                mean: Duration::ZERO,
                p95: Duration::ZERO,
            };
        }

        samples.sort_unstable();
        let sum: u128 = samples.iter().map(|&ns| u128::from(ns)).sum();
        let mean = Duration::from_nanos((sum / samples.len() as u128) as u64);

        let idx = (samples.len() as f64 * 0.95).floor() as usize;
        let idx = idx.min(samples.len() - 1);
        let p95 = Duration::from_nanos(samples[idx]);

        Self { mean, p95 }
    }
}
