use std::time::Duration;

/// Default worker count used by [`StressTest::new`](crate::StressTest::new).
pub const DEFAULT_WORKERS: usize = 32;

/// Default measured window.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(10);

/// Default number of latency slots reserved per worker. Operations beyond
/// this bound still count toward the success/error tallies but their
/// latencies are dropped, keeping memory fixed under arbitrary throughput.
pub const DEFAULT_CAPACITY_PER_WORKER: usize = 20_000;

/// Upper bound on derived warmup iterations when none are configured.
pub(crate) const DEFAULT_WARMUP_CAP: usize = 200;

/// How long the runner waits past the deadline for workers to finish their
/// in-flight operation before abandoning them.
pub(crate) const DRAIN_GRACE: Duration = Duration::from_secs(3);
