//! The stress runner: one named workload under fixed N-way concurrency for a
//! fixed wall-clock window.
use crate::atomics::RunAtomics;
use crate::config::RunConfig;
use crate::constants::DRAIN_GRACE;
use crate::error::Error;
use crate::gate::StartGate;
use crate::stats::StressResult;
use crate::worker::worker_loop;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Builder for a single named stress run.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use strain::StressTest;
///
/// let result = StressTest::new("feed")
///     .workers(32)
///     .duration(Duration::from_secs(10))
///     .run(|| Ok::<(), std::io::Error>(()))
///     .unwrap();
///
/// assert_eq!(result.err, 0);
/// ```
pub struct StressTest {
    config: RunConfig,
}

impl StressTest {
    pub fn new(name: &str) -> Self {
        Self {
            config: RunConfig::new(name),
        }
    }

    /// Number of OS worker threads driving the workload. Must be at least 1.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Wall-clock measurement window. A zero duration yields an all-zero
    /// result without blocking.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = duration;
        self
    }

    /// Sequential untimed invocations run before measurement to absorb
    /// cold-start costs. Defaults to `min(workers * 10, 200)`.
    pub fn warmup(mut self, iterations: usize) -> Self {
        self.config.warmup = Some(iterations);
        self
    }

    /// Latency slots reserved per worker. Operations beyond the total
    /// capacity still count toward `ok`/`err` but their latencies are
    /// dropped. Zero disables latency recording entirely.
    pub fn capacity_per_worker(mut self, capacity: usize) -> Self {
        self.config.capacity_per_worker = capacity;
        self
    }

    /// Run the workload to completion and aggregate the outcome.
    ///
    /// Workload failures never abort the run; they are tallied in
    /// [`StressResult::err`]. The call itself fails only on invalid
    /// configuration or failure to spawn the worker pool.
    pub fn run<W, E>(self, workload: W) -> Result<StressResult, Error>
    where
        W: Fn() -> Result<(), E> + Send + Sync + 'static,
    {
        run_stress(self.config, workload)
    }
}

impl From<RunConfig> for StressTest {
    fn from(config: RunConfig) -> Self {
        Self { config }
    }
}

#[instrument(name = "stress", skip_all, fields(name = config.name))]
pub(crate) fn run_stress<W, E>(config: RunConfig, workload: W) -> Result<StressResult, Error>
where
    W: Fn() -> Result<(), E> + Send + Sync + 'static,
{
    config.validate()?;
    info!("Running {} with config {:?}", config.name, &config);

    // Warmup absorbs cold-start costs (connection establishment, caches)
    // on the calling thread; outcomes are deliberately ignored.
    for _ in 0..config.warmup_iterations() {
        let _ = workload();
    }

    let atomics = Arc::new(RunAtomics::new(config.buffer_len()));
    let gate = Arc::new(StartGate::new());
    let workload = Arc::new(workload);
    let (done_tx, done_rx) = mpsc::channel();

    let mut handles = Vec::with_capacity(config.workers);
    for id in 0..config.workers {
        let worker_gate = Arc::clone(&gate);
        let atomics = Arc::clone(&atomics);
        let workload = Arc::clone(&workload);
        let done_tx = done_tx.clone();

        let spawned = thread::Builder::new()
            .name(format!("stress-worker-{id}"))
            .spawn(move || {
                worker_loop(&worker_gate, &atomics, &*workload);
                let _ = done_tx.send(id);
            });

        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                // Workers that did start must not block on the gate forever.
                gate.abort();
                return Err(Error::Spawn(e));
            }
        }
    }
    drop(done_tx);

    let start = gate.open(config.workers, config.duration);
    let deadline = start + config.duration;

    let finished = drain(&done_rx, config.workers, deadline);
    let wall_time = start.elapsed();

    if finished == config.workers {
        for handle in handles {
            let _ = handle.join();
        }
    } else {
        // Stuck workers are abandoned rather than blocking the run. Anything
        // they recorded so far is already in the shared atomics and stays
        // valid; anything after this point is discarded with the snapshot.
        warn!(
            abandoned = config.workers - finished,
            "workers still busy after drain grace period"
        );
    }

    let (ok, err) = atomics.counts();
    let result = StressResult::compute(&config, ok, err, atomics.latencies(), wall_time);
    info!("{result}");
    Ok(result)
}

/// Wait for workers to observe the deadline and exit, bounded by a grace
/// period past the deadline. Returns how many made it.
fn drain(done_rx: &mpsc::Receiver<usize>, workers: usize, deadline: Instant) -> usize {
    let grace_deadline = deadline + DRAIN_GRACE;
    let mut finished = 0;

    while finished < workers {
        let now = Instant::now();
        if now >= grace_deadline {
            break;
        }
        match done_rx.recv_timeout(grace_deadline - now) {
            Ok(id) => {
                trace!("worker {id} drained");
                finished += 1;
            }
            Err(RecvTimeoutError::Timeout) => break,
            // All senders gone; nothing more will arrive.
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    finished
}
