use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Success/error tallies shared by all workers of one run. Increment-only;
/// a new run gets fresh counters.
pub(crate) struct Counters {
    ok: AtomicU64,
    err: AtomicU64,
}

impl Counters {
    fn new() -> Self {
        Self {
            ok: AtomicU64::new(0),
            err: AtomicU64::new(0),
        }
    }

    fn record(&self, success: bool) {
        if success {
            self.ok.fetch_add(1, Ordering::Relaxed);
        } else {
            self.err.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn get(&self) -> (u64, u64) {
        (self.ok.load(Ordering::Relaxed), self.err.load(Ordering::Relaxed))
    }
}

/// Pre-allocated, bounded latency store written concurrently via an atomic
/// claim cursor and read once after the run.
///
/// Each completed operation claims the next slot with `fetch_add`; claims
/// past the end are dropped so memory stays fixed no matter how fast the
/// workload runs. Dropped claims still count toward [`Counters`].
pub(crate) struct LatencyBuffer {
    slots: Vec<AtomicU64>,
    cursor: AtomicUsize,
}

impl LatencyBuffer {
    fn with_len(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| AtomicU64::new(0)).collect(),
            cursor: AtomicUsize::new(0),
        }
    }

    fn push(&self, elapsed: Duration) {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        if let Some(slot) = self.slots.get(idx) {
            slot.store(saturating_nanos(elapsed), Ordering::Relaxed);
        }
    }

    fn recorded(&self) -> usize {
        self.cursor.load(Ordering::Relaxed).min(self.slots.len())
    }

    fn snapshot(&self) -> Vec<u64> {
        self.slots[..self.recorded()]
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .collect()
    }
}

/// The shared hot-path state of one run, cloned (via `Arc`) into every
/// worker. No mutex is held while recording an outcome.
pub(crate) struct RunAtomics {
    counters: Counters,
    latency: LatencyBuffer,
}

impl RunAtomics {
    pub fn new(buffer_len: usize) -> Self {
        Self {
            counters: Counters::new(),
            latency: LatencyBuffer::with_len(buffer_len),
        }
    }

    pub fn record(&self, success: bool, elapsed: Duration) {
        self.counters.record(success);
        self.latency.push(elapsed);

        #[cfg(feature = "metrics")]
        {
            metrics::histogram!("stress_latency_ns").record(elapsed.as_nanos() as f64);
            if success {
                metrics::counter!("stress_success_total").increment(1);
            } else {
                metrics::counter!("stress_error_total").increment(1);
            }
        }
    }

    pub fn counts(&self) -> (u64, u64) {
        self.counters.get()
    }

    pub fn latencies(&self) -> Vec<u64> {
        self.latency.snapshot()
    }
}

fn saturating_nanos(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
}
