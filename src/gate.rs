use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Broadcast start gate shared by the runner and its workers.
///
/// Workers register readiness and block; the runner waits until every worker
/// has checked in, then publishes the deadline and wakes them all at once.
/// The measured window starts at that release instant, so early-spawned
/// workers cannot inflate throughput relative to late-spawned ones.
pub(crate) struct StartGate {
    state: Mutex<GateState>,
    cond: Condvar,
}

struct GateState {
    ready: usize,
    deadline: Option<Instant>,
}

impl StartGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                ready: 0,
                deadline: None,
            }),
            cond: Condvar::new(),
        }
    }

    /// Worker side: register readiness, block until release, return the
    /// shared deadline.
    pub fn wait(&self) -> Instant {
        let mut state = self.lock();
        state.ready += 1;
        self.cond.notify_all();
        loop {
            if let Some(deadline) = state.deadline {
                return deadline;
            }
            state = self.cond.wait(state).expect("start gate poisoned");
        }
    }

    /// Runner side: block until `workers` have registered, then release them
    /// with a deadline of `duration` from now. Returns the release instant.
    pub fn open(&self, workers: usize, duration: Duration) -> Instant {
        let mut state = self.lock();
        while state.ready < workers {
            state = self.cond.wait(state).expect("start gate poisoned");
        }
        let start = Instant::now();
        state.deadline = Some(start + duration);
        self.cond.notify_all();
        start
    }

    /// Release immediately with an already-expired deadline. Used when the
    /// runner fails partway through spawning, so workers that did start do
    /// not block forever.
    pub fn abort(&self) {
        let mut state = self.lock();
        state.deadline = Some(Instant::now());
        self.cond.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().expect("start gate poisoned")
    }
}
