use crate::atomics::RunAtomics;
use crate::gate::StartGate;
use std::time::Instant;

/// The per-thread measurement loop.
///
/// Blocks on the start gate, then invokes the workload until the shared
/// deadline, timing each call and routing the outcome into the shared
/// atomics. The deadline is only checked between iterations; an in-flight
/// invocation is allowed to finish so recorded latencies are real operation
/// costs, never truncated ones.
pub(crate) fn worker_loop<W, E>(gate: &StartGate, atomics: &RunAtomics, workload: &W)
where
    W: Fn() -> Result<(), E>,
{
    let deadline = gate.wait();
    while Instant::now() < deadline {
        let before = Instant::now();
        let res = workload();
        let elapsed = before.elapsed();
        atomics.record(res.is_ok(), elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn expired_deadline_attempts_nothing() {
        let gate = Arc::new(StartGate::new());
        let atomics = Arc::new(RunAtomics::new(8));

        let handle = {
            let gate = Arc::clone(&gate);
            let atomics = Arc::clone(&atomics);
            thread::spawn(move || worker_loop(&gate, &atomics, &|| Ok::<(), ()>(())))
        };

        gate.open(1, Duration::ZERO);
        handle.join().unwrap();

        let (ok, err) = atomics.counts();
        assert_eq!((ok, err), (0, 0));
        assert!(atomics.latencies().is_empty());
    }

    #[test]
    fn failures_are_counted_and_timed() {
        let gate = Arc::new(StartGate::new());
        let atomics = Arc::new(RunAtomics::new(1_024));

        let handle = {
            let gate = Arc::clone(&gate);
            let atomics = Arc::clone(&atomics);
            thread::spawn(move || {
                worker_loop(&gate, &atomics, &|| {
                    thread::sleep(Duration::from_millis(1));
                    Err::<(), &str>("boom")
                })
            })
        };

        gate.open(1, Duration::from_millis(50));
        handle.join().unwrap();

        let (ok, err) = atomics.counts();
        assert_eq!(ok, 0);
        assert!(err > 0);

        let latencies = atomics.latencies();
        assert_eq!(latencies.len() as u64, err);
        assert!(latencies.iter().all(|&ns| ns >= 1_000_000));
    }
}
