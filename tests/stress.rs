use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use strain::{Error, StressSuite, StressTest};

#[test]
fn instant_workload_only_succeeds() {
    let result = StressTest::new("instant")
        .workers(8)
        .duration(Duration::from_secs(1))
        .warmup(0)
        .run(|| Ok::<(), ()>(()))
        .unwrap();

    assert!(result.ok > 0);
    assert_eq!(result.err, 0);

    // Throughput is derived from the same counters and wall clock.
    let expected = result.ok as f64 / result.wall_time.as_secs_f64();
    assert!((result.ops_per_second - expected).abs() < 1e-6);
}

#[test]
fn every_attempt_is_counted_exactly_once() {
    let calls = Arc::new(AtomicU64::new(0));
    let result = {
        let calls = Arc::clone(&calls);
        StressTest::new("counted")
            .workers(8)
            .duration(Duration::from_millis(300))
            .warmup(0)
            .run(move || {
                let n = calls.fetch_add(1, Ordering::Relaxed);
                if n % 2 == 0 {
                    Ok(())
                } else {
                    Err("odd")
                }
            })
            .unwrap()
    };

    assert_eq!(result.total(), calls.load(Ordering::Relaxed));
    // Alternating outcomes split the tallies down the middle.
    assert!(result.ok.abs_diff(result.err) <= 1);
}

#[test]
#[ntest::timeout(60_000)]
fn sleepy_workload_latency_statistics() {
    let result = StressTest::new("sleepy")
        .workers(4)
        .duration(Duration::from_secs(1))
        .warmup(0)
        .run(|| {
            thread::sleep(Duration::from_millis(10));
            Ok::<(), ()>(())
        })
        .unwrap();

    assert_eq!(result.err, 0);
    // 4 workers * ~100 ops/s, with head-room for scheduler jitter.
    assert!(
        result.ok >= 150 && result.ok <= 420,
        "ok out of range: {}",
        result.ok
    );
    assert!(
        result.avg_latency >= Duration::from_millis(9)
            && result.avg_latency <= Duration::from_millis(25),
        "avg out of range: {:?}",
        result.avg_latency
    );
    assert!(
        result.p95_latency >= result.avg_latency.mul_f64(0.9)
            && result.p95_latency <= Duration::from_millis(40),
        "p95 out of range: {:?}",
        result.p95_latency
    );
    assert_eq!(result.samples as u64, result.total());
}

#[test]
fn all_failing_workload_still_records_latencies() {
    let result = StressTest::new("failing")
        .workers(4)
        .duration(Duration::from_millis(250))
        .warmup(0)
        .run(|| Err::<(), &str>("boom"))
        .unwrap();

    assert_eq!(result.ok, 0);
    assert!(result.err > 0);
    assert_eq!(result.ops_per_second, 0.0);
    assert_eq!(
        result.samples as u64,
        result.err.min(4 * 20_000),
        "failed attempts are timed too"
    );
}

#[test]
fn latency_buffer_never_overflows() {
    let result = StressTest::new("bounded")
        .workers(2)
        .duration(Duration::from_millis(300))
        .warmup(0)
        .capacity_per_worker(10)
        .run(|| Ok::<(), ()>(()))
        .unwrap();

    // An instant workload blows far past 20 claims in 300ms; the tallies
    // keep counting while the buffer stays at capacity.
    assert!(result.total() > 20);
    assert_eq!(result.samples, 20);
}

#[test]
#[ntest::timeout(2_000)]
fn zero_duration_returns_promptly_with_zeroes() {
    let result = StressTest::new("zero")
        .workers(4)
        .duration(Duration::ZERO)
        .warmup(0)
        .run(|| Ok::<(), ()>(()))
        .unwrap();

    assert_eq!(result.ok, 0);
    assert_eq!(result.err, 0);
    assert_eq!(result.samples, 0);
    assert_eq!(result.ops_per_second, 0.0);
    assert_eq!(result.avg_latency, Duration::ZERO);
    assert_eq!(result.p95_latency, Duration::ZERO);
}

#[test]
fn warmup_is_untimed_and_uncounted() {
    let calls = Arc::new(AtomicU64::new(0));
    let result = {
        let calls = Arc::clone(&calls);
        StressTest::new("warmup")
            .workers(2)
            .duration(Duration::ZERO)
            .warmup(25)
            .run(move || {
                calls.fetch_add(1, Ordering::Relaxed);
                // Warmup failures are swallowed, not tallied.
                Err::<(), ()>(())
            })
            .unwrap()
    };

    assert_eq!(calls.load(Ordering::Relaxed), 25);
    assert_eq!(result.ok, 0);
    assert_eq!(result.err, 0);
    assert_eq!(result.samples, 0);
}

#[test]
fn invalid_worker_count_is_rejected_up_front() {
    let err = StressTest::new("bad")
        .workers(0)
        .duration(Duration::from_millis(10))
        .run(|| Ok::<(), ()>(()))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidWorkerCount));
}

#[test]
fn jittered_workload_keeps_counters_consistent() {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Mutex;

    let rng = Arc::new(Mutex::new(SmallRng::seed_from_u64(17)));
    let result = {
        let rng = Arc::clone(&rng);
        StressTest::new("jitter")
            .workers(4)
            .duration(Duration::from_millis(500))
            .warmup(0)
            .run(move || {
                let (delay_us, fail) = {
                    let mut rng = rng.lock().unwrap();
                    (rng.gen_range(100..2_000), rng.gen_bool(0.2))
                };
                thread::sleep(Duration::from_micros(delay_us));
                if fail {
                    Err("flaky")
                } else {
                    Ok(())
                }
            })
            .unwrap()
    };

    assert!(result.ok > 0);
    assert!(result.err > 0);
    assert_eq!(result.samples as u64, result.total().min(4 * 20_000));
    assert!(result.p95_latency >= result.avg_latency / 2);
}

#[test]
fn suite_aggregates_sequential_runs() {
    let mut suite = StressSuite::new();

    let first = suite
        .run(
            StressTest::new("a")
                .workers(2)
                .duration(Duration::from_millis(200))
                .warmup(0),
            || Ok::<(), ()>(()),
        )
        .unwrap();
    let second = suite
        .run(
            StressTest::new("b")
                .workers(2)
                .duration(Duration::from_millis(200))
                .warmup(0),
            || Err::<(), ()>(()),
        )
        .unwrap();

    assert_eq!(suite.results().len(), 2);
    assert_eq!(suite.total_ok(), first.ok);
    assert_eq!(second.ok, 0);
    assert_eq!(
        suite.total_wall_time(),
        first.wall_time + second.wall_time
    );
    assert!(suite.total_wall_time() >= Duration::from_millis(400));
}
