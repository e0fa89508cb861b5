//! Lookup timing for `compare`.

use std::time::{Duration, Instant};

/// Calls before timing starts.
const WARMUP_CALLS: usize = 10;

/// Runs `f` `iterations` times after a short warmup and returns the mean duration.
pub fn mean_duration<F, R>(iterations: usize, mut f: F) -> Duration
where
    F: FnMut() -> R,
{
    for _ in 0..WARMUP_CALLS {
        std::hint::black_box(f());
    }

    let iterations = iterations.max(1);
    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(f());
    }
    Duration::from_secs_f64(start.elapsed().as_secs_f64() / iterations as f64)
}

/// Formats a duration with a unit suited to its magnitude.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos < 1_000 {
        format!("{} ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2} μs", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2} ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2} s", nanos as f64 / 1_000_000_000.0)
    }
}
