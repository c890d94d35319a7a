use rand::Rng;
use std::time::Duration;

/// Upper bound for any single wait between attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Delay before retry number `retry` (0-based): `factor * 2^retry`, capped.
///
/// `jitter` adds a uniform random amount in `[0, jitter)` seconds.
pub fn backoff_delay(retry: u32, factor: f64, jitter: f64, cap: Duration) -> Duration {
    // 2^30 seconds is already far beyond any sensible cap
    let exp = 2_f64.powi(retry.min(30) as i32);
    let mut secs = (factor.max(0.0) * exp).min(cap.as_secs_f64());

    if jitter > 0.0 {
        secs += rand::thread_rng().gen_range(0.0..jitter);
    }

    Duration::from_secs_f64(secs.min(cap.as_secs_f64()))
}

/// Parse a `Retry-After` header given in whole seconds.
pub fn parse_retry_after(value: &str, cap: Duration) -> Option<Duration> {
    let secs: u64 = value.trim().parse().ok()?;
    Some(Duration::from_secs(secs).min(cap))
}
