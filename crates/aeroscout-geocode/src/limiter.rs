//! Per-endpoint request pacing.

use std::collections::HashMap;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// Process-wide rate limiter bounding outbound request rate per endpoint key.
///
/// Slot acquisition is serialized per key: each caller reserves the next free
/// slot under the lock and sleeps outside it, so concurrent acquirers of the
/// same key are spaced by at least the requested interval. Distinct keys are
/// independent.
///
/// Constructed once per process and injected by `Arc`; never an ambient
/// singleton, so tests can drive it with a paused clock.
#[derive(Default)]
pub struct RateLimiter {
    /// Next free slot per endpoint key
    slots: Mutex<HashMap<String, Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with no reserved slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until a request slot for `key` is free.
    ///
    /// Returns immediately when `min_interval` is zero.
    pub async fn acquire(&self, key: &str, min_interval: Duration) {
        if min_interval.is_zero() {
            return;
        }

        let wait = {
            let mut slots = self.slots.lock().await;
            let now = Instant::now();
            let slot = slots.entry(key.to_string()).or_insert(now);
            let scheduled = (*slot).max(now);
            *slot = scheduled + min_interval;
            scheduled.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            tracing::debug!(key, ?wait, "rate limit wait");
            sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_acquire_is_immediate() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        limiter.acquire("nominatim", Duration::from_secs(1)).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_key_acquisitions_are_spaced() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        limiter.acquire("nominatim", Duration::from_secs(1)).await;
        limiter.acquire("nominatim", Duration::from_secs(1)).await;
        limiter.acquire("nominatim", Duration::from_secs(1)).await;

        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_keys_are_independent() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        limiter.acquire("nominatim", Duration::from_secs(1)).await;
        limiter.acquire("mapbox", Duration::from_secs(1)).await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_never_waits() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        for _ in 0..10 {
            limiter.acquire("google", Duration::ZERO).await;
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_acquirers_are_serialized() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::new());
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                limiter.acquire("nominatim", Duration::from_secs(1)).await;
            }));
        }

        for handle in handles {
            handle.await.expect("task completes");
        }

        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
