//! Per-provider token-bucket rate limiting.
//!
//! One bucket per provider name, shared across every concurrent stage
//! invocation inside the process — a `once_cell::sync::Lazy<DashMap<...>>`
//! singleton registry, the same process-wide-singleton-over-a-concurrent-map
//! shape used elsewhere in this codebase for shared mutable state that
//! outlives any one call.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Token-bucket limiter: `capacity` tokens, refilling at
/// `refill_per_second`, one token consumed per request.
pub struct RateLimiter {
    capacity: f64,
    refill_per_second: f64,
    state: Mutex<BucketState>,
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    #[must_use]
    pub fn new(capacity: f64, refill_per_second: f64) -> Self {
        Self {
            capacity,
            refill_per_second,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Blocks (via async sleep) until one token is available, then consumes
    /// it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().expect("rate limiter poisoned");
                self.refill(&mut state);
                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    None
                } else {
                    let deficit = 1.0 - state.tokens;
                    Some(Duration::from_secs_f64(deficit / self.refill_per_second))
                }
            };
            match wait {
                None => return,
                Some(d) => tokio::time::sleep(d.max(Duration::from_millis(1))).await,
            }
        }
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_per_second).min(self.capacity);
        state.last_refill = now;
    }
}

static REGISTRY: Lazy<DashMap<String, Arc<RateLimiter>>> = Lazy::new(DashMap::new);

/// Returns the process-wide rate limiter for `provider_name`, creating one
/// with `(capacity, refill_per_second)` defaults on first use. Later calls
/// for the same name ignore the defaults and return the existing bucket —
/// configuration should call this once at startup per provider.
pub fn limiter_for(provider_name: &str, capacity: f64, refill_per_second: f64) -> Arc<RateLimiter> {
    REGISTRY
        .entry(provider_name.to_string())
        .or_insert_with(|| Arc::new(RateLimiter::new(capacity, refill_per_second)))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_consumes_a_token() {
        let limiter = RateLimiter::new(2.0, 100.0);
        limiter.acquire().await;
        limiter.acquire().await;
        let state = limiter.state.lock().unwrap();
        assert!(state.tokens < 1.0);
    }

    #[test]
    fn registry_returns_same_instance_for_same_name() {
        let a = limiter_for("test-provider-a", 5.0, 1.0);
        let b = limiter_for("test-provider-a", 999.0, 999.0);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
