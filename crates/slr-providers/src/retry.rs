//! Bounded exponential backoff with jitter, retrying only transient
//! failures.
//!
//! Jitter is derived deterministically from the attempt number and the
//! process id rather than an RNG dependency, the same
//! no-randomness-required approach the lock-acquisition retry loop
//! elsewhere in this codebase uses to avoid lockstep retries across
//! processes.

use slr_utils::error::SlrError;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_ms: u64,
    pub jitter_ratio: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_ms: 500,
            jitter_ratio: 0.2,
        }
    }
}

fn jittered_delay(base_ms: u64, jitter_ratio: f64, attempt: u32) -> Duration {
    let exp = base_ms.saturating_mul(1u64 << attempt.min(16));
    let spread = (exp as f64 * jitter_ratio) as u64;
    if spread == 0 {
        return Duration::from_millis(exp);
    }
    let seed = (attempt as u64)
        .wrapping_mul(2_654_435_761)
        .wrapping_add(std::process::id() as u64);
    let offset = (seed % (2 * spread + 1)) as i64 - spread as i64;
    let delayed = (exp as i64 + offset).max(0) as u64;
    Duration::from_millis(delayed)
}

/// Runs `f` up to `policy.attempts` times, retrying only when the returned
/// error is [`SlrError::is_advisory`] (transient provider/rate-limit/timeout
/// categories). The last attempt's error (transient or not) is returned on
/// exhaustion.
pub async fn retry_with_backoff<T, F, Fut>(policy: RetryPolicy, mut f: F) -> Result<T, SlrError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SlrError>>,
{
    let mut last_err = None;
    for attempt in 0..policy.attempts {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let retriable = err.is_advisory();
                last_err = Some(err);
                if !retriable || attempt + 1 >= policy.attempts {
                    break;
                }
                tokio::time::sleep(jittered_delay(policy.base_ms, policy.jitter_ratio, attempt))
                    .await;
            }
        }
    }
    Err(last_err.unwrap_or_else(|| SlrError::Internal("retry loop ran zero times".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_without_retry_when_first_call_succeeds() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(RetryPolicy::default(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, SlrError>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_errors_up_to_the_attempt_budget() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            attempts: 3,
            base_ms: 1,
            jitter_ratio: 0.0,
        };
        let result: Result<(), SlrError> = retry_with_backoff(policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(SlrError::Provider {
                    provider_name: "x".into(),
                    message: "5xx".into(),
                    retriable: true,
                })
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_non_advisory_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), SlrError> = retry_with_backoff(RetryPolicy::default(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(SlrError::validation("bad input")) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
