//! Exponential-backoff retry for rate-limited generation calls.
//!
//! [`call_with_retry`] wraps a dispatch closure and transparently retries
//! when the failure classifies as provider rate-limiting, doubling the
//! delay after each attempt. Every other failure propagates immediately,
//! and exhausting the budget re-raises the original error.

use std::future::Future;
use std::time::Duration;

use manaforge_core::error::GenerationError;

/// Tunable parameters for the retry policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles after each failure.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(2000),
        }
    }
}

/// Execute `op`, retrying rate-limit failures with exponential backoff.
///
/// The decorator knows nothing about what `op` does, only how to classify
/// its failures. Retry exhaustion is fatal for the call, never a silent
/// success.
pub async fn call_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, GenerationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
{
    let mut delay = policy.initial_delay;
    let mut retries_left = policy.max_retries;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_rate_limited() && retries_left > 0 => {
                tracing::warn!(
                    retries_left,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Rate limited, backing off before retry",
                );
                tokio::time::sleep(delay).await;
                retries_left -= 1;
                delay *= 2;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use assert_matches::assert_matches;
    use tokio::time::Instant;

    fn rate_limited() -> GenerationError {
        GenerationError::from_status(429, "RESOURCE_EXHAUSTED".into())
    }

    /// Records the virtual instant of each invocation.
    fn recorder() -> Arc<Mutex<Vec<Instant>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn default_policy_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_success_with_doubling_delays() {
        let policy = RetryPolicy::default();
        let calls = recorder();

        let result = {
            let calls = calls.clone();
            call_with_retry(&policy, move || {
                let calls = calls.clone();
                async move {
                    let mut calls = calls.lock().unwrap();
                    calls.push(Instant::now());
                    if calls.len() <= 2 {
                        Err(rate_limited())
                    } else {
                        Ok(42)
                    }
                }
            })
            .await
        };

        assert_eq!(result.unwrap(), 42);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3, "two failures then a success");
        assert_eq!(calls[1] - calls[0], Duration::from_millis(2000));
        assert_eq!(calls[2] - calls[1], Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_rejects_with_original_error() {
        let policy = RetryPolicy::default();
        let calls = recorder();

        let result: Result<(), _> = {
            let calls = calls.clone();
            call_with_retry(&policy, move || {
                let calls = calls.clone();
                async move {
                    calls.lock().unwrap().push(Instant::now());
                    Err(rate_limited())
                }
            })
            .await
        };

        assert_matches!(result, Err(GenerationError::RateLimited { .. }));
        assert_eq!(
            calls.lock().unwrap().len(),
            4,
            "initial attempt plus max_retries"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn non_rate_limit_error_fails_immediately() {
        let policy = RetryPolicy::default();
        let calls = recorder();

        let result: Result<(), _> = {
            let calls = calls.clone();
            call_with_retry(&policy, move || {
                let calls = calls.clone();
                async move {
                    calls.lock().unwrap().push(Instant::now());
                    Err(GenerationError::Api {
                        status: 500,
                        body: "boom".into(),
                    })
                }
            })
            .await
        };

        assert_matches!(result, Err(GenerationError::Api { status: 500, .. }));
        assert_eq!(calls.lock().unwrap().len(), 1, "no retries");
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_first_attempt_sleeps_never() {
        let policy = RetryPolicy::default();
        let started = Instant::now();

        let result = call_with_retry(&policy, || async { Ok("done") }).await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(Instant::now() - started, Duration::ZERO);
    }
}
