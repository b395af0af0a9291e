//! Bounded exponential-backoff retry for fallible async operations.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use storyloom_error::RetryableError;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, warn};

/// How many times to try an operation and how long to wait between tries.
///
/// The delay before retry `n` is `initial_backoff_ms * 2^(n-1)`, capped at
/// `max_delay_secs` and jittered.
///
/// # Examples
///
/// ```
/// use storyloom_rate_limit::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 3);
/// assert_eq!(RetryPolicy::none().max_attempts, 1);
/// assert_eq!(RetryPolicy::none().delays().count(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryPolicy {
    /// Total attempts, the first included
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds
    pub initial_backoff_ms: u64,
    /// Upper bound on any single delay, in seconds
    pub max_delay_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_delay_secs: 10,
        }
    }
}

impl RetryPolicy {
    /// A single attempt with no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 0,
            max_delay_secs: 0,
        }
    }

    /// A policy with the given attempt count and default delays.
    pub fn attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Set the initial delay.
    pub fn with_initial_backoff_ms(mut self, ms: u64) -> Self {
        self.initial_backoff_ms = ms;
        self
    }

    /// Set the delay cap.
    pub fn with_max_delay(mut self, secs: u64) -> Self {
        self.max_delay_secs = secs;
        self
    }

    /// Delays between attempts, one fewer than `max_attempts`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        ExponentialBackoff::from_millis(2)
            .factor((self.initial_backoff_ms / 2).max(1))
            .max_delay(Duration::from_secs(self.max_delay_secs.max(1)))
            .map(jitter)
            .take(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// Run `operation` until it succeeds, fails permanently, or runs out of attempts.
///
/// Errors whose [`RetryableError::is_retryable`] is false end the loop at
/// once. The last error is returned when attempts are exhausted.
///
/// # Example
///
/// ```rust,ignore
/// let text = execute_with_retry(&policy, "write act", || async {
///     driver.complete(&prompt).await
/// })
/// .await?;
/// ```
pub async fn execute_with_retry<F, Fut, R, E>(
    policy: &RetryPolicy,
    label: &str,
    operation: F,
) -> Result<R, E>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<R, E>>,
    E: RetryableError + std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let attempt = AtomicU32::new(0);
    let attempt = &attempt;
    let operation = &operation;

    Retry::spawn(policy.delays(), move || async move {
        let n = attempt.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(label, attempt = n, max_attempts, "Attempt started");

        match operation().await {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_retryable() && n < max_attempts {
                    warn!(label, attempt = n, max_attempts, "Transient error, will retry: {}", e);
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                } else if e.is_retryable() {
                    warn!(label, attempt = n, max_attempts, "Attempts exhausted: {}", e);
                    Err(RetryError::Permanent(e))
                } else {
                    warn!(label, attempt = n, "Permanent error, failing immediately: {}", e);
                    Err(RetryError::Permanent(e))
                }
            }
        }
    })
    .await
}
