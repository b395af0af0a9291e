//! Request pacing using governor and a Tokio semaphore.
//!
//! - Governor (GCRA) enforces requests per minute
//! - Semaphore enforces requests in flight

use crate::RateLimitConfig;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use storyloom_error::{ServiceError, ServiceErrorKind, StoryloomResult};
use tokio::sync::Semaphore;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter shared by every call a client makes.
///
/// Cloning shares the underlying quota.
///
/// # Example
///
/// ```rust,ignore
/// let limiter = RateLimiter::new(&config.rate_limit);
/// let _guard = limiter.acquire().await?;
/// // Make API call...
/// ```
#[derive(Clone)]
pub struct RateLimiter {
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    concurrent_semaphore: Option<Arc<Semaphore>>,
}

impl RateLimiter {
    /// Create a limiter enforcing every limit that is set.
    pub fn new(config: &RateLimitConfig) -> Self {
        let rpm_limiter = config.rpm.and_then(NonZeroU32::new).map(|n| {
            let quota = Quota::per_minute(n);
            Arc::new(GovernorRateLimiter::direct(quota))
        });

        let concurrent_semaphore = config
            .max_concurrent
            .filter(|n| *n > 0)
            .map(|n| Arc::new(Semaphore::new(n as usize)));

        tracing::debug!(
            rpm = ?config.rpm,
            max_concurrent = ?config.max_concurrent,
            "Rate limiter created"
        );

        Self {
            rpm_limiter,
            concurrent_semaphore,
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(&RateLimitConfig::default())
    }

    /// Wait until a request may be sent.
    ///
    /// Returns a guard that releases the concurrency slot when dropped.
    pub async fn acquire(&self) -> StoryloomResult<RateLimiterGuard> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        // Last, to avoid holding a slot while waiting on the quota
        let permit = match &self.concurrent_semaphore {
            Some(semaphore) => Some(semaphore.clone().acquire_owned().await.map_err(|e| {
                ServiceError::new(ServiceErrorKind::Transport(format!(
                    "Rate limiter closed: {}",
                    e
                )))
            })?),
            None => None,
        };

        Ok(RateLimiterGuard { _permit: permit })
    }

    /// Try to acquire without waiting.
    ///
    /// Returns None if any limit would block.
    pub fn try_acquire(&self) -> Option<RateLimiterGuard> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.check().ok()?;
        }

        let permit = match &self.concurrent_semaphore {
            Some(semaphore) => Some(semaphore.clone().try_acquire_owned().ok()?),
            None => None,
        };

        Some(RateLimiterGuard { _permit: permit })
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("rpm_limited", &self.rpm_limiter.is_some())
            .field(
                "available_slots",
                &self
                    .concurrent_semaphore
                    .as_ref()
                    .map(|s| s.available_permits()),
            )
            .finish()
    }
}

/// RAII guard for the rate limiter.
///
/// Releases the concurrency slot when dropped.
#[derive(Debug)]
pub struct RateLimiterGuard {
    _permit: Option<tokio::sync::OwnedSemaphorePermit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_slot_released_on_drop() {
        let limiter = RateLimiter::new(&RateLimitConfig {
            rpm: None,
            max_concurrent: Some(1),
        });

        let guard = limiter.try_acquire().unwrap();
        assert!(limiter.try_acquire().is_none());
        drop(guard);
        assert!(limiter.try_acquire().is_some());
    }

    #[test]
    fn test_rpm_quota_blocks_burst() {
        let limiter = RateLimiter::new(&RateLimitConfig {
            rpm: Some(1),
            max_concurrent: None,
        });

        assert!(limiter.try_acquire().is_some());
        assert!(limiter.try_acquire().is_none());
    }

    #[tokio::test]
    async fn test_unlimited_never_blocks() {
        let limiter = RateLimiter::unlimited();
        for _ in 0..100 {
            let _guard = limiter.acquire().await.unwrap();
        }
    }
}
