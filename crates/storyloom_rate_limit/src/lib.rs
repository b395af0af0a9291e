//! Configuration, retry and rate limiting for Storyloom.
//!
//! Configuration is layered with the `config` crate: bundled defaults first,
//! then user files, then an explicit file. The retry executor wraps any
//! fallible async operation in a bounded exponential backoff, and the rate
//! limiter paces calls to the generation service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod retry;

pub use config::{
    PipelineConfig, ProviderConfig, RateLimitConfig, RetryConfig, StoryloomConfig,
};
pub use limiter::{RateLimiter, RateLimiterGuard};
pub use retry::{RetryPolicy, execute_with_retry};
