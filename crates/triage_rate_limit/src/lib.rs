//! Rate limiting and retry for calls to remote model APIs.
//!
//! This crate provides the request-admission and failure-masking policies
//! used by the prediction client:
//! - [`RateLimiter`] admits or delays outgoing calls so that no more than a
//!   fixed number occur within a sliding time window.
//! - [`with_retry`] re-invokes a fallible async operation with exponential
//!   backoff, bounded by [`RetryPolicy`].
//!
//! Both suspend through `tokio::time`, so timing behavior is deterministic
//! under tokio's paused test clock.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod limiter;
mod retry;

pub use limiter::RateLimiter;
pub use retry::{with_retry, RetryError, RetryPolicy};
