//! Exponential-backoff retry for fallible async operations.

use std::fmt;
use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;
use triage_error::RetryableError;

/// Backoff policy for [`with_retry`].
///
/// `max_attempts` counts every invocation including the first. The delay
/// before attempt `k` (for `k >= 2`) is `base_delay * 2^(k-2)`, clamped to
/// `max_delay` when one is set.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroU32;
/// use std::time::Duration;
/// use triage_rate_limit::RetryPolicy;
///
/// let policy = RetryPolicy::new(NonZeroU32::new(3).unwrap(), Duration::from_millis(1000))
///     .with_max_delay(Duration::from_millis(5000));
/// assert_eq!(policy.max_attempts(), 3);
/// assert_eq!(policy.base_delay(), Duration::from_millis(1000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
    base_delay: Duration,
    max_delay: Option<Duration>,
}

const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = NonZeroU32::new(3).unwrap();

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(1000),
            max_delay: None,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt budget and initial delay.
    pub fn new(max_attempts: NonZeroU32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay: None,
        }
    }

    /// Clamp every computed backoff delay to `max_delay`.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Total attempts allowed, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    /// Delay before the second attempt.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Upper clamp on computed delays, if any.
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    /// Backoff delay inserted before `attempt` (1-indexed; the first attempt
    /// has no delay).
    fn backoff_before(&self, attempt: u32) -> Duration {
        debug_assert!(attempt >= 2, "the first attempt carries no delay");
        let exponent = attempt.saturating_sub(2).min(31);
        let delay = self.base_delay.saturating_mul(2u32.saturating_pow(exponent));
        match self.max_delay {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }
}

/// Failure outcome of [`with_retry`].
///
/// The executor never raises mid-loop; each attempt's result is inspected
/// and the loop exits on success, on a non-retryable failure, or when the
/// attempt budget is spent.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The operation failed with an error that retrying cannot fix.
    Permanent(E),
    /// Every permitted attempt failed; only the final failure is preserved.
    Exhausted {
        /// The failure observed on the last attempt.
        last: E,
        /// How many attempts were made.
        attempts: u32,
    },
}

impl<E> RetryError<E> {
    /// Consume the outcome and return the underlying failure.
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Permanent(err) => err,
            RetryError::Exhausted { last, .. } => last,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Permanent(err) => write!(f, "Permanent failure: {}", err),
            RetryError::Exhausted { last, attempts } => {
                write!(f, "Operation failed after {} attempts: {}", attempts, last)
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RetryError::Permanent(err) => Some(err),
            RetryError::Exhausted { last, .. } => Some(last),
        }
    }
}

/// Execute `operation`, masking transient failures with exponential backoff.
///
/// The operation is invoked at most `policy.max_attempts()` times. A success
/// is returned immediately with no delay tax. A failure whose
/// [`RetryableError::is_retryable`] is false fails fast as
/// [`RetryError::Permanent`] without consuming the remaining budget. Between
/// retryable failures the caller suspends for the policy's backoff delay;
/// no other work belonging to this logical operation proceeds during that
/// delay.
///
/// Re-invoking the operation on failure must be safe; idempotency is a
/// contract on the caller, not enforced here.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, RetryError<E>>
where
    E: RetryableError + fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1u32;

    loop {
        let failure = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !failure.is_retryable() {
            warn!(attempt, error = %failure, "permanent failure, not retrying");
            return Err(RetryError::Permanent(failure));
        }

        if attempt >= max_attempts {
            warn!(attempts = max_attempts, error = %failure, "retry budget exhausted");
            return Err(RetryError::Exhausted {
                last: failure,
                attempts: max_attempts,
            });
        }

        attempt += 1;
        let delay = policy.backoff_before(attempt);
        warn!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %failure,
            "transient failure, backing off before next attempt"
        );
        sleep(delay).await;
    }
}
