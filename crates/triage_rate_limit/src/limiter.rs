//! Sliding-window rate limiter for outgoing API calls.

use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, instrument};

/// Rate limiter enforcing a request quota over a sliding time window.
///
/// No more than `max_requests` admissions are granted within any trailing
/// interval of length `window`, across all callers sharing the instance.
/// Share one limiter per upstream quota by wrapping it in an `Arc` and
/// passing it to whatever needs it.
///
/// Admission timestamps are kept behind a single lock, and the lock is held
/// across the in-window wait, so the prune/check/record sequence is one
/// critical section: two concurrent callers can never both observe a free
/// slot, and queued callers are admitted in arrival order.
///
/// Dropping a pending [`RateLimiter::wait_for_availability`] future cancels
/// the wait without recording an admission.
///
/// # Example
///
/// ```rust,ignore
/// let limiter = Arc::new(RateLimiter::per_minute(NonZeroU32::new(60).unwrap()));
///
/// limiter.wait_for_availability().await;
/// // Authorized for exactly one outgoing call.
/// let response = client.generate(&request).await?;
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: NonZeroU32,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting `max_requests` calls per `window`.
    ///
    /// The quota is `NonZeroU32`: a limiter that can never admit is a
    /// misconfiguration, and configuration validation rejects zero before
    /// this constructor can be reached.
    pub fn new(max_requests: NonZeroU32, window: Duration) -> Self {
        Self {
            window,
            max_requests,
            timestamps: Mutex::new(VecDeque::with_capacity(max_requests.get() as usize)),
        }
    }

    /// Create a limiter admitting `max_requests` calls per minute.
    pub fn per_minute(max_requests: NonZeroU32) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    /// The admission quota per window.
    pub fn max_requests(&self) -> u32 {
        self.max_requests.get()
    }

    /// The sliding window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait until the quota admits one more call, then record the admission.
    ///
    /// Expired timestamps are discarded first. If the quota is already
    /// exhausted, the caller suspends for exactly
    /// `window - (now - oldest_in_window)`, the instant at which the oldest
    /// admission ages out of the window. After this method returns the
    /// caller is authorized to perform exactly one outgoing call.
    ///
    /// This operation does not fail; it either proceeds immediately or
    /// suspends and then proceeds.
    #[instrument(skip(self))]
    pub async fn wait_for_availability(&self) {
        let mut admitted = self.timestamps.lock().await;
        let now = Instant::now();
        while admitted.front().is_some_and(|t| now.duration_since(*t) >= self.window) {
            admitted.pop_front();
        }

        if admitted.len() >= self.max_requests.get() as usize {
            // After pruning, a full window implies at least one live entry.
            if let Some(oldest) = admitted.front().copied() {
                let wait = self.window - now.duration_since(oldest);
                debug!(
                    wait_ms = wait.as_millis() as u64,
                    "quota exhausted, waiting for the oldest admission to expire"
                );
                sleep(wait).await;
                admitted.pop_front();
            }
        }

        admitted.push_back(Instant::now());
    }

    /// Record an admission only if the quota allows it right now.
    ///
    /// Returns `false` without waiting when the window is full.
    pub async fn try_acquire(&self) -> bool {
        let mut admitted = self.timestamps.lock().await;
        let now = Instant::now();
        while admitted.front().is_some_and(|t| now.duration_since(*t) >= self.window) {
            admitted.pop_front();
        }

        if admitted.len() >= self.max_requests.get() as usize {
            return false;
        }

        admitted.push_back(now);
        true
    }
}
