//! Tests for the sliding-window rate limiter.
//!
//! All tests run on tokio's paused clock, so waits resolve instantly while
//! elapsed time stays exact.

use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::Instant;
use triage_rate_limit::RateLimiter;

fn limiter(max_requests: u32, window_ms: u64) -> RateLimiter {
    RateLimiter::new(
        NonZeroU32::new(max_requests).expect("test quota must be nonzero"),
        Duration::from_millis(window_ms),
    )
}

#[tokio::test(start_paused = true)]
async fn admits_immediately_under_quota() {
    let limiter = limiter(3, 1000);
    let start = Instant::now();

    for _ in 0..3 {
        limiter.wait_for_availability().await;
    }

    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn waits_for_remainder_of_window_when_exhausted() {
    let limiter = limiter(1, 60_000);

    limiter.wait_for_availability().await;
    tokio::time::advance(Duration::from_millis(10_000)).await;

    // The slot opens when the admission at t=0 ages out: 60s - 10s = 50s.
    let start = Instant::now();
    limiter.wait_for_availability().await;
    assert_eq!(start.elapsed(), Duration::from_millis(50_000));
}

#[tokio::test(start_paused = true)]
async fn no_sliding_window_ever_exceeds_quota() {
    let window = Duration::from_millis(100);
    let limiter = limiter(3, 100);
    let mut admissions = Vec::new();

    for _ in 0..10 {
        limiter.wait_for_availability().await;
        admissions.push(Instant::now());
    }

    for (i, end) in admissions.iter().enumerate() {
        let in_window = admissions[..=i]
            .iter()
            .filter(|t| end.duration_since(**t) < window)
            .count();
        assert!(
            in_window <= 3,
            "window ending at admission {} holds {} admissions",
            i,
            in_window
        );
    }
}

#[tokio::test(start_paused = true)]
async fn expired_admissions_free_the_window() {
    let limiter = limiter(2, 1000);

    limiter.wait_for_availability().await;
    limiter.wait_for_availability().await;
    tokio::time::advance(Duration::from_millis(1000)).await;

    let start = Instant::now();
    limiter.wait_for_availability().await;
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_never_double_admit() {
    let limiter = limiter(1, 60_000);
    let start = Instant::now();

    let (first, second) = tokio::join!(
        async {
            limiter.wait_for_availability().await;
            start.elapsed()
        },
        async {
            limiter.wait_for_availability().await;
            start.elapsed()
        },
    );

    let (earlier, later) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };
    assert_eq!(earlier, Duration::ZERO);
    assert_eq!(later, Duration::from_millis(60_000));
}

#[tokio::test(start_paused = true)]
async fn try_acquire_refuses_when_full_and_recovers() {
    let limiter = limiter(2, 1000);

    assert!(limiter.try_acquire().await);
    assert!(limiter.try_acquire().await);
    assert!(!limiter.try_acquire().await);

    tokio::time::advance(Duration::from_millis(1000)).await;
    assert!(limiter.try_acquire().await);
}
