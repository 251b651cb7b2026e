//! Client-side throttle for the bank API.
//!
//! One process-wide [`SlidingWindow`] guards every outgoing call. The backend enforces
//! its own limits; this only keeps a burst of console commands from tripping them.

use lazy_static::lazy_static;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const DEFAULT_REQUESTS_PER_SECOND: usize = 10;

lazy_static! {
    static ref BANK_WINDOW: Mutex<SlidingWindow> = Mutex::new(SlidingWindow::per_second(
        DEFAULT_REQUESTS_PER_SECOND
    ));
}

/// Admits at most `limit` hits in any span of `window`
#[derive(Debug)]
pub struct SlidingWindow {
    hits: VecDeque<Instant>,
    limit: usize,
    window: Duration,
}

impl SlidingWindow {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            hits: VecDeque::with_capacity(limit.max(1)),
            limit: limit.max(1),
            window,
        }
    }

    pub fn per_second(limit: usize) -> Self {
        Self::new(limit, Duration::from_secs(1))
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
    }

    /// Record a hit at `now`, or return how long until the oldest hit leaves the window
    pub fn try_acquire(&mut self, now: Instant) -> Result<(), Duration> {
        let window = self.window;
        self.hits
            .retain(|&hit| now.saturating_duration_since(hit) < window);

        match self.hits.front() {
            Some(&oldest) if self.hits.len() >= self.limit => {
                Err(window.saturating_sub(now.saturating_duration_since(oldest)))
            }
            _ => {
                self.hits.push_back(now);
                Ok(())
            }
        }
    }
}

/// Change the requests-per-second ceiling (from `BANK_API_MAX_RPS`)
pub fn configure_bank_rate_limit(requests_per_second: usize) {
    match BANK_WINDOW.lock() {
        Ok(mut window) => window.set_limit(requests_per_second),
        Err(_) => tracing::warn!("Bank API throttle unavailable; limit not changed"),
    }
}

/// Wait until the shared window admits another bank call
pub async fn throttle_bank_api() {
    loop {
        let admitted = match BANK_WINDOW.lock() {
            Ok(mut window) => window.try_acquire(Instant::now()),
            // A poisoned lock only means another caller panicked mid-update
            Err(_) => Ok(()),
        };

        match admitted {
            Ok(()) => return,
            Err(wait) => {
                tracing::debug!("Bank API throttle: waiting {}ms", wait.as_millis());
                tokio::time::sleep(wait).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_up_to_limit_then_reports_wait() {
        let start = Instant::now();
        let mut window = SlidingWindow::per_second(3);

        for ms in [0, 100, 200] {
            assert_eq!(window.try_acquire(start + Duration::from_millis(ms)), Ok(()));
        }
        assert_eq!(
            window.try_acquire(start + Duration::from_millis(400)),
            Err(Duration::from_millis(600))
        );
    }

    #[test]
    fn test_old_hits_slide_out() {
        let start = Instant::now();
        let mut window = SlidingWindow::per_second(2);
        window.try_acquire(start).ok();
        window.try_acquire(start + Duration::from_millis(500)).ok();

        assert!(window.try_acquire(start + Duration::from_millis(999)).is_err());
        assert_eq!(window.try_acquire(start + Duration::from_millis(1000)), Ok(()));
        // The hit at 500ms is still inside the window
        assert_eq!(
            window.try_acquire(start + Duration::from_millis(1200)),
            Err(Duration::from_millis(300))
        );
    }

    #[test]
    fn test_zero_limit_is_treated_as_one() {
        let start = Instant::now();
        let mut window = SlidingWindow::new(0, Duration::from_secs(1));
        assert_eq!(window.try_acquire(start), Ok(()));
        assert!(window.try_acquire(start).is_err());

        window.set_limit(2);
        assert_eq!(window.try_acquire(start), Ok(()));
    }

    #[tokio::test]
    async fn test_throttle_returns_under_limit() {
        configure_bank_rate_limit(1000);
        throttle_bank_api().await;
        configure_bank_rate_limit(DEFAULT_REQUESTS_PER_SECOND);
    }
}
