//! Polite request pacing for course detail fetches
//!
//! Detail pages are fetched one at a time with a fixed pause between the end
//! of one request and the start of the next. [`PoliteDelay`] measures from
//! the moment the previous request finished, so it also holds as a rate
//! limit if requests are ever issued from elsewhere in between.

use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Sequential rate gate with a minimum pause between requests
#[derive(Debug, Clone)]
pub struct PoliteDelay {
    /// Minimum time between the end of one request and the start of the next
    interval: Duration,

    /// When the previous request finished
    last_finished: Option<Instant>,
}

impl PoliteDelay {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_finished: None,
        }
    }

    /// Configured pause
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until the next request may start
    ///
    /// Returns immediately before the first request. Returns the time spent
    /// sleeping.
    pub async fn wait_turn(&self) -> Duration {
        let Some(last) = self.last_finished else {
            return Duration::ZERO;
        };

        let remaining = self.interval.saturating_sub(last.elapsed());
        if !remaining.is_zero() {
            tracing::trace!("Waiting {:?} before next request", remaining);
            sleep(remaining).await;
        }
        remaining
    }

    /// Records that a request just finished
    pub fn finished(&mut self) {
        self.last_finished = Some(Instant::now());
    }
}
