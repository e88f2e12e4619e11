//! Timing attack protection utilities
//!
//! Login failures for unknown identifiers and wrong passwords must not be
//! distinguishable by response time.

use std::time::{Duration, Instant};

use crate::constants::DEFAULT_MIN_AUTH_MILLIS;

/// Add artificial delay so that an operation takes at least `min_duration`
pub async fn add_auth_delay(start_time: Instant, min_duration: Duration) {
    let elapsed = start_time.elapsed();
    if elapsed < min_duration {
        tokio::time::sleep(min_duration - elapsed).await;
    }
}

/// Authentication timing helper
pub struct AuthTimer {
    start: Instant,
    min_duration: Duration,
}

impl AuthTimer {
    /// Create a new auth timer with minimum duration
    pub fn new(min_duration: Duration) -> Self {
        Self {
            start: Instant::now(),
            min_duration,
        }
    }

    /// Wait until minimum duration has elapsed
    pub async fn wait(self) {
        add_auth_delay(self.start, self.min_duration).await;
    }
}

impl Default for AuthTimer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_MIN_AUTH_MILLIS))
    }
}
