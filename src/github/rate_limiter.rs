use chrono::Utc;
use reqwest::header::HeaderMap;
use tokio::time::{sleep, Duration};

/// Fixed client-side throttle plus rate-limit header inspection.
///
/// The delay after each successful call is constant; quota headers are only
/// consulted when the API has already refused a request.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }

    /// Seconds until `x-ratelimit-reset`, or 0 when the header is missing,
    /// malformed, or already in the past.
    pub fn seconds_until_reset(&self, headers: &HeaderMap) -> u64 {
        reset_timestamp(headers)
            .map(|reset| reset.saturating_sub(Utc::now().timestamp()).max(0) as u64)
            .unwrap_or(0)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

fn reset_timestamp(headers: &HeaderMap) -> Option<i64> {
    headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
