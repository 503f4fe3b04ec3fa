//! Backoff schedule for retried requests.

use std::time::Duration;

/// Exponential backoff settings.
///
/// How long retrying may go on overall is bounded separately by
/// `HttpConfig::retry_timeout_secs`.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Scale each delay by a random factor in `[0.5, 1.5)`.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_factor: 1.5,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// A schedule without jitter, handy for tests.
    pub fn fixed(initial_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            initial_delay,
            backoff_factor,
            jitter: false,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_factor.powi(attempt.min(i32::MAX as u32) as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            capped * (rand::random::<f64>() + 0.5)
        } else {
            capped
        };

        Duration::from_millis(final_ms.max(0.0) as u64)
    }
}
