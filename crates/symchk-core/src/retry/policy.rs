use std::time::Duration;

use super::Failure;

/// How often, and how patiently, one candidate URL is asked again.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts per candidate URL, the first one included.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// One attempt per candidate.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Wait before attempt `attempt + 1` (1-based), or `None` when the
    /// failure is an answer or the attempts are used up.
    pub fn delay_after(&self, attempt: u32, failure: Failure) -> Option<Duration> {
        if attempt >= self.max_attempts || !failure.is_transient() {
            return None;
        }
        let exp = 1u32 << attempt.saturating_sub(1).min(8);
        Some(self.base_delay.saturating_mul(exp).min(self.max_delay))
    }
}
