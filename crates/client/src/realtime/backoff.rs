//! Reconnect delay policies.

use std::time::Duration;

/// Decides how long to wait before a reconnect attempt.
///
/// `attempt` is 1-based: the first reconnect after a drop asks for
/// `next_delay(1)`.
pub trait BackoffPolicy: Send + Sync {
    fn next_delay(&self, attempt: u32) -> Duration;
}

/// Fixed delay between reconnect attempts. The default policy, matching the
/// feed's observed 3-second spacing.
#[derive(Debug, Clone, Copy)]
pub struct ConstantBackoff {
    delay: Duration,
}

impl ConstantBackoff {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for ConstantBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

impl BackoffPolicy for ConstantBackoff {
    fn next_delay(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

/// Doubling delay, capped at `max`.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }
}

impl BackoffPolicy for ExponentialBackoff {
    fn next_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial.saturating_mul(factor).min(self.max)
    }
}
