//! Retry policy for lost compare-and-swap races.
//!
//! When two assignments race on the same dispatch, the loser's conditional
//! UPDATE matches zero rows (or it cannot take the write lock). It re-reads
//! and re-decides after an exponential backoff, capped at `max_delay`. After
//! `max_attempts` the engine gives up with `Conflict`.

use std::time::Duration;

use dispatch_config::EngineConfig;

/// Configuration for retry behavior on lost compare-and-swap races.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for RetryConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay(),
            max_delay: config.max_delay(),
        }
    }
}

impl RetryConfig {
    /// Delay to sleep after `attempt` (1-based) failed.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1 << exp)
            .min(self.max_delay)
    }

    /// Whether another attempt is allowed after `attempt` (1-based) failed.
    #[must_use]
    pub const fn has_attempt_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
