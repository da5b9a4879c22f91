//! Assignment engine configuration: compare-and-swap retry budget and the
//! request-scoped deadline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const fn default_max_attempts() -> u32 {
    4
}

const fn default_base_delay_ms() -> u64 {
    10
}

const fn default_max_delay_ms() -> u64 {
    200
}

const fn default_request_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Maximum read-decide-write attempts (including the first) before `Conflict`.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry after a lost compare-and-swap.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Cap for the exponential backoff between retries.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Deadline for one whole assignment, retries included.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
