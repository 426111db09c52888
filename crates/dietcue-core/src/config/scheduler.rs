//! Reminder scheduler configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the background firing loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the firing loop is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval in seconds between due-reminder polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Number of concurrent delivery tasks.
    #[serde(default = "default_concurrency")]
    pub delivery_concurrency: usize,
    /// Timeout in seconds for a single delivery attempt. A delivery that
    /// exceeds this is abandoned, not retried.
    #[serde(default = "default_delivery_timeout")]
    pub delivery_timeout_seconds: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            poll_interval_seconds: default_poll_interval(),
            delivery_concurrency: default_concurrency(),
            delivery_timeout_seconds: default_delivery_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    30
}

fn default_concurrency() -> usize {
    4
}

fn default_delivery_timeout() -> u64 {
    10
}
