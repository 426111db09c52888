//! Plan-expiry countdown configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the periodic plan-expiry sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Whether the countdown sweep is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression (six-field, with seconds) for the sweep cadence.
    #[serde(default = "default_schedule")]
    pub sweep_schedule: String,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            sweep_schedule: default_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Every 10 minutes.
fn default_schedule() -> String {
    "0 */10 * * * *".to_string()
}
