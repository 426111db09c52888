//! Push transport configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the external push delivery service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Endpoint URL of the push service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "https://exp.host/--/api/v2/push/send".to_string()
}

fn default_timeout() -> u64 {
    10
}
