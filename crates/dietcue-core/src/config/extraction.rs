//! Plan-text extraction configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the external text-understanding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Endpoint URL of the extraction service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key sent as a bearer token. Empty means no auth header.
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:9090/extract".to_string()
}

fn default_timeout() -> u64 {
    30
}
