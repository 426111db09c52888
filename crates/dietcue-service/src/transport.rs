//! HTTP-backed push transport (Expo-style send endpoint).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use dietcue_core::AppResult;
use dietcue_core::config::transport::TransportConfig;
use dietcue_core::error::AppError;
use dietcue_core::traits::PushTransport;

/// Per-message receipt in the push service response.
#[derive(Debug, Deserialize)]
struct PushTicket {
    status: String,
}

/// Response envelope from the push service.
#[derive(Debug, Deserialize)]
struct PushResponse {
    #[serde(default)]
    data: Vec<PushTicket>,
}

/// [`PushTransport`] implementation that posts to an Expo-compatible push
/// endpoint. Fire-and-forget: one attempt, no retry.
#[derive(Debug)]
pub struct HttpPushTransport {
    client: reqwest::Client,
    config: TransportConfig,
}

impl HttpPushTransport {
    /// Create a new HTTP transport from configuration.
    pub fn new(config: TransportConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PushTransport for HttpPushTransport {
    async fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) -> AppResult<bool> {
        let payload = serde_json::json!({
            "to": token,
            "title": title,
            "body": body,
            "data": data,
            "sound": "default",
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::transport(format!("Push call failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::transport(format!(
                "Push service returned {status}"
            )));
        }

        let receipt: PushResponse = response
            .json()
            .await
            .map_err(|e| AppError::transport(format!("Unparseable push response: {e}")))?;

        let accepted = receipt
            .data
            .first()
            .map(|ticket| ticket.status == "ok")
            .unwrap_or(false);
        debug!(accepted, "Push transport responded");
        Ok(accepted)
    }
}
