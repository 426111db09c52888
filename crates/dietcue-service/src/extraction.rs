//! HTTP-backed plan extractor.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use dietcue_core::AppResult;
use dietcue_core::config::extraction::ExtractionConfig;
use dietcue_core::error::AppError;
use dietcue_core::traits::{ExtractedCandidate, PlanExtractor};

/// Response envelope from the extraction service.
#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    /// Extracted reminder candidates.
    #[serde(default)]
    candidates: Vec<ExtractedCandidate>,
}

/// [`PlanExtractor`] implementation that calls an external HTTP service.
///
/// The service is a black box; whatever it returns is validated downstream
/// by the scheduler before anything is persisted.
#[derive(Debug)]
pub struct HttpPlanExtractor {
    client: reqwest::Client,
    config: ExtractionConfig,
}

impl HttpPlanExtractor {
    /// Create a new HTTP extractor from configuration.
    pub fn new(config: ExtractionConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::extraction(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PlanExtractor for HttpPlanExtractor {
    async fn extract(&self, plan_text: &str) -> AppResult<Vec<ExtractedCandidate>> {
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&serde_json::json!({ "text": plan_text }));
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::extraction(format!("Extraction call failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::extraction(format!(
                "Extraction service returned {status}"
            )));
        }

        let body: ExtractionResponse = response
            .json()
            .await
            .map_err(|e| AppError::extraction(format!("Unparseable extraction response: {e}")))?;

        debug!(count = body.candidates.len(), "Extraction returned candidates");
        Ok(body.candidates)
    }
}
