//! Plan-text extraction seam.
//!
//! The extraction call itself (an LLM or any other text-understanding
//! service) is a black box to this system. It receives raw plan text and
//! returns structured reminder candidates. Everything it returns is
//! untrusted and re-validated before scheduling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A raw reminder candidate as returned by the extraction service.
///
/// Fields are intentionally loose (`i64`) so that out-of-range values
/// survive deserialization and can be rejected by validation instead of
/// failing the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedCandidate {
    /// Free-text reminder message.
    pub message: String,
    /// Hour of day (0-23 expected, not guaranteed).
    pub hour: i64,
    /// Minute of hour (0-59 expected, not guaranteed).
    pub minute: i64,
    /// Weekdays to fire on, Sunday = 0. Empty means every day.
    #[serde(default)]
    pub weekdays: Vec<i64>,
}

/// Extracts structured reminder candidates from raw plan text.
#[async_trait]
pub trait PlanExtractor: Send + Sync + std::fmt::Debug {
    /// Extract reminder candidates from the given plan text.
    ///
    /// An `Err` here means the extraction call itself failed; callers
    /// treat that as an empty batch rather than aborting reconciliation.
    async fn extract(&self, plan_text: &str) -> AppResult<Vec<ExtractedCandidate>>;
}
