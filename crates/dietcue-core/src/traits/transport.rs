//! Push delivery seam.

use async_trait::async_trait;

use crate::result::AppResult;

/// Best-effort push delivery to a device token.
///
/// No retry contract is owed by callers: a failed send is logged and the
/// next recurrence provides the retry opportunity.
#[async_trait]
pub trait PushTransport: Send + Sync + std::fmt::Debug {
    /// Send a notification to the given token.
    ///
    /// Returns `Ok(true)` when the transport accepted the message,
    /// `Ok(false)` when it reported a delivery failure. `Err` is reserved
    /// for call-level failures (network, serialization).
    async fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) -> AppResult<bool>;
}
