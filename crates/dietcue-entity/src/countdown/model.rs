//! Countdown state entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-owner record of which expiry window already produced an alert.
///
/// Compared and updated atomically with alert dispatch so repeated sweeps
/// do not re-alert for the same crossing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CountdownState {
    /// The plan owner this state belongs to.
    pub owner_id: String,
    /// The last window an alert was sent for, as a stable string.
    pub last_alerted_window: Option<String>,
    /// When the state row was last written.
    pub updated_at: DateTime<Utc>,
}
