//! Device directory entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered device identity with its push token and role flag.
///
/// This is the directory record the router resolves against. The token is
/// written by device registration only; the router never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Device {
    /// Identity the device belongs to.
    pub identity: String,
    /// Raw push token, if one was registered.
    pub push_token: Option<String>,
    /// Whether this identity is the advisor.
    pub is_advisor: bool,
    /// Last registration update.
    pub updated_at: DateTime<Utc>,
}
