//! Plan entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A time-bound textual plan ("diet document") issued to an owner.
///
/// Only one plan per owner is tracked; issuing a new one replaces the row
/// and triggers a reminder reconcile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Plan {
    /// The person the plan was issued to.
    pub owner_id: String,
    /// IANA timezone the owner's reminders are computed in.
    pub timezone: String,
    /// End of the plan's validity window.
    pub valid_until: DateTime<Utc>,
    /// Raw plan text as issued.
    pub plan_text: String,
    /// When the plan was issued.
    pub issued_at: DateTime<Utc>,
}

impl Plan {
    /// Check whether the plan's validity window has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_until <= now
    }

    /// Remaining validity at the given instant, if any.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        (!self.is_expired(now)).then(|| self.valid_until - now)
    }
}
