//! Reminder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ReminderStatus;

/// A recurring reminder scheduled for one owner.
///
/// A candidate with N target weekdays produces N rows, one per weekday
/// slot, so that each slot is an independently cancellable unit. A row
/// with `weekday = None` repeats daily.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    /// Unique row identifier.
    pub id: Uuid,
    /// The person this reminder is about.
    pub owner_id: String,
    /// Stable identifier derived from the normalized message text. The
    /// same logical activity keeps the same id across re-extractions.
    pub activity_id: String,
    /// Reminder message shown to the recipient.
    pub message: String,
    /// Hour of day in the owner's timezone (0-23).
    pub hour: u8,
    /// Minute of hour (0-59).
    pub minute: u8,
    /// Target weekday, Sunday = 0. `None` fires every day.
    pub weekday: Option<u8>,
    /// Lifecycle status.
    pub status: ReminderStatus,
    /// Next fire instant in UTC. `None` iff cancelled.
    pub next_fire_at: Option<DateTime<Utc>>,
    /// IANA timezone the owner's wall clock is interpreted in.
    pub timezone: String,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was cancelled, if it was.
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Reminder {
    /// Check whether this reminder is still active.
    pub fn is_scheduled(&self) -> bool {
        self.status == ReminderStatus::Scheduled
    }

    /// Check whether this reminder is due at the given instant.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_scheduled() && self.next_fire_at.is_some_and(|at| at <= now)
    }
}
