//! Reminder repository implementation.
//!
//! This is the notification registry: the only durable contract the
//! scheduling core owns. Cancellation and fire-claims are conditional
//! updates keyed on the current status (and expected fire instant), which
//! is what makes concurrent reconcile and firing sweeps race-safe.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use dietcue_core::error::{AppError, ErrorKind};
use dietcue_core::result::AppResult;
use dietcue_entity::reminder::Reminder;

/// Repository for reminder rows.
#[derive(Debug, Clone)]
pub struct ReminderRepository {
    pool: SqlitePool,
}

impl ReminderRepository {
    /// Create a new reminder repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new reminder row.
    pub async fn create(&self, reminder: &Reminder) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO reminders (id, owner_id, activity_id, message, hour, minute, weekday, \
             status, next_fire_at, timezone, created_at, cancelled_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(reminder.id)
        .bind(&reminder.owner_id)
        .bind(&reminder.activity_id)
        .bind(&reminder.message)
        .bind(reminder.hour)
        .bind(reminder.minute)
        .bind(reminder.weekday)
        .bind(reminder.status)
        .bind(reminder.next_fire_at)
        .bind(&reminder.timezone)
        .bind(reminder.created_at)
        .bind(reminder.cancelled_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create reminder", e))?;
        Ok(())
    }

    /// Find a reminder by id.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reminder>> {
        sqlx::query_as::<_, Reminder>("SELECT * FROM reminders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find reminder", e))
    }

    /// List all scheduled reminders for an owner.
    pub async fn find_scheduled_by_owner(&self, owner_id: &str) -> AppResult<Vec<Reminder>> {
        sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE owner_id = ? AND status = 'scheduled' \
             ORDER BY created_at, activity_id, weekday",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list scheduled reminders", e)
        })
    }

    /// Count scheduled reminders for an owner.
    pub async fn count_scheduled_by_owner(&self, owner_id: &str) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM reminders WHERE owner_id = ? AND status = 'scheduled'",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count reminders", e))
    }

    /// Cancel a reminder, but only if it is still scheduled.
    ///
    /// Returns `true` when this call performed the transition. `false`
    /// means the row was already cancelled (or gone), so the caller must
    /// not count it as a confirmed cancellation.
    pub async fn cancel(&self, id: Uuid, cancelled_at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE reminders SET status = 'cancelled', cancelled_at = ?, next_fire_at = NULL \
             WHERE id = ? AND status = 'scheduled'",
        )
        .bind(cancelled_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cancel reminder", e))?;
        Ok(result.rows_affected() == 1)
    }

    /// List scheduled reminders due at or before `now`.
    pub async fn find_due(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<Reminder>> {
        sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE status = 'scheduled' AND next_fire_at <= ? \
             ORDER BY next_fire_at LIMIT ?",
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list due reminders", e))
    }

    /// Claim a due reminder by advancing its fire instant.
    ///
    /// The update only applies while the row is still scheduled *and*
    /// still points at the fire instant the caller observed. Exactly one
    /// claimant wins per crossing; losers observe `false` and skip
    /// delivery.
    pub async fn claim_fire(
        &self,
        id: Uuid,
        observed_fire_at: DateTime<Utc>,
        next_fire_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE reminders SET next_fire_at = ? \
             WHERE id = ? AND status = 'scheduled' AND next_fire_at = ?",
        )
        .bind(next_fire_at)
        .bind(id)
        .bind(observed_fire_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim reminder", e))?;
        Ok(result.rows_affected() == 1)
    }
}
