//! Countdown state repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use dietcue_core::error::{AppError, ErrorKind};
use dietcue_core::result::AppResult;
use dietcue_entity::countdown::CountdownState;

/// Repository for per-owner countdown alert state.
#[derive(Debug, Clone)]
pub struct CountdownRepository {
    pool: SqlitePool,
}

impl CountdownRepository {
    /// Create a new countdown repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the countdown state for an owner.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Option<CountdownState>> {
        sqlx::query_as::<_, CountdownState>("SELECT * FROM countdown_state WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find countdown state", e)
            })
    }

    /// Record that `window` has been alerted for `owner_id`, but only if it
    /// is not already the last alerted window.
    ///
    /// Returns `true` when this call performed the transition; under
    /// concurrent sweeps exactly one caller wins per crossing, and only the
    /// winner dispatches the alert.
    pub async fn try_mark_alerted(
        &self,
        owner_id: &str,
        window: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO countdown_state (owner_id, last_alerted_window, updated_at) \
             VALUES (?, ?, ?) \
             ON CONFLICT(owner_id) DO UPDATE SET \
             last_alerted_window = excluded.last_alerted_window, \
             updated_at = excluded.updated_at \
             WHERE countdown_state.last_alerted_window IS NOT excluded.last_alerted_window",
        )
        .bind(owner_id)
        .bind(window)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to advance countdown state", e)
        })?;
        Ok(result.rows_affected() == 1)
    }
}
