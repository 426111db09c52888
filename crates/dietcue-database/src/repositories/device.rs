//! Device directory repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use dietcue_core::error::{AppError, ErrorKind};
use dietcue_core::result::AppResult;
use dietcue_entity::recipient::Device;

/// Repository for the device/token directory.
///
/// The single authoritative source of role truth: advisor detection is a
/// flag on the directory row, never an address-string comparison.
#[derive(Debug, Clone)]
pub struct DeviceRepository {
    pool: SqlitePool,
}

impl DeviceRepository {
    /// Create a new device repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register or update a device token for an identity.
    pub async fn upsert(
        &self,
        identity: &str,
        push_token: Option<&str>,
        is_advisor: bool,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO devices (identity, push_token, is_advisor, updated_at) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(identity) DO UPDATE SET \
             push_token = excluded.push_token, \
             is_advisor = excluded.is_advisor, \
             updated_at = excluded.updated_at",
        )
        .bind(identity)
        .bind(push_token)
        .bind(is_advisor)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert device", e))?;
        Ok(())
    }

    /// Look up the device registered for an identity.
    pub async fn find_by_identity(&self, identity: &str) -> AppResult<Option<Device>> {
        sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE identity = ?")
            .bind(identity)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find device", e))
    }

    /// Look up the advisor's device, if one is registered.
    ///
    /// The domain has a single advisor; if several rows carry the flag the
    /// most recently updated one wins.
    pub async fn find_advisor(&self) -> AppResult<Option<Device>> {
        sqlx::query_as::<_, Device>(
            "SELECT * FROM devices WHERE is_advisor = 1 ORDER BY updated_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find advisor", e))
    }
}
