//! Plan repository implementation.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use dietcue_core::error::{AppError, ErrorKind};
use dietcue_core::result::AppResult;
use dietcue_entity::plan::Plan;

/// Repository for plan rows (one active plan per owner).
#[derive(Debug, Clone)]
pub struct PlanRepository {
    pool: SqlitePool,
}

impl PlanRepository {
    /// Create a new plan repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace the owner's plan.
    pub async fn upsert(&self, plan: &Plan) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO plans (owner_id, timezone, valid_until, plan_text, issued_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(owner_id) DO UPDATE SET \
             timezone = excluded.timezone, \
             valid_until = excluded.valid_until, \
             plan_text = excluded.plan_text, \
             issued_at = excluded.issued_at",
        )
        .bind(&plan.owner_id)
        .bind(&plan.timezone)
        .bind(plan.valid_until)
        .bind(&plan.plan_text)
        .bind(plan.issued_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert plan", e))?;
        Ok(())
    }

    /// Find the plan issued to an owner.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Option<Plan>> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find plan", e))
    }

    /// List plans whose validity window has not yet passed.
    pub async fn find_unexpired(&self, now: DateTime<Utc>) -> AppResult<Vec<Plan>> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE valid_until > ? ORDER BY owner_id")
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list unexpired plans", e)
            })
    }
}
