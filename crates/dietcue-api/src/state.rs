//! Shared application state for the HTTP layer.

use std::sync::Arc;

use sqlx::SqlitePool;

use dietcue_database::repositories::DeviceRepository;
use dietcue_service::plan::PlanService;
use dietcue_service::scheduler::ReminderScheduler;

/// State threaded through every route handler.
#[derive(Clone)]
pub struct AppState {
    /// Plan ingest and event notifications.
    pub plan_service: Arc<PlanService>,
    /// Reminder scheduler (listing).
    pub scheduler: Arc<ReminderScheduler>,
    /// Device/token directory.
    pub devices: Arc<DeviceRepository>,
    /// Database pool (health checks).
    pub pool: SqlitePool,
}
