//! Cron scheduler for periodic sweeps.

use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use dietcue_core::config::countdown::CountdownConfig;
use dietcue_core::error::AppError;
use dietcue_service::countdown::CountdownMonitor;

/// Cron-based scheduler for periodic background sweeps.
pub struct CronScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler })
    }

    /// Register the plan-expiry countdown sweep.
    pub async fn register_countdown_sweep(
        &self,
        monitor: Arc<CountdownMonitor>,
        config: &CountdownConfig,
    ) -> Result<(), AppError> {
        let job = CronJob::new_async(config.sweep_schedule.as_str(), move |_uuid, _lock| {
            let monitor = Arc::clone(&monitor);
            Box::pin(async move {
                tracing::debug!("Running countdown sweep");
                match monitor.sweep(Utc::now()).await {
                    Ok(alerts) if alerts > 0 => {
                        tracing::info!("Countdown sweep dispatched {} alert(s)", alerts);
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!("Countdown sweep failed: {}", e),
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create countdown schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add countdown schedule: {e}")))?;

        tracing::info!(
            "Registered: countdown_sweep ({})",
            config.sweep_schedule
        );
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
