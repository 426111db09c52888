//! Firing runner — main loop that claims due reminders and dispatches
//! deliveries.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;
use tracing;

use dietcue_core::config::scheduler::SchedulerConfig;
use dietcue_entity::recipient::RecipientRole;
use dietcue_service::router::DeliveryRouter;
use dietcue_service::scheduler::{ClaimedFire, ReminderScheduler};

/// Polls for due reminders and dispatches each claimed fire as an
/// independent delivery task.
///
/// Exactly one runner instance should be active per deployment; the claim
/// step makes a second instance harmless but wasteful. Deliveries are
/// I/O-bound and never block the polling loop: each runs behind a
/// semaphore with a timeout, and one that exceeds the timeout is abandoned
/// rather than retried (the next recurrence is the retry).
#[derive(Debug)]
pub struct FiringRunner {
    /// Reminder scheduler (claim step).
    scheduler: Arc<ReminderScheduler>,
    /// Delivery router.
    router: Arc<DeliveryRouter>,
    /// Loop configuration.
    config: SchedulerConfig,
}

impl FiringRunner {
    /// Create a new firing runner.
    pub fn new(
        scheduler: Arc<ReminderScheduler>,
        router: Arc<DeliveryRouter>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            scheduler,
            router,
            config,
        }
    }

    /// Start the firing loop — runs until the cancel signal is received.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            poll_interval = self.config.poll_interval_seconds,
            concurrency = self.config.delivery_concurrency,
            "Firing runner started"
        );

        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.config.delivery_concurrency));
        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds);

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        tracing::info!("Firing runner received shutdown signal");
                        break;
                    }
                }
                _ = self.tick(&semaphore) => {
                    tokio::select! {
                        _ = cancel.changed() => {
                            if *cancel.borrow() {
                                tracing::info!("Firing runner shutting down");
                                break;
                            }
                        }
                        _ = time::sleep(poll_interval) => {}
                    }
                }
            }
        }

        tracing::info!("Firing runner waiting for in-flight deliveries...");
        let max_permits = self.config.delivery_concurrency as u32;
        let _ =
            tokio::time::timeout(Duration::from_secs(30), semaphore.acquire_many(max_permits)).await;
        tracing::info!("Firing runner shut down complete");
    }

    /// One poll: claim everything due and dispatch deliveries.
    async fn tick(&self, semaphore: &Arc<tokio::sync::Semaphore>) {
        let claimed = match self.scheduler.claim_due(Utc::now()).await {
            Ok(claimed) => claimed,
            Err(e) => {
                tracing::error!("Failed to poll due reminders: {}", e);
                return;
            }
        };

        if claimed.is_empty() {
            tracing::trace!("No reminders due");
            return;
        }

        tracing::info!("Claimed {} due reminder(s)", claimed.len());

        for fire in claimed {
            let permit = match Arc::clone(semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return, // semaphore closed, shutting down
            };

            let router = Arc::clone(&self.router);
            let timeout = Duration::from_secs(self.config.delivery_timeout_seconds);

            tokio::spawn(async move {
                let _permit = permit;
                deliver_fire(router, fire, timeout).await;
            });
        }
    }
}

/// Deliver one claimed fire to its subject, bounded by `timeout`.
async fn deliver_fire(router: Arc<DeliveryRouter>, fire: ClaimedFire, timeout: Duration) {
    let reminder = &fire.reminder;
    let data = serde_json::json!({
        "kind": "activity_reminder",
        "activity_id": reminder.activity_id,
        "fired_at": fire.fired_at,
    });

    let delivery = router.resolve_and_deliver(
        RecipientRole::Subject,
        &reminder.owner_id,
        "Reminder",
        &reminder.message,
        data,
    );

    match tokio::time::timeout(timeout, delivery).await {
        Ok(delivered) => {
            tracing::debug!(
                reminder_id = %reminder.id,
                owner_id = %reminder.owner_id,
                delivered,
                "Delivery attempt finished"
            );
        }
        Err(_) => {
            // Abandoned, not retried; the record already points at its
            // next occurrence.
            tracing::warn!(
                reminder_id = %reminder.id,
                owner_id = %reminder.owner_id,
                "Delivery timed out, abandoning"
            );
        }
    }
}
