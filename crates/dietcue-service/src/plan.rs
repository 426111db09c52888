//! Plan ingest: persist, extract, reconcile, notify.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use dietcue_core::AppResult;
use dietcue_core::traits::PlanExtractor;
use dietcue_database::repositories::PlanRepository;
use dietcue_entity::event::EventKind;
use dietcue_entity::plan::Plan;
use dietcue_entity::recipient::RecipientRole;

use crate::router::DeliveryRouter;
use crate::scheduler::{ReconcileReport, ReminderScheduler};

/// Handles new-plan events: stores the plan, runs extraction, reconciles
/// the owner's reminders, and emits the "plan issued" event notification.
#[derive(Debug)]
pub struct PlanService {
    /// Plan repository.
    plans: Arc<PlanRepository>,
    /// External text-understanding call.
    extractor: Arc<dyn PlanExtractor>,
    /// Reminder scheduler.
    scheduler: Arc<ReminderScheduler>,
    /// Delivery router.
    router: Arc<DeliveryRouter>,
}

impl PlanService {
    /// Create a new plan service.
    pub fn new(
        plans: Arc<PlanRepository>,
        extractor: Arc<dyn PlanExtractor>,
        scheduler: Arc<ReminderScheduler>,
        router: Arc<DeliveryRouter>,
    ) -> Self {
        Self {
            plans,
            extractor,
            scheduler,
            router,
        }
    }

    /// Ingest a newly issued plan for an owner.
    ///
    /// An extraction failure degrades to an empty candidate batch: prior
    /// reminders are still cancelled, which is the safe outcome when the
    /// new plan cannot be read. The "plan issued" notification to the
    /// subject is best-effort and does not affect the report.
    pub async fn ingest(
        &self,
        owner_id: &str,
        timezone: &str,
        valid_until: DateTime<Utc>,
        plan_text: &str,
    ) -> AppResult<ReconcileReport> {
        let plan = Plan {
            owner_id: owner_id.to_string(),
            timezone: timezone.to_string(),
            valid_until,
            plan_text: plan_text.to_string(),
            issued_at: Utc::now(),
        };
        self.plans.upsert(&plan).await?;

        let candidates = match self.extractor.extract(plan_text).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    owner_id,
                    error = %e,
                    "Extraction failed, reconciling with empty batch"
                );
                Vec::new()
            }
        };

        let report = self.scheduler.reconcile(owner_id, candidates, timezone).await?;

        self.notify_event(
            EventKind::PlanIssued,
            owner_id,
            "Your new plan is ready",
            "A new plan has been issued. Reminders have been updated.",
        )
        .await;

        info!(
            owner_id,
            scheduled = report.scheduled,
            "Plan ingested"
        );
        Ok(report)
    }

    /// Deliver a one-off event notification (plan issued, message,
    /// appointment) to the subject. Best-effort.
    pub async fn notify_event(
        &self,
        kind: EventKind,
        owner_id: &str,
        title: &str,
        body: &str,
    ) -> bool {
        let data = serde_json::json!({
            "kind": kind.as_str(),
            "owner_id": owner_id,
        });
        self.router
            .resolve_and_deliver(RecipientRole::Subject, owner_id, title, body, data)
            .await
    }
}
