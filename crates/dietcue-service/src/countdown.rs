//! Plan-expiry countdown sweep.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use dietcue_core::AppResult;
use dietcue_database::repositories::{CountdownRepository, PlanRepository};
use dietcue_entity::countdown::CountdownWindow;
use dietcue_entity::recipient::RecipientRole;

use crate::router::DeliveryRouter;

/// Periodic sweep over active plans that alerts the advisor as a plan's
/// validity window nears expiry.
///
/// Each threshold crossing alerts at most once per owner: the state row is
/// advanced with a conditional write *before* the send, so concurrent
/// sweeps cannot double-alert. The alert is always routed to the advisor
/// role — this is the only delivery call site in the sweep, and the role
/// argument is hardcoded rather than computed.
#[derive(Debug)]
pub struct CountdownMonitor {
    /// Plan validity source.
    plans: Arc<PlanRepository>,
    /// Per-owner alert state.
    countdown: Arc<CountdownRepository>,
    /// Delivery router.
    router: Arc<DeliveryRouter>,
}

impl CountdownMonitor {
    /// Create a new countdown monitor.
    pub fn new(
        plans: Arc<PlanRepository>,
        countdown: Arc<CountdownRepository>,
        router: Arc<DeliveryRouter>,
    ) -> Self {
        Self {
            plans,
            countdown,
            router,
        }
    }

    /// Sweep all unexpired plans at `now`. Returns the number of alerts
    /// dispatched.
    pub async fn sweep(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let plans = self.plans.find_unexpired(now).await?;
        let mut alerts = 0;

        for plan in plans {
            let Some(remaining) = plan.remaining(now) else {
                continue;
            };
            let Some(window) = CountdownWindow::for_remaining(remaining) else {
                continue;
            };

            let crossed = match self
                .countdown
                .try_mark_alerted(&plan.owner_id, window.as_str(), now)
                .await
            {
                Ok(crossed) => crossed,
                Err(e) => {
                    warn!(
                        owner_id = %plan.owner_id,
                        error = %e,
                        "Failed to advance countdown state, skipping owner"
                    );
                    continue;
                }
            };

            if !crossed {
                debug!(
                    owner_id = %plan.owner_id,
                    window = %window,
                    "Window already alerted, skipping"
                );
                continue;
            }

            let data = serde_json::json!({
                "kind": "plan_countdown",
                "owner_id": plan.owner_id,
                "window": window.as_str(),
                "valid_until": plan.valid_until,
            });
            let delivered = self
                .router
                .resolve_and_deliver(
                    RecipientRole::Advisor,
                    &plan.owner_id,
                    "Plan expiring soon",
                    window.alert_body(),
                    data,
                )
                .await;

            info!(
                owner_id = %plan.owner_id,
                window = %window,
                delivered,
                "Countdown alert dispatched"
            );
            alerts += 1;
        }

        Ok(alerts)
    }
}
