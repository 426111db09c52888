//! Reminder scheduling: the cancel-then-reschedule reconcile workflow and
//! the due-reminder claim step used by the firing loop.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use dietcue_core::AppResult;
use dietcue_core::error::AppError;
use dietcue_core::traits::ExtractedCandidate;
use dietcue_database::repositories::ReminderRepository;
use dietcue_entity::reminder::{Reminder, ReminderCandidate, ReminderStatus};

use crate::recurrence;

/// Maximum due rows claimed per firing sweep.
const FIRE_BATCH_LIMIT: i64 = 200;

/// Outcome of a reconcile call.
///
/// `cancelled_confirmed` counts real, storage-confirmed state transitions;
/// `cancelled_attempted` counts the prior active rows that were found.
/// The two differ when a cancellation write fails or loses a race, and
/// callers use the gap to detect partial failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Newly scheduled reminder rows.
    pub scheduled: usize,
    /// Prior active rows found for the owner.
    pub cancelled_attempted: usize,
    /// Cancellations confirmed by the store.
    pub cancelled_confirmed: usize,
}

/// A due reminder successfully claimed for delivery.
///
/// The stored row has already been advanced to its next occurrence; the
/// claimant owns exactly this one `fired_at` crossing.
#[derive(Debug, Clone)]
pub struct ClaimedFire {
    /// The reminder as it was when claimed.
    pub reminder: Reminder,
    /// The fire instant this claim corresponds to.
    pub fired_at: DateTime<Utc>,
}

/// Orchestrates reminder persistence, recurrence computation, and the
/// firing claim step.
#[derive(Debug)]
pub struct ReminderScheduler {
    /// Reminder repository.
    reminders: Arc<ReminderRepository>,
    /// Per-owner reconcile locks, so cancellation always completes before
    /// a concurrent reconcile inserts its new batch.
    owner_locks: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
}

impl ReminderScheduler {
    /// Create a new scheduler.
    pub fn new(reminders: Arc<ReminderRepository>) -> Self {
        Self {
            reminders,
            owner_locks: DashMap::new(),
        }
    }

    fn owner_lock(&self, owner_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.owner_locks
            .entry(owner_id.to_string())
            .or_default()
            .clone()
    }

    /// Reconcile the owner's scheduled reminders against a fresh candidate
    /// batch.
    ///
    /// All prior active rows are cancelled first, whether or not a matching
    /// candidate exists in the new batch, so no stale recurring reminder
    /// survives an extraction run. Invalid candidates are dropped with a
    /// warning; per-row write failures are logged and excluded from the
    /// confirmed counts. Only a total failure (unreadable prior rows,
    /// unknown timezone) is an error.
    pub async fn reconcile(
        &self,
        owner_id: &str,
        candidates: Vec<ExtractedCandidate>,
        owner_timezone: &str,
    ) -> AppResult<ReconcileReport> {
        let tz: Tz = owner_timezone.parse().map_err(|_| {
            AppError::validation(format!("Unknown timezone: '{owner_timezone}'"))
        })?;

        let lock = self.owner_lock(owner_id);
        let _guard = lock.lock().await;

        let now = Utc::now();
        let mut report = ReconcileReport::default();

        let prior = self.reminders.find_scheduled_by_owner(owner_id).await?;
        report.cancelled_attempted = prior.len();
        for reminder in &prior {
            match self.reminders.cancel(reminder.id, now).await {
                Ok(true) => report.cancelled_confirmed += 1,
                Ok(false) => {
                    debug!(
                        reminder_id = %reminder.id,
                        "Reminder was already cancelled, skipping"
                    );
                }
                Err(e) => {
                    warn!(
                        reminder_id = %reminder.id,
                        error = %e,
                        "Failed to cancel prior reminder, continuing"
                    );
                }
            }
        }

        let validated = validate_batch(candidates);
        for candidate in validated {
            let activity_id = candidate.activity_id();
            let slots: Vec<Option<u8>> = if candidate.weekdays.is_empty() {
                vec![None]
            } else {
                candidate.weekdays.iter().copied().map(Some).collect()
            };

            for weekday in slots {
                let next_fire_at =
                    recurrence::next_occurrence(candidate.hour, candidate.minute, weekday, now, &tz);
                let reminder = Reminder {
                    id: Uuid::new_v4(),
                    owner_id: owner_id.to_string(),
                    activity_id: activity_id.clone(),
                    message: candidate.message.clone(),
                    hour: candidate.hour,
                    minute: candidate.minute,
                    weekday,
                    status: ReminderStatus::Scheduled,
                    next_fire_at: Some(next_fire_at),
                    timezone: owner_timezone.to_string(),
                    created_at: now,
                    cancelled_at: None,
                };
                match self.reminders.create(&reminder).await {
                    Ok(()) => report.scheduled += 1,
                    Err(e) => {
                        warn!(
                            owner_id,
                            activity_id = %activity_id,
                            error = %e,
                            "Failed to persist reminder, continuing"
                        );
                    }
                }
            }
        }

        info!(
            owner_id,
            scheduled = report.scheduled,
            cancelled_attempted = report.cancelled_attempted,
            cancelled_confirmed = report.cancelled_confirmed,
            "Reconciled reminders"
        );
        Ok(report)
    }

    /// Claim all reminders due at or before `now`.
    ///
    /// A claim conditionally advances the row's fire instant to its next
    /// occurrence (reference = observed fire instant plus one second, so
    /// the same slot is never produced twice). A row cancelled or claimed
    /// concurrently loses the conditional update and is skipped; the
    /// caller only ever delivers for rows claimed here, which is what
    /// keeps each `next_fire_at` crossing to a single delivery.
    pub async fn claim_due(&self, now: DateTime<Utc>) -> AppResult<Vec<ClaimedFire>> {
        let due = self.reminders.find_due(now, FIRE_BATCH_LIMIT).await?;
        let mut claimed = Vec::new();

        for reminder in due {
            let Some(fired_at) = reminder.next_fire_at else {
                continue;
            };
            let tz: Tz = match reminder.timezone.parse() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        reminder_id = %reminder.id,
                        timezone = %reminder.timezone,
                        "Stored timezone no longer parses, skipping reminder"
                    );
                    continue;
                }
            };

            let next = recurrence::next_occurrence(
                reminder.hour,
                reminder.minute,
                reminder.weekday,
                fired_at + Duration::seconds(1),
                &tz,
            );

            match self.reminders.claim_fire(reminder.id, fired_at, next).await {
                Ok(true) => {
                    debug!(
                        reminder_id = %reminder.id,
                        owner_id = %reminder.owner_id,
                        next_fire_at = %next,
                        "Claimed due reminder"
                    );
                    claimed.push(ClaimedFire { reminder, fired_at });
                }
                Ok(false) => {
                    debug!(
                        reminder_id = %reminder.id,
                        "Lost claim race (cancelled or already fired), skipping"
                    );
                }
                Err(e) => {
                    warn!(reminder_id = %reminder.id, error = %e, "Failed to claim reminder");
                }
            }
        }

        Ok(claimed)
    }

    /// List the owner's currently scheduled reminders.
    pub async fn list_scheduled(&self, owner_id: &str) -> AppResult<Vec<Reminder>> {
        self.reminders.find_scheduled_by_owner(owner_id).await
    }
}

/// Validate a raw candidate batch, dropping malformed entries.
fn validate_batch(candidates: Vec<ExtractedCandidate>) -> Vec<ReminderCandidate> {
    let mut validated = Vec::with_capacity(candidates.len());
    for raw in candidates {
        match ReminderCandidate::validate(raw) {
            Ok(candidate) => validated.push(candidate),
            Err(e) => warn!(error = %e, "Dropping malformed reminder candidate"),
        }
    }
    validated
}
