//! Firing sweep tests: claims, rescheduling, and the cancel/fire race.

use chrono::{Duration, Utc};
use uuid::Uuid;

use dietcue_entity::reminder::{Reminder, ReminderStatus};

use crate::helpers::{TestApp, candidate};

const OWNER: &str = "U1";
const TZ: &str = "Asia/Kolkata";

/// Insert a daily reminder whose fire instant is already in the past.
async fn seed_due_reminder(app: &TestApp, fired_at: chrono::DateTime<Utc>) -> Reminder {
    let reminder = Reminder {
        id: Uuid::new_v4(),
        owner_id: OWNER.to_string(),
        activity_id: "act-1".to_string(),
        message: "Take vitamin".to_string(),
        hour: 9,
        minute: 0,
        weekday: None,
        status: ReminderStatus::Scheduled,
        next_fire_at: Some(fired_at),
        timezone: TZ.to_string(),
        created_at: Utc::now(),
        cancelled_at: None,
    };
    app.reminders.create(&reminder).await.unwrap();
    reminder
}

#[tokio::test]
async fn test_claim_advances_fire_instant_exactly_once() {
    let app = TestApp::new().await;
    let now = Utc::now();
    let due_at = now - Duration::minutes(5);
    seed_due_reminder(&app, due_at).await;

    let claimed = app.scheduler.claim_due(now).await.unwrap();
    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].fired_at, due_at);

    // The stored row now points at a future occurrence.
    let row = app
        .reminders
        .find_by_id(claimed[0].reminder.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, ReminderStatus::Scheduled);
    assert!(row.next_fire_at.unwrap() > now);

    // A second sweep at the same instant has nothing to claim.
    let again = app.scheduler.claim_due(now).await.unwrap();
    assert!(again.is_empty());
}

#[tokio::test]
async fn test_firing_never_terminates_a_repeating_reminder() {
    let app = TestApp::new().await;
    let now = Utc::now();
    let reminder = seed_due_reminder(&app, now - Duration::minutes(1)).await;

    app.scheduler.claim_due(now).await.unwrap();

    let row = app.reminders.find_by_id(reminder.id).await.unwrap().unwrap();
    assert_eq!(row.status, ReminderStatus::Scheduled);
    assert!(row.cancelled_at.is_none());
}

#[tokio::test]
async fn test_cancelled_reminder_is_never_claimed() {
    let app = TestApp::new().await;
    let now = Utc::now();
    let reminder = seed_due_reminder(&app, now - Duration::minutes(1)).await;

    let cancelled = app.reminders.cancel(reminder.id, now).await.unwrap();
    assert!(cancelled);

    let claimed = app.scheduler.claim_due(now).await.unwrap();
    assert!(claimed.is_empty());
}

#[tokio::test]
async fn test_future_reminder_is_not_due() {
    let app = TestApp::new().await;
    let now = Utc::now();
    seed_due_reminder(&app, now + Duration::hours(2)).await;

    let claimed = app.scheduler.claim_due(now).await.unwrap();
    assert!(claimed.is_empty());
}

#[tokio::test]
async fn test_concurrent_cancel_and_fire_resolve_exclusively() {
    let app = TestApp::new().await;
    let now = Utc::now();

    app.scheduler
        .reconcile(OWNER, vec![candidate("Take vitamin", 9, 0, vec![])], TZ)
        .await
        .unwrap();
    // Force the row due so the sweep will try to claim it.
    sqlx::query("UPDATE reminders SET next_fire_at = ? WHERE owner_id = ?")
        .bind(now - Duration::minutes(1))
        .bind(OWNER)
        .execute(&app.pool)
        .await
        .unwrap();

    let (claimed, report) = tokio::join!(
        app.scheduler.claim_due(now),
        app.scheduler.reconcile(OWNER, vec![], TZ)
    );
    let claimed = claimed.unwrap();
    let report = report.unwrap();

    // Exactly one of {claimed-and-rescheduled, cancelled-and-not-claimed}
    // per record: the claim count and confirmed-cancellation count are
    // each at most one, and no stale active row survives either ordering.
    assert!(claimed.len() <= 1);
    assert!(report.cancelled_confirmed <= 1);
    assert_eq!(
        app.reminders.count_scheduled_by_owner(OWNER).await.unwrap(),
        0
    );
}
