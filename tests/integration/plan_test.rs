//! Plan ingest tests: extraction wiring, degradation, event notifications.

use std::sync::Arc;

use chrono::{Duration, Utc};

use dietcue_entity::event::EventKind;

use crate::helpers::{StaticExtractor, TestApp, candidate};

const OWNER: &str = "U1";
const TZ: &str = "Asia/Kolkata";
const SUBJECT_TOKEN: &str = "ExponentPushToken[subject-1]";

#[tokio::test]
async fn test_ingest_schedules_from_extractor_output() {
    let app = TestApp::new().await;
    app.register_subject(OWNER, SUBJECT_TOKEN).await;

    let service = app.plan_service(Arc::new(StaticExtractor::returning(vec![
        candidate("Take vitamin", 9, 0, vec![1, 3, 5]),
        candidate("Drink water", 14, 30, vec![]),
    ])));

    let report = service
        .ingest(OWNER, TZ, Utc::now() + Duration::days(30), "Breakfast at 9am")
        .await
        .unwrap();

    assert_eq!(report.scheduled, 4);
    assert_eq!(
        app.reminders.count_scheduled_by_owner(OWNER).await.unwrap(),
        4
    );

    // The plan itself was persisted.
    let plan = app.plans.find_by_owner(OWNER).await.unwrap().unwrap();
    assert_eq!(plan.plan_text, "Breakfast at 9am");
    assert_eq!(plan.timezone, TZ);
}

#[tokio::test]
async fn test_ingest_notifies_subject_of_issued_plan() {
    let app = TestApp::new().await;
    app.register_subject(OWNER, SUBJECT_TOKEN).await;

    let service = app.plan_service(Arc::new(StaticExtractor::returning(vec![])));
    service
        .ingest(OWNER, TZ, Utc::now() + Duration::days(30), "Rest day")
        .await
        .unwrap();

    let sent = app.transport.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].token, SUBJECT_TOKEN);
    assert_eq!(sent[0].data["kind"], "plan_issued");
}

#[tokio::test]
async fn test_extraction_failure_still_cancels_prior_reminders() {
    let app = TestApp::new().await;

    // Seed reminders from an earlier, readable plan.
    app.scheduler
        .reconcile(OWNER, vec![candidate("Take vitamin", 9, 0, vec![])], TZ)
        .await
        .unwrap();
    assert_eq!(
        app.reminders.count_scheduled_by_owner(OWNER).await.unwrap(),
        1
    );

    let service = app.plan_service(Arc::new(StaticExtractor::failing()));
    let report = service
        .ingest(OWNER, TZ, Utc::now() + Duration::days(30), "???")
        .await
        .unwrap();

    // The new plan could not be read; nothing stale survives.
    assert_eq!(report.scheduled, 0);
    assert_eq!(report.cancelled_confirmed, 1);
    assert_eq!(
        app.reminders.count_scheduled_by_owner(OWNER).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_reissued_plan_replaces_previous_schedule() {
    let app = TestApp::new().await;

    let first = app.plan_service(Arc::new(StaticExtractor::returning(vec![
        candidate("Take vitamin", 9, 0, vec![1, 3, 5]),
    ])));
    first
        .ingest(OWNER, TZ, Utc::now() + Duration::days(30), "Plan v1")
        .await
        .unwrap();

    let second = app.plan_service(Arc::new(StaticExtractor::returning(vec![
        candidate("Evening walk", 18, 0, vec![]),
    ])));
    second
        .ingest(OWNER, TZ, Utc::now() + Duration::days(60), "Plan v2")
        .await
        .unwrap();

    let active = app.reminders.find_scheduled_by_owner(OWNER).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].message, "Evening walk");

    let plan = app.plans.find_by_owner(OWNER).await.unwrap().unwrap();
    assert_eq!(plan.plan_text, "Plan v2");
}

#[tokio::test]
async fn test_event_notification_goes_to_subject() {
    let app = TestApp::new().await;
    app.register_subject(OWNER, SUBJECT_TOKEN).await;

    let service = app.plan_service(Arc::new(StaticExtractor::returning(vec![])));
    let delivered = service
        .notify_event(
            EventKind::Appointment,
            OWNER,
            "Appointment",
            "Checkup tomorrow at 10:00",
        )
        .await;

    assert!(delivered);
    let sent = app.transport.sent.lock().await;
    assert_eq!(sent[0].data["kind"], "appointment");
}

#[tokio::test]
async fn test_event_notification_without_device_reports_false() {
    let app = TestApp::new().await;

    let service = app.plan_service(Arc::new(StaticExtractor::returning(vec![])));
    let delivered = service
        .notify_event(EventKind::Message, OWNER, "Message", "Hello")
        .await;

    assert!(!delivered);
}
