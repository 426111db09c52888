//! Reconcile workflow tests: idempotency, weekday expansion, validation.

use chrono::{Datelike, Timelike, Utc};
use chrono_tz::Tz;

use crate::helpers::{TestApp, candidate};

const OWNER: &str = "U1";
const TZ: &str = "Asia/Kolkata";

#[tokio::test]
async fn test_weekday_candidate_expands_to_one_record_per_weekday() {
    let app = TestApp::new().await;

    let report = app
        .scheduler
        .reconcile(OWNER, vec![candidate("Take vitamin", 9, 0, vec![1, 3, 5])], TZ)
        .await
        .unwrap();

    assert_eq!(report.scheduled, 3);
    assert_eq!(report.cancelled_attempted, 0);

    let active = app.reminders.find_scheduled_by_owner(OWNER).await.unwrap();
    assert_eq!(active.len(), 3);

    let tz: Tz = TZ.parse().unwrap();
    let mut weekdays: Vec<u8> = active.iter().map(|r| r.weekday.unwrap()).collect();
    weekdays.sort_unstable();
    assert_eq!(weekdays, vec![1, 3, 5]);

    for reminder in &active {
        let fire_at = reminder.next_fire_at.unwrap();
        assert!(fire_at > Utc::now() - chrono::Duration::seconds(5));
        // The fire instant is 09:00 local on the record's weekday.
        let local = fire_at.with_timezone(&tz);
        assert_eq!(local.hour(), 9);
        assert_eq!(local.minute(), 0);
        assert_eq!(
            local.weekday().num_days_from_sunday() as u8,
            reminder.weekday.unwrap()
        );
    }
}

#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let app = TestApp::new().await;
    let batch = vec![candidate("Take vitamin", 9, 0, vec![1, 3, 5])];

    let first = app
        .scheduler
        .reconcile(OWNER, batch.clone(), TZ)
        .await
        .unwrap();
    assert_eq!(first.scheduled, 3);

    let second = app.scheduler.reconcile(OWNER, batch, TZ).await.unwrap();
    assert_eq!(second.cancelled_attempted, 3);
    assert_eq!(second.cancelled_confirmed, 3);
    assert_eq!(second.scheduled, 3);

    // No accumulation: net active count unchanged.
    let count = app.reminders.count_scheduled_by_owner(OWNER).await.unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_at_most_one_active_record_per_activity_slot() {
    let app = TestApp::new().await;
    let batch = vec![
        candidate("Take vitamin", 9, 0, vec![1, 3]),
        candidate("Drink water", 14, 30, vec![]),
    ];

    app.scheduler.reconcile(OWNER, batch.clone(), TZ).await.unwrap();
    app.scheduler.reconcile(OWNER, batch, TZ).await.unwrap();

    let active = app.reminders.find_scheduled_by_owner(OWNER).await.unwrap();
    let mut slots: Vec<(String, Option<u8>)> = active
        .iter()
        .map(|r| (r.activity_id.clone(), r.weekday))
        .collect();
    let total = slots.len();
    slots.sort();
    slots.dedup();
    assert_eq!(slots.len(), total, "duplicate (activity, weekday) slot found");
}

#[tokio::test]
async fn test_shrunken_batch_cancels_stale_reminders() {
    let app = TestApp::new().await;

    app.scheduler
        .reconcile(
            OWNER,
            vec![
                candidate("Take vitamin", 9, 0, vec![]),
                candidate("Evening walk", 18, 0, vec![]),
            ],
            TZ,
        )
        .await
        .unwrap();

    // Re-extraction returns fewer activities; nothing stale may survive.
    let report = app
        .scheduler
        .reconcile(OWNER, vec![candidate("Take vitamin", 9, 0, vec![])], TZ)
        .await
        .unwrap();
    assert_eq!(report.cancelled_confirmed, 2);
    assert_eq!(report.scheduled, 1);

    let active = app.reminders.find_scheduled_by_owner(OWNER).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].message, "Take vitamin");
}

#[tokio::test]
async fn test_empty_weekdays_yields_single_daily_record() {
    let app = TestApp::new().await;

    let report = app
        .scheduler
        .reconcile(OWNER, vec![candidate("Drink water", 14, 30, vec![])], TZ)
        .await
        .unwrap();
    assert_eq!(report.scheduled, 1);

    let active = app.reminders.find_scheduled_by_owner(OWNER).await.unwrap();
    assert_eq!(active[0].weekday, None);
}

#[tokio::test]
async fn test_malformed_candidates_are_dropped_not_fatal() {
    let app = TestApp::new().await;

    let report = app
        .scheduler
        .reconcile(
            OWNER,
            vec![
                candidate("Bad hour", 25, 0, vec![]),
                candidate("Bad weekday", 9, 0, vec![9]),
                candidate("", 9, 0, vec![]),
                candidate("Good", 9, 0, vec![]),
            ],
            TZ,
        )
        .await
        .unwrap();

    assert_eq!(report.scheduled, 1);
    let active = app.reminders.find_scheduled_by_owner(OWNER).await.unwrap();
    assert_eq!(active[0].message, "Good");
}

#[tokio::test]
async fn test_unknown_timezone_is_a_total_failure() {
    let app = TestApp::new().await;

    let result = app
        .scheduler
        .reconcile(OWNER, vec![candidate("x", 9, 0, vec![])], "Not/AZone")
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_reconcile_with_empty_batch_cancels_everything() {
    let app = TestApp::new().await;

    app.scheduler
        .reconcile(OWNER, vec![candidate("Take vitamin", 9, 0, vec![1, 3, 5])], TZ)
        .await
        .unwrap();

    let report = app.scheduler.reconcile(OWNER, vec![], TZ).await.unwrap();
    assert_eq!(report.cancelled_confirmed, 3);
    assert_eq!(report.scheduled, 0);

    let count = app.reminders.count_scheduled_by_owner(OWNER).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_reconcile_is_scoped_to_one_owner() {
    let app = TestApp::new().await;

    app.scheduler
        .reconcile("U1", vec![candidate("Take vitamin", 9, 0, vec![])], TZ)
        .await
        .unwrap();
    app.scheduler
        .reconcile("U2", vec![candidate("Take vitamin", 9, 0, vec![])], TZ)
        .await
        .unwrap();

    // U2's reconcile must not touch U1's rows.
    let report = app.scheduler.reconcile("U2", vec![], TZ).await.unwrap();
    assert_eq!(report.cancelled_confirmed, 1);
    assert_eq!(
        app.reminders.count_scheduled_by_owner("U1").await.unwrap(),
        1
    );
}
