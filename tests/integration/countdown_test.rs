//! Countdown sweep tests: single alert per window, advisor targeting.

use chrono::{DateTime, Duration, Utc};

use dietcue_entity::plan::Plan;

use crate::helpers::TestApp;

const OWNER: &str = "U1";
const SUBJECT_TOKEN: &str = "ExponentPushToken[subject-1]";
const ADVISOR_TOKEN: &str = "ExponentPushToken[advisor-1]";

async fn seed_plan(app: &TestApp, owner_id: &str, valid_until: DateTime<Utc>) {
    let plan = Plan {
        owner_id: owner_id.to_string(),
        timezone: "Asia/Kolkata".to_string(),
        valid_until,
        plan_text: "Breakfast at 9am".to_string(),
        issued_at: Utc::now(),
    };
    app.plans.upsert(&plan).await.unwrap();
}

#[tokio::test]
async fn test_each_window_alerts_at_most_once() {
    let app = TestApp::new().await;
    app.register_advisor("advisor", ADVISOR_TOKEN).await;

    let now = Utc::now();
    seed_plan(&app, OWNER, now + Duration::days(5)).await;

    let first = app.monitor.sweep(now).await.unwrap();
    assert_eq!(first, 1);

    // Repeated sweeps inside the same window stay silent.
    let second = app.monitor.sweep(now + Duration::hours(1)).await.unwrap();
    assert_eq!(second, 0);
    assert_eq!(app.transport.sent_tokens().await.len(), 1);
}

#[tokio::test]
async fn test_windows_progress_from_seven_days_to_one_day() {
    let app = TestApp::new().await;
    app.register_advisor("advisor", ADVISOR_TOKEN).await;

    let expiry = Utc::now() + Duration::days(10);
    seed_plan(&app, OWNER, expiry).await;

    // Too early for any window.
    assert_eq!(app.monitor.sweep(expiry - Duration::days(9)).await.unwrap(), 0);
    // Crossing into the 7-day window alerts once.
    assert_eq!(app.monitor.sweep(expiry - Duration::days(6)).await.unwrap(), 1);
    assert_eq!(app.monitor.sweep(expiry - Duration::days(5)).await.unwrap(), 0);
    // Crossing into the 1-day window alerts again.
    assert_eq!(app.monitor.sweep(expiry - Duration::hours(20)).await.unwrap(), 1);
    assert_eq!(app.monitor.sweep(expiry - Duration::hours(2)).await.unwrap(), 0);

    let sent = app.transport.sent.lock().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].body, "The plan expires in less than 7 days.");
    assert_eq!(sent[1].body, "The plan expires in less than 24 hours.");
}

#[tokio::test]
async fn test_alert_targets_advisor_not_subject() {
    let app = TestApp::new().await;
    app.register_subject(OWNER, SUBJECT_TOKEN).await;
    app.register_advisor("advisor", ADVISOR_TOKEN).await;

    let now = Utc::now();
    seed_plan(&app, OWNER, now + Duration::days(2)).await;

    app.monitor.sweep(now).await.unwrap();

    assert_eq!(app.transport.sent_tokens().await, vec![ADVISOR_TOKEN]);
}

#[tokio::test]
async fn test_owner_first_seen_inside_one_day_skips_seven_day_alert() {
    let app = TestApp::new().await;
    app.register_advisor("advisor", ADVISOR_TOKEN).await;

    let now = Utc::now();
    seed_plan(&app, OWNER, now + Duration::hours(12)).await;

    assert_eq!(app.monitor.sweep(now).await.unwrap(), 1);

    let sent = app.transport.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "The plan expires in less than 24 hours.");
}

#[tokio::test]
async fn test_expired_plan_is_ignored() {
    let app = TestApp::new().await;
    app.register_advisor("advisor", ADVISOR_TOKEN).await;

    let now = Utc::now();
    seed_plan(&app, OWNER, now - Duration::hours(1)).await;

    assert_eq!(app.monitor.sweep(now).await.unwrap(), 0);
    assert!(app.transport.sent_tokens().await.is_empty());
}

#[tokio::test]
async fn test_state_is_tracked_per_owner() {
    let app = TestApp::new().await;
    app.register_advisor("advisor", ADVISOR_TOKEN).await;

    let now = Utc::now();
    seed_plan(&app, "U1", now + Duration::days(3)).await;
    seed_plan(&app, "U2", now + Duration::days(3)).await;

    // Both owners cross the 7-day threshold independently.
    assert_eq!(app.monitor.sweep(now).await.unwrap(), 2);
    assert_eq!(app.monitor.sweep(now).await.unwrap(), 0);
}

#[tokio::test]
async fn test_alert_counts_even_when_advisor_unreachable() {
    let app = TestApp::new().await;
    // No advisor device registered.

    let now = Utc::now();
    seed_plan(&app, OWNER, now + Duration::days(2)).await;

    // The crossing is consumed; it is not retried once the state advanced.
    assert_eq!(app.monitor.sweep(now).await.unwrap(), 1);
    assert_eq!(app.monitor.sweep(now).await.unwrap(), 0);
    assert!(app.transport.sent_tokens().await.is_empty());
}
