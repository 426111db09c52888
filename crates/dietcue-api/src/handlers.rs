//! Route handlers.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use dietcue_core::error::AppError;
use dietcue_entity::event::EventKind;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/plans`.
#[derive(Debug, Deserialize)]
pub struct IngestPlanRequest {
    /// The person the plan was issued to.
    pub owner_id: String,
    /// IANA timezone of the owner.
    pub timezone: String,
    /// End of the plan's validity window.
    pub valid_until: DateTime<Utc>,
    /// Raw plan text.
    pub plan_text: String,
}

/// Request body for `POST /api/events`.
#[derive(Debug, Deserialize)]
pub struct NotifyEventRequest {
    /// Event kind.
    pub kind: EventKind,
    /// The person the event is about.
    pub owner_id: String,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
}

/// Request body for `PUT /api/devices/{identity}/token`.
#[derive(Debug, Deserialize)]
pub struct RegisterTokenRequest {
    /// Raw push token, or null to clear it.
    pub token: Option<String>,
    /// Whether this identity is the advisor.
    #[serde(default)]
    pub is_advisor: bool,
}

/// POST /api/plans — ingest a newly issued plan.
pub async fn ingest_plan(
    State(state): State<AppState>,
    Json(req): Json<IngestPlanRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.owner_id.trim().is_empty() {
        return Err(AppError::validation("owner_id must not be empty").into());
    }
    let report = state
        .plan_service
        .ingest(&req.owner_id, &req.timezone, req.valid_until, &req.plan_text)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": report })))
}

/// POST /api/events — deliver a one-off event notification.
pub async fn notify_event(
    State(state): State<AppState>,
    Json(req): Json<NotifyEventRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let delivered = state
        .plan_service
        .notify_event(req.kind, &req.owner_id, &req.title, &req.body)
        .await;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "delivered": delivered } }),
    ))
}

/// PUT /api/devices/{identity}/token — register or update a device token.
pub async fn register_token(
    State(state): State<AppState>,
    Path(identity): Path<String>,
    Json(req): Json<RegisterTokenRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .devices
        .upsert(&identity, req.token.as_deref(), req.is_advisor, Utc::now())
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Registered" } }),
    ))
}

/// GET /api/owners/{owner_id}/reminders — list active reminders.
pub async fn list_reminders(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let reminders = state.scheduler.list_scheduled(&owner_id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": reminders })))
}

/// GET /api/health — database connectivity check.
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let ok = dietcue_database::connection::health_check(&state.pool).await?;
    Ok(Json(serde_json::json!({ "success": ok })))
}
