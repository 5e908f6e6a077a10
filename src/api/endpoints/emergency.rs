//! Emergency alert endpoints.
//!
//! Creating an alert stores it and returns at once. Responder matching and
//! SMS fan-out run on a background task and never change the response.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiJson, ApiQuery};
use crate::db;
use crate::emergency;
use crate::models::{AlertStatus, EmergencyAlert, EmergencyAlertCreate};

/// `POST /api/emergency-alert`
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(input): ApiJson<EmergencyAlertCreate>,
) -> Result<Json<EmergencyAlert>, ApiError> {
    if !input.location.is_valid() {
        return Err(ApiError::BadRequest("Invalid location".into()));
    }

    let alert = EmergencyAlert::from_create(input);
    ctx.core
        .store
        .with_conn(|conn| db::insert_emergency_alert(conn, &alert))?;
    tracing::warn!(
        alert_id = %alert.id,
        alert_type = %alert.alert_type,
        "Emergency alert raised"
    );

    emergency::spawn_fan_out(
        ctx.core.store.clone(),
        ctx.core.notifier.clone(),
        alert.clone(),
        ctx.core.config.emergency.clone(),
    );
    Ok(Json(alert))
}

#[derive(Debug, Deserialize)]
pub struct AlertListQuery {
    #[serde(default = "default_status")]
    pub status: AlertStatus,
}

fn default_status() -> AlertStatus {
    AlertStatus::Active
}

/// `GET /api/emergency-alerts?status=active`: newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<AlertListQuery>,
) -> Result<Json<Vec<EmergencyAlert>>, ApiError> {
    let alerts = ctx
        .core
        .store
        .with_conn(|conn| db::list_emergency_alerts(conn, query.status))?;
    Ok(Json(alerts))
}

#[derive(Debug, Default, Deserialize)]
pub struct RespondParams {
    pub responder_id: Option<String>,
}

/// `PUT /api/emergency-alerts/:id/respond`
///
/// `responder_id` comes from the JSON body or, failing that, the query string.
pub async fn respond(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<RespondParams>,
    body: Option<ApiJson<RespondParams>>,
) -> Result<Json<EmergencyAlert>, ApiError> {
    let responder_id = body
        .and_then(|ApiJson(b)| b.responder_id)
        .or(query.responder_id)
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("responder_id is required".into()))?;
    let responder_id = responder_id.as_str();

    let alert = ctx
        .core
        .store
        .with_conn(|conn| db::append_alert_responder(conn, &id, responder_id))?;
    tracing::info!(alert_id = %id, responder_id, "Emergency alert acknowledged");
    Ok(Json(alert))
}

/// `PUT /api/emergency-alerts/:id/resolve`
pub async fn resolve(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<EmergencyAlert>, ApiError> {
    let alert = ctx
        .core
        .store
        .with_conn(|conn| db::set_emergency_alert_status(conn, &id, AlertStatus::Resolved))?;
    tracing::info!(alert_id = %id, "Emergency alert resolved");
    Ok(Json(alert))
}
