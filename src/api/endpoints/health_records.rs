//! Health record endpoints, including offline batch sync.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiJson};
use crate::db;
use crate::models::{HealthRecord, HealthRecordCreate};
use crate::sync::{self, SyncOutcome};

/// `POST /api/health-records`: 409 when the offline id is already stored.
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(input): ApiJson<HealthRecordCreate>,
) -> Result<Json<HealthRecord>, ApiError> {
    let record = HealthRecord::from_create(input);
    ctx.core
        .store
        .with_conn(|conn| db::insert_health_record(conn, &record))
        .map_err(|e| match e {
            db::DatabaseError::ConstraintViolation(_) => ApiError::Conflict(format!(
                "Health record with offline id {} already exists",
                record.offline_id.as_deref().unwrap_or_default()
            )),
            other => other.into(),
        })?;
    Ok(Json(record))
}

/// `GET /api/health-records/:user_id`: newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<HealthRecord>>, ApiError> {
    let records = ctx
        .core
        .store
        .with_conn(|conn| db::list_health_records(conn, &user_id))?;
    Ok(Json(records))
}

/// `POST /api/health-records/sync`: reconcile a batch queued offline.
pub async fn sync(
    State(ctx): State<ApiContext>,
    ApiJson(drafts): ApiJson<Vec<HealthRecordCreate>>,
) -> Result<Json<SyncOutcome>, ApiError> {
    let outcome = sync::sync_health_records(&ctx.core.store, drafts)?;
    Ok(Json(outcome))
}
