//! ASHA home-visit endpoints.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiJson};
use crate::db;
use crate::models::{AshaVisit, AshaVisitCreate};

pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(input): ApiJson<AshaVisitCreate>,
) -> Result<Json<AshaVisit>, ApiError> {
    let visit = AshaVisit::from_create(input);
    ctx.core
        .store
        .with_conn(|conn| db::insert_asha_visit(conn, &visit))?;
    Ok(Json(visit))
}

/// `GET /api/asha-visits/:asha_id`
pub async fn by_worker(
    State(ctx): State<ApiContext>,
    Path(asha_id): Path<String>,
) -> Result<Json<Vec<AshaVisit>>, ApiError> {
    let visits = ctx
        .core
        .store
        .with_conn(|conn| db::list_visits_by_asha(conn, &asha_id))?;
    Ok(Json(visits))
}

/// `GET /api/asha-visits/patient/:patient_id`
pub async fn by_patient(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<AshaVisit>>, ApiError> {
    let visits = ctx
        .core
        .store
        .with_conn(|conn| db::list_visits_by_patient(conn, &patient_id))?;
    Ok(Json(visits))
}
