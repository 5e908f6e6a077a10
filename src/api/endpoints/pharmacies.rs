//! Pharmacy inventory and availability endpoints.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiJson};
use crate::db;
use crate::models::{MedicineAvailability, Pharmacy, PharmacyUpsert};

/// `POST /api/pharmacies`: insert, or replace the pharmacy with the same id.
///
/// Inventory names are case-insensitive, so two keys that normalize to the
/// same name are a 400.
pub async fn upsert(
    State(ctx): State<ApiContext>,
    ApiJson(input): ApiJson<PharmacyUpsert>,
) -> Result<Json<Pharmacy>, ApiError> {
    if let Some(name) = input.colliding_medicine() {
        return Err(ApiError::BadRequest(format!(
            "Medicine '{name}' is listed more than once"
        )));
    }

    let pharmacy = Pharmacy::from_upsert(input);
    ctx.core
        .store
        .with_conn(|conn| db::upsert_pharmacy(conn, &pharmacy))?;
    tracing::info!(
        pharmacy_id = %pharmacy.id,
        medicines = pharmacy.medicines.len(),
        "Pharmacy inventory updated"
    );
    Ok(Json(pharmacy))
}

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Pharmacy>>, ApiError> {
    Ok(Json(ctx.core.store.with_conn(db::list_pharmacies)?))
}

/// `GET /api/pharmacies/:id/medicines/:name`
pub async fn availability(
    State(ctx): State<ApiContext>,
    Path((pharmacy_id, medicine_name)): Path<(String, String)>,
) -> Result<Json<MedicineAvailability>, ApiError> {
    let pharmacy = ctx
        .core
        .store
        .with_conn(|conn| db::get_pharmacy(conn, &pharmacy_id))?
        .ok_or_else(|| ApiError::NotFound("Pharmacy not found".into()))?;
    Ok(Json(pharmacy.availability(&medicine_name)))
}
