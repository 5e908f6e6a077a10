//! Medicine booking endpoints.
//!
//! Booking never touches pharmacy stock; the confirmation SMS is queued
//! after the request is stored.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiJson};
use crate::db;
use crate::models::{MedicineRequest, MedicineRequestCreate, MedicineRequestStatusUpdate};
use crate::notify::{Notification, NotificationKind};

pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(input): ApiJson<MedicineRequestCreate>,
) -> Result<Json<MedicineRequest>, ApiError> {
    let request = MedicineRequest::from_create(input);

    ctx.core.store.with_conn(|conn| {
        if db::get_pharmacy(conn, &request.pharmacy_id)?.is_none() {
            return Err(db::DatabaseError::not_found("pharmacy", &request.pharmacy_id));
        }
        db::insert_medicine_request(conn, &request)
    })?;

    ctx.core.notifier.dispatch(Notification::new(
        NotificationKind::BookingConfirmation,
        request.user_phone.clone(),
        request.confirmation_message(),
    ));
    tracing::info!(
        request_id = %request.id,
        pharmacy_id = %request.pharmacy_id,
        "Medicine booking stored"
    );
    Ok(Json(request))
}

/// `GET /api/medicine-requests/:user_id`: newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<MedicineRequest>>, ApiError> {
    let requests = ctx
        .core
        .store
        .with_conn(|conn| db::list_medicine_requests(conn, &user_id))?;
    Ok(Json(requests))
}

/// `PUT /api/medicine-requests/:id/status`
pub async fn update_status(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<MedicineRequestStatusUpdate>,
) -> Result<Json<MedicineRequest>, ApiError> {
    let request = ctx.core.store.with_conn(|conn| {
        db::update_medicine_request_status(conn, &id, update.status, update.pickup_date)
    })?;
    tracing::info!(request_id = %id, status = %request.status, "Medicine request status changed");
    Ok(Json(request))
}
