//! Teleconsultation endpoints.
//!
//! - `POST /api/consultations`: book, allocating a fresh room id
//! - `GET /api/consultations/:user_id`: a patient's consultations
//! - `GET /api/consultations/room/:room_id`: join data for a call
//! - `PUT /api/consultations/:id/status`: progress, diagnosis, prescription

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiJson};
use crate::db;
use crate::models::{Consultation, ConsultationCreate, ConsultationStatusUpdate};
use crate::telemedicine::{self, RoomInfo};

pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(input): ApiJson<ConsultationCreate>,
) -> Result<Json<Consultation>, ApiError> {
    let consultation = telemedicine::book_consultation(&ctx.core.store, input)?;
    tracing::info!(
        consultation_id = %consultation.id,
        room_id = %consultation.room_id,
        "Consultation booked"
    );
    Ok(Json(consultation))
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Consultation>>, ApiError> {
    let consultations = ctx
        .core
        .store
        .with_conn(|conn| db::list_consultations(conn, &user_id))?;
    Ok(Json(consultations))
}

pub async fn room(
    State(ctx): State<ApiContext>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomInfo>, ApiError> {
    Ok(Json(telemedicine::room_info(&ctx.core.store, &room_id)?))
}

pub async fn update_status(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ConsultationStatusUpdate>,
) -> Result<Json<Consultation>, ApiError> {
    let consultation = ctx
        .core
        .store
        .with_conn(|conn| db::update_consultation_status(conn, &id, &update))?;
    tracing::info!(consultation_id = %id, status = %consultation.status, "Consultation updated");
    Ok(Json(consultation))
}
