//! Symptom triage endpoints.
//!
//! `POST /api/symptom-check` always answers 200: model failures and store
//! failures are absorbed by the triage pipeline.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiJson};
use crate::db;
use crate::models::{SymptomCheck, SymptomCheckCreate};
use crate::triage;

pub async fn check(
    State(ctx): State<ApiContext>,
    ApiJson(input): ApiJson<SymptomCheckCreate>,
) -> Json<SymptomCheck> {
    let check =
        triage::run_symptom_check(&ctx.core.store, ctx.core.llm(), ctx.core.ai_timeout(), input)
            .await;
    Json(check)
}

/// `GET /api/symptom-checks/:user_id`: newest first.
pub async fn history(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<SymptomCheck>>, ApiError> {
    let checks = ctx
        .core
        .store
        .with_conn(|conn| db::list_symptom_checks(conn, &user_id))?;
    Ok(Json(checks))
}
