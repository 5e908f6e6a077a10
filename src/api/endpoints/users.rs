//! User endpoints.
//!
//! - `POST /api/users`: register a patient or health worker
//! - `GET /api/users/:id`: fetch one user
//! - `GET /api/users?role=&village=`: list, optionally filtered

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiJson, ApiQuery};
use crate::db;
use crate::models::{User, UserCreate, UserFilter};

pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(input): ApiJson<UserCreate>,
) -> Result<Json<User>, ApiError> {
    if let Some(location) = &input.location {
        if !location.is_valid() {
            return Err(ApiError::BadRequest("Invalid location".into()));
        }
    }

    let user = User::from_create(input);
    ctx.core.store.with_conn(|conn| db::insert_user(conn, &user))?;
    tracing::info!(user_id = %user.id, role = %user.role, "User registered");
    Ok(Json(user))
}

pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    ctx.core
        .store
        .with_conn(|conn| db::get_user(conn, &id))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}

pub async fn list(
    State(ctx): State<ApiContext>,
    ApiQuery(filter): ApiQuery<UserFilter>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = ctx.core.store.with_conn(|conn| db::list_users(conn, &filter))?;
    Ok(Json(users))
}
