//! Liveness and readiness check.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub database: &'static str,
    pub ai: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub services: ServiceStatus,
}

/// `GET /api/health`: always answers; reports `degraded` when the store is down.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let database = match ctx.core.store.ping() {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Health check: store unavailable");
            "unavailable"
        }
    };
    let ai = if ctx.core.llm().is_some() {
        "configured"
    } else {
        "not_configured"
    };

    Json(HealthResponse {
        status: if database == "connected" { "healthy" } else { "degraded" },
        timestamp: crate::models::now().to_rfc3339(),
        version: crate::config::APP_VERSION,
        services: ServiceStatus { database, ai },
    })
}
