//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS → 2. Response headers → 3. Access log → 4. Auth validator

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config::CorsConfig;
use crate::core_state::CoreState;

/// Build the API router with every endpoint under `/api/`.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);
    build_router(ctx)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);

    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    // Origins were validated when the configuration loaded.
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o.trim()).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

fn build_router(ctx: ApiContext) -> Router {
    let cors = cors_layer(&ctx.core.config.cors);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/users",
            post(endpoints::users::create).get(endpoints::users::list),
        )
        .route("/users/:id", get(endpoints::users::get))
        .route("/health-records", post(endpoints::health_records::create))
        .route("/health-records/sync", post(endpoints::health_records::sync))
        .route("/health-records/:user_id", get(endpoints::health_records::list))
        .route(
            "/pharmacies",
            post(endpoints::pharmacies::upsert).get(endpoints::pharmacies::list),
        )
        .route(
            "/pharmacies/:id/medicines/:name",
            get(endpoints::pharmacies::availability),
        )
        .route("/medicine-requests", post(endpoints::medicine_requests::create))
        .route(
            "/medicine-requests/:user_id",
            get(endpoints::medicine_requests::list),
        )
        .route(
            "/medicine-requests/:id/status",
            put(endpoints::medicine_requests::update_status),
        )
        .route("/symptom-check", post(endpoints::symptoms::check))
        .route("/symptom-checks/:user_id", get(endpoints::symptoms::history))
        .route("/consultations", post(endpoints::consultations::create))
        .route("/consultations/:user_id", get(endpoints::consultations::list))
        .route(
            "/consultations/room/:room_id",
            get(endpoints::consultations::room),
        )
        .route(
            "/consultations/:id/status",
            put(endpoints::consultations::update_status),
        )
        .route("/emergency-alert", post(endpoints::emergency::create))
        .route("/emergency-alerts", get(endpoints::emergency::list))
        .route(
            "/emergency-alerts/:id/respond",
            put(endpoints::emergency::respond),
        )
        .route(
            "/emergency-alerts/:id/resolve",
            put(endpoints::emergency::resolve),
        )
        .route("/asha-visits", post(endpoints::asha_visits::create))
        .route("/asha-visits/:asha_id", get(endpoints::asha_visits::by_worker))
        .route(
            "/asha-visits/patient/:patient_id",
            get(endpoints::asha_visits::by_patient),
        )
        .route("/translate", post(endpoints::translate::translate))
        .route("/languages", get(endpoints::translate::languages))
        .with_state(ctx.clone())
        // Middleware stack (innermost first, outermost last):
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(cors)
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx));

    Router::new().nest("/api", routes)
}
