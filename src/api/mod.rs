//! HTTP API.
//!
//! Routes are nested under `/api/`. Read routes are open; mutating routes
//! pass the bearer token check when authentication is enabled.
//!
//! The router is composable. `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ServerError, ServerSession};
pub use types::ApiContext;
