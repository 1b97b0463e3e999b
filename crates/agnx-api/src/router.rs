//! Axum router construction for the HTTP API.
//!
//! Routes match on exact method and path. Anything else falls through to
//! Problem Detail fallbacks rather than the framework's empty defaults.

use std::sync::Arc;
use std::time::Duration;

use agnx_config::ServerConfig;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /livez` -- liveness probe
/// - `GET /readyz` -- readiness probe
/// - `GET /version` -- build metadata
/// - `GET /api/v1/agents` -- agent listing
///
/// Every route is wrapped in [`request_timeouts`].
pub fn build_router(state: Arc<AppState>, server: &ServerConfig) -> Router {
    let routes = Router::new()
        // Health endpoints
        .route("/livez", get(handlers::livez))
        .route("/readyz", get(handlers::readyz))
        .route("/version", get(handlers::version))
        // Agent endpoints
        .route("/api/v1/agents", get(handlers::list_agents))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed);

    request_timeouts(routes, server)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Apply the configured per-request deadlines to `router`.
///
/// `read_timeout` bounds reading the request body; a stalled body makes the
/// handler's read fail. `write_timeout` bounds producing the response and
/// answers `408 Request Timeout` when exceeded.
pub fn request_timeouts<S>(router: Router<S>, server: &ServerConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(RequestBodyTimeoutLayer::new(Duration::from_secs(
            server.read_timeout,
        )))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.write_timeout),
        ))
}
