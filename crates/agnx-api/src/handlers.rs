//! REST API endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/livez` | Liveness probe, always `ok` |
//! | `GET` | `/readyz` | Readiness probe, always `ok` |
//! | `GET` | `/version` | Build and compiler version |
//! | `GET` | `/api/v1/agents` | List known agents |
//!
//! Unmatched requests are answered by [`not_found`] and
//! [`method_not_allowed`] with Problem Detail bodies.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::buildinfo;
use crate::catalog::AgentSummary;
use crate::response::{
    self, PROBLEM_TYPE_METHOD_NOT_ALLOWED, PROBLEM_TYPE_NOT_FOUND, ProblemDetail,
};
use crate::state::AppState;

/// Response body for `GET /version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResponse {
    /// Release version of the server.
    pub version: String,
    /// Compiler version the server was built with. Published under the
    /// `go` key, which existing clients read.
    #[serde(rename = "go")]
    pub runtime: String,
}

/// Response body for `GET /api/v1/agents`.
///
/// `agents` is always present; an empty catalog encodes as `[]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAgentsResponse {
    /// Known agents.
    pub agents: Vec<AgentSummary>,
}

// ---------------------------------------------------------------------------
// Probes
// ---------------------------------------------------------------------------

/// `GET /livez` -- the process is up and serving.
pub async fn livez() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// `GET /readyz` -- ready to take traffic.
///
/// Nothing can be unready yet; dependency checks belong here once the
/// runtime has storage to reach.
pub async fn readyz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// `GET /version`
pub async fn version(State(state): State<Arc<AppState>>) -> Response {
    let body = VersionResponse {
        version: buildinfo::VERSION.to_owned(),
        runtime: buildinfo::rustc_version().to_owned(),
    };
    response::write_json(state.error_log.as_ref(), StatusCode::OK, &body)
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// `GET /api/v1/agents`
pub async fn list_agents(State(state): State<Arc<AppState>>) -> Response {
    let body = ListAgentsResponse {
        agents: state.catalog.list(),
    };
    response::write_json(state.error_log.as_ref(), StatusCode::OK, &body)
}

// ---------------------------------------------------------------------------
// Fallbacks
// ---------------------------------------------------------------------------

/// Fallback for paths with no route.
pub async fn not_found(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let problem = ProblemDetail::new(StatusCode::NOT_FOUND, PROBLEM_TYPE_NOT_FOUND, "Not Found")
        .with_detail(format!("no route for {}", uri.path()))
        .with_instance(uri.path());
    response::write_problem(state.error_log.as_ref(), &problem)
}

/// Fallback for a known path requested with an unsupported method.
pub async fn method_not_allowed(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Response {
    let problem = ProblemDetail::new(
        StatusCode::METHOD_NOT_ALLOWED,
        PROBLEM_TYPE_METHOD_NOT_ALLOWED,
        "Method Not Allowed",
    )
    .with_detail(format!("{method} is not supported for {}", uri.path()))
    .with_instance(uri.path());
    response::write_problem(state.error_log.as_ref(), &problem)
}
