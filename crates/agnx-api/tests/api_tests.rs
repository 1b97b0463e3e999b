//! Integration tests for the HTTP API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use agnx_api::catalog::{AgentCatalog, AgentSummary};
use agnx_api::handlers::{ListAgentsResponse, VersionResponse};
use agnx_api::response::{
    JSON_CONTENT_TYPE, PROBLEM_TYPE_METHOD_NOT_ALLOWED, PROBLEM_TYPE_NOT_FOUND,
};
use agnx_api::router::request_timeouts;
use agnx_api::{AppState, TracingErrorLog, build_router};
use agnx_config::{Config, ServerConfig};
use axum::Router;
use axum::body::{Body, Bytes};
use axum::routing::{get, post};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tower::ServiceExt;

fn make_router() -> Router {
    let config = Config::load(None).unwrap();
    let state = Arc::new(AppState::new(Arc::new(TracingErrorLog)));
    build_router(state, &config.server)
}

async fn send(router: Router, method: Method, uri: &str) -> Response {
    router
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
}

// =========================================================================
// Probes
// =========================================================================

#[tokio::test]
async fn test_livez_returns_ok() {
    let response = send(make_router(), Method::GET, "/livez").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");
}

#[tokio::test]
async fn test_readyz_returns_ok() {
    let response = send(make_router(), Method::GET, "/readyz").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");
}

#[tokio::test]
async fn test_probes_are_idempotent() {
    let router = make_router();
    for _ in 0..3 {
        for path in ["/livez", "/readyz"] {
            let response = send(router.clone(), Method::GET, path).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_bytes(response).await, b"ok");
        }
    }
}

// =========================================================================
// Version
// =========================================================================

#[tokio::test]
async fn test_version_reports_build_metadata() {
    let response = send(make_router(), Method::GET, "/version").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), JSON_CONTENT_TYPE);

    let bytes = body_bytes(response).await;
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(!json["version"].as_str().unwrap().is_empty());
    assert!(!json["go"].as_str().unwrap().is_empty());
    assert_eq!(json.as_object().unwrap().len(), 2);

    let version: VersionResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(version.runtime, json["go"]);
}

// =========================================================================
// Agents
// =========================================================================

#[tokio::test]
async fn test_list_agents_is_empty_array() {
    let response = send(make_router(), Method::GET, "/api/v1/agents").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), JSON_CONTENT_TYPE);

    let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json, serde_json::json!({ "agents": [] }));
}

struct FixedCatalog;

impl AgentCatalog for FixedCatalog {
    fn list(&self) -> Vec<AgentSummary> {
        vec![AgentSummary {
            name: String::from("researcher"),
            description: Some(String::from("Finds things out")),
            version: None,
        }]
    }
}

#[tokio::test]
async fn test_list_agents_reads_from_catalog() {
    let config = Config::load(None).unwrap();
    let state = AppState::new(Arc::new(TracingErrorLog)).with_catalog(Arc::new(FixedCatalog));
    let router = build_router(Arc::new(state), &config.server);

    let response = send(router, Method::GET, "/api/v1/agents").await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body_bytes(response).await;
    let list: ListAgentsResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(list.agents.len(), 1);
    assert_eq!(list.agents[0].name, "researcher");

    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(json["agents"][0].get("version").is_none());
}

// =========================================================================
// Fallbacks
// =========================================================================

#[tokio::test]
async fn test_unknown_path_is_not_found_problem() {
    let response = send(make_router(), Method::GET, "/api/v1/unknown").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(content_type(&response), JSON_CONTENT_TYPE);

    let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["type"], PROBLEM_TYPE_NOT_FOUND);
    assert_eq!(json["title"], "Not Found");
    assert_eq!(json["status"], 404);
    assert_eq!(json["instance"], "/api/v1/unknown");
}

#[tokio::test]
async fn test_wrong_method_is_method_not_allowed_problem() {
    let response = send(make_router(), Method::POST, "/livez").await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(content_type(&response), JSON_CONTENT_TYPE);

    let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["type"], PROBLEM_TYPE_METHOD_NOT_ALLOWED);
    assert_eq!(json["status"], 405);
    assert_eq!(json["instance"], "/livez");
}

#[tokio::test]
async fn test_route_matching_is_exact() {
    let response = send(make_router(), Method::GET, "/api/v1/agents/extra").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =========================================================================
// Timeouts
// =========================================================================

fn server_config(read_timeout: u64, write_timeout: u64) -> ServerConfig {
    let mut server = Config::load(None).unwrap().server;
    server.read_timeout = read_timeout;
    server.write_timeout = write_timeout;
    server
}

async fn read_whole_body(body: Body) -> StatusCode {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::BAD_REQUEST,
    }
}

#[tokio::test]
async fn test_slow_handler_gets_request_timeout() {
    let routes = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            "late"
        }),
    );
    let router = request_timeouts(routes, &server_config(30, 1));

    let response = tokio::time::timeout(Duration::from_secs(10), send(router, Method::GET, "/slow"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn test_stalled_request_body_fails_after_read_timeout() {
    let routes = Router::new().route("/upload", post(read_whole_body));
    let router = request_timeouts(routes, &server_config(1, 30));

    let stalled = futures::stream::pending::<Result<Bytes, std::io::Error>>();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .body(Body::from_stream(stalled))
        .unwrap();

    let response = tokio::time::timeout(Duration::from_secs(10), router.oneshot(request))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_complete_body_is_read_within_read_timeout() {
    let routes = Router::new().route("/upload", post(read_whole_body));
    let router = request_timeouts(routes, &server_config(1, 30));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .body(Body::from("payload"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
