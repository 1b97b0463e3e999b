//! Uniform JSON and RFC 7807 Problem Details responses.
//!
//! Every JSON body leaves through [`write_json`], which sets
//! `Content-Type: application/json; charset=utf-8`. Failures are described
//! by a [`ProblemDetail`] whose `status` always equals the status line.
//!
//! The payload is encoded into a buffer before anything is committed. If
//! encoding fails, the error goes to the [`ErrorLog`] and the client gets
//! a `500` problem instead of a truncated body under a success status.
//!
//! See: <https://datatracker.ietf.org/doc/html/rfc7807>

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::log::ErrorLog;

/// Content type for every JSON response.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Problem type for missing resources.
pub const PROBLEM_TYPE_NOT_FOUND: &str = "https://agnx.dev/problems/not-found";
/// Problem type for malformed requests.
pub const PROBLEM_TYPE_BAD_REQUEST: &str = "https://agnx.dev/problems/bad-request";
/// Problem type for server-side failures.
pub const PROBLEM_TYPE_INTERNAL_ERROR: &str = "https://agnx.dev/problems/internal-error";
/// Problem type for a known path requested with an unsupported method.
pub const PROBLEM_TYPE_METHOD_NOT_ALLOWED: &str = "https://agnx.dev/problems/method-not-allowed";

/// An RFC 7807 Problem Details body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetail {
    /// URI identifying the problem category.
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short human-readable label for the category.
    pub title: String,
    /// HTTP status code; matches the response status line.
    pub status: u16,
    /// Explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// URI identifying this occurrence, usually the request path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetail {
    /// Create a problem with no detail or instance.
    pub fn new(status: StatusCode, problem_type: &str, title: &str) -> Self {
        Self {
            problem_type: problem_type.to_owned(),
            title: title.to_owned(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    /// Attach a detail message. Empty text leaves the field absent.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.detail = (!detail.is_empty()).then_some(detail);
        self
    }

    /// Attach the request-specific instance URI.
    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// The status code as a [`StatusCode`], or `500` if `status` is not a
    /// valid HTTP status.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Encode `payload` as JSON and respond with `status`.
pub fn write_json<T>(log: &dyn ErrorLog, status: StatusCode, payload: &T) -> Response
where
    T: Serialize + ?Sized,
{
    match serde_json::to_vec(payload) {
        Ok(body) => json_response(status, body),
        Err(e) => {
            log.error("encode response", &e);
            let problem = ProblemDetail::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                PROBLEM_TYPE_INTERNAL_ERROR,
                "Internal Server Error",
            )
            .with_detail("failed to encode response body");
            // A ProblemDetail is plain strings and integers; it always encodes.
            let body = serde_json::to_vec(&problem).unwrap_or_default();
            json_response(StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    }
}

/// Respond with a Problem Detail built from the given parts.
pub fn write_error(
    log: &dyn ErrorLog,
    status: StatusCode,
    problem_type: &str,
    title: &str,
    detail: impl Into<String>,
) -> Response {
    let problem = ProblemDetail::new(status, problem_type, title).with_detail(detail);
    write_problem(log, &problem)
}

/// Respond with an already built Problem Detail, using its own status.
///
/// An invalid `status` is answered as `500`, and the body is rewritten to
/// say so.
pub fn write_problem(log: &dyn ErrorLog, problem: &ProblemDetail) -> Response {
    let status = problem.status_code();
    if status.as_u16() == problem.status {
        return write_json(log, status, problem);
    }

    let problem = ProblemDetail {
        status: status.as_u16(),
        ..problem.clone()
    };
    write_json(log, status, &problem)
}

/// `404 Not Found` problem.
pub fn not_found(log: &dyn ErrorLog, detail: impl Into<String>) -> Response {
    write_error(log, StatusCode::NOT_FOUND, PROBLEM_TYPE_NOT_FOUND, "Not Found", detail)
}

/// `400 Bad Request` problem.
pub fn bad_request(log: &dyn ErrorLog, detail: impl Into<String>) -> Response {
    write_error(log, StatusCode::BAD_REQUEST, PROBLEM_TYPE_BAD_REQUEST, "Bad Request", detail)
}

/// `500 Internal Server Error` problem.
pub fn internal_error(log: &dyn ErrorLog, detail: impl Into<String>) -> Response {
    write_error(
        log,
        StatusCode::INTERNAL_SERVER_ERROR,
        PROBLEM_TYPE_INTERNAL_ERROR,
        "Internal Server Error",
        detail,
    )
}

/// `405 Method Not Allowed` problem.
pub fn method_not_allowed(log: &dyn ErrorLog, detail: impl Into<String>) -> Response {
    write_error(
        log,
        StatusCode::METHOD_NOT_ALLOWED,
        PROBLEM_TYPE_METHOD_NOT_ALLOWED,
        "Method Not Allowed",
        detail,
    )
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
        body,
    )
        .into_response()
}
