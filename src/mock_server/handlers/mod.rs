//! HTTP request handlers for the mock server.

pub mod groups;
pub mod model_sets;
pub mod session;
pub mod users;

pub use groups::*;
pub use model_sets::*;
pub use session::*;
pub use users::*;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::state::MockState;

const DOCS_URL: &str = "https://cloud.google.com/looker/docs/r/api/4.0";

/// Looker's error body.
pub(crate) fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "message": message,
            "documentation_url": DOCS_URL,
        })),
    )
        .into_response()
}

pub(crate) fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Not found")
}

/// Looker's 422 body with per-field errors.
pub(crate) fn validation(field: &str, code: &str, message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({
            "message": "Validation Failed",
            "errors": [{"field": field, "code": code, "message": message}],
            "documentation_url": DOCS_URL,
        })),
    )
        .into_response()
}

/// The live token presented in `Authorization`, or a 401 response.
pub(crate) fn authorize(state: &MockState, headers: &HeaderMap) -> Result<String, Response> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v: &HeaderValue| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("token ")))
        .map(str::to_string);

    match token {
        Some(token) if state.session(&token).is_some() => Ok(token),
        _ => Err(error(StatusCode::UNAUTHORIZED, "Requires authentication.")),
    }
}

/// Numeric path IDs; anything else is a miss.
pub(crate) fn parse_id(raw: &str) -> Result<u64, Response> {
    raw.parse().map_err(|_| not_found())
}
