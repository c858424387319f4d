//! Route handlers.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};

use crate::app::SharedState;
use crate::services::redirect_target::load_current_target;

type ErrorResponse = (StatusCode, Json<Value>);

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> ErrorResponse {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message })),
    )
}

/// GET /
pub async fn root() -> &'static str {
    "OK"
}

/// GET /:short_path
pub async fn redirect(State(state): State<SharedState>) -> Result<Response, ErrorResponse> {
    let target = load_current_target(state.redirect_file()).await.map_err(|e| {
        tracing::warn!("Redirect target unavailable: {e}");
        err_json(500, &e.to_string())
    })?;

    tracing::debug!(%target, "Redirecting");
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, target)
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::empty())
        .map_err(|e| {
            tracing::warn!("Invalid redirect target: {e}");
            err_json(500, "invalid redirect target")
        })
}

pub async fn not_found() -> ErrorResponse {
    err_json(404, "not found")
}
