//! Status- und Fehler-Endpunkte der API

use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::rest;

/// GET /api/v1/status
pub async fn status() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}

/// GET /api/v1/unauthorized – immer 401
pub async fn unauthorized() -> Response {
    rest::unauthorized()
}

/// GET /api/v1/forbidden – immer 403
pub async fn forbidden() -> Response {
    rest::forbidden()
}

pub async fn nicht_gefunden() -> Response {
    rest::nicht_gefunden()
}
