//! Benutzer-Endpunkte der API

use axum::{
    extract::Extension,
    response::{IntoResponse, Json, Response},
};

use pforte_db::BenutzerRecord;

use crate::rest::nicht_gefunden;

/// GET /api/v1/users/me – der von der Middleware aufgeloeste Benutzer
pub async fn me(benutzer: Option<Extension<BenutzerRecord>>) -> Response {
    match benutzer {
        Some(Extension(benutzer)) => Json(benutzer).into_response(),
        None => nicht_gefunden(),
    }
}
