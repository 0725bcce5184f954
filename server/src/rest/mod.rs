//! REST-Interface fuer Pforte
//!
//! Zwei Oberflaechen teilen sich einen Router:
//! - `/api/v1/...` hinter der Auth-Middleware (konfigurierte Strategie)
//! - der Benutzer-Service (`/users`, `/sessions`, `/profile`,
//!   `/reset_password`) mit Sessions am Benutzer-Datensatz

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use pforte_auth::{strategie_erstellen, Anfrage, AuthService, AuthStrategie, Uhr};
use pforte_db::SqliteDb;

use crate::config::AuthEinstellungen;

pub use routes::app;

/// Cookie-Name des Benutzer-Services
pub const BENUTZER_SESSION_COOKIE: &str = "session_id";

/// Axum-State fuer alle Endpunkte
#[derive(Clone)]
pub struct PforteState {
    pub auth: Arc<dyn AuthStrategie>,
    pub benutzer: Arc<AuthService<SqliteDb>>,
    pub db: Arc<SqliteDb>,
    pub ausgenommen: Arc<Vec<String>>,
    /// Cookie-Name der API-Sessions
    pub session_name: String,
}

impl PforteState {
    pub fn neu(
        auth: &AuthEinstellungen,
        ausgenommen: Vec<String>,
        db: Arc<SqliteDb>,
        uhr: Arc<dyn Uhr>,
    ) -> Self {
        let strategie = strategie_erstellen(
            auth.typ,
            Arc::clone(&db),
            &auth.session_einstellungen(),
            uhr,
        );

        Self {
            auth: strategie,
            benutzer: Arc::new(AuthService::neu(Arc::clone(&db))),
            db,
            ausgenommen: Arc::new(ausgenommen),
            session_name: auth.session_name.clone(),
        }
    }
}

/// Baut die `Anfrage`-Sicht aus Pfad und Headern
///
/// Header mit nicht darstellbarem Wert werden uebersprungen.
pub fn anfrage_aus_headers(pfad: &str, headers: &HeaderMap) -> Anfrage {
    headers
        .iter()
        .filter_map(|(name, wert)| Some((name.as_str(), wert.to_str().ok()?)))
        .fold(Anfrage::neu(pfad), |anfrage, (name, wert)| {
            anfrage.mit_header(name, wert)
        })
}

/// JSON-Fehlerantwort `{"error": ...}`
pub fn fehler_antwort(status: StatusCode, meldung: &str) -> Response {
    (status, Json(json!({ "error": meldung }))).into_response()
}

pub fn unauthorized() -> Response {
    fehler_antwort(StatusCode::UNAUTHORIZED, "Unauthorized")
}

pub fn forbidden() -> Response {
    fehler_antwort(StatusCode::FORBIDDEN, "Forbidden")
}

pub fn nicht_gefunden() -> Response {
    fehler_antwort(StatusCode::NOT_FOUND, "Not found")
}
