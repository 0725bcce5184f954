//! Session-Login und -Logout der API

use axum::{
    extract::{Form, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use pforte_auth::passwort_verifizieren;
use pforte_db::UserRepository;

use crate::rest::{anfrage_aus_headers, fehler_antwort, nicht_gefunden, PforteState};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/v1/auth_session/login
///
/// 400 ohne E-Mail oder Passwort, 404 fuer unbekannte E-Mail, 401 bei
/// falschem Passwort. Bei Erfolg Benutzer als JSON plus Session-Cookie.
pub async fn login(State(state): State<PforteState>, Form(form): Form<LoginForm>) -> Response {
    let Some(email) = form.email.filter(|e| !e.is_empty()) else {
        return fehler_antwort(StatusCode::BAD_REQUEST, "email missing");
    };
    let Some(passwort) = form.password.filter(|p| !p.is_empty()) else {
        return fehler_antwort(StatusCode::BAD_REQUEST, "password missing");
    };

    let benutzer = match state.db.find_by(&[("email", email.as_str())]).await {
        Ok(benutzer) => benutzer,
        Err(e) if e.ist_nicht_gefunden() => {
            return fehler_antwort(StatusCode::NOT_FOUND, "no user found for this email")
        }
        Err(e) => {
            tracing::error!(fehler = %e, "Benutzersuche beim Login fehlgeschlagen");
            return fehler_antwort(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    };

    if !passwort_verifizieren(&passwort, &benutzer.hashed_password).unwrap_or(false) {
        return fehler_antwort(StatusCode::UNAUTHORIZED, "wrong password");
    }

    let Some(session_id) = state.auth.create_session(Some(&benutzer.id)).await else {
        tracing::warn!(user_id = %benutzer.id, "Aktive Auth-Strategie erzeugt keine Sessions");
        return fehler_antwort(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
    };

    let cookie = format!("{}={}; Path=/", state.session_name, session_id);
    ([(header::SET_COOKIE, cookie)], Json(benutzer)).into_response()
}

/// DELETE /api/v1/auth_session/logout
pub async fn logout(State(state): State<PforteState>, headers: HeaderMap) -> Response {
    let anfrage = anfrage_aus_headers("/api/v1/auth_session/logout", &headers);
    if !state.auth.destroy_session(&anfrage).await {
        return nicht_gefunden();
    }
    Json(json!({})).into_response()
}
