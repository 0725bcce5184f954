//! Benutzer-Service: Registrierung, Login, Profil, Passwort-Reset
//!
//! Formular-Bodies (`application/x-www-form-urlencoded`), Session-Cookie
//! `session_id`. Fehlende oder ungueltige Angaben ergeben 403, ausser beim
//! Login (401) und bei der Registrierung (400).

use axum::{
    extract::{Form, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use pforte_auth::AuthError;
use pforte_db::BenutzerRecord;

use crate::rest::{
    anfrage_aus_headers, fehler_antwort, forbidden, unauthorized, PforteState,
    BENUTZER_SESSION_COOKIE,
};

#[derive(Debug, Deserialize)]
pub struct ZugangsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetAnfrageForm {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct NeuesPasswortForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub reset_token: String,
    #[serde(default)]
    pub new_password: String,
}

/// GET /
pub async fn index() -> impl IntoResponse {
    Json(json!({ "message": "Bienvenue" }))
}

/// POST /users
pub async fn users(State(state): State<PforteState>, Form(form): Form<ZugangsForm>) -> Response {
    if form.email.is_empty() || form.password.is_empty() {
        return fehler_antwort(StatusCode::BAD_REQUEST, "email and password required");
    }

    match state.benutzer.register_user(&form.email, &form.password).await {
        Ok(benutzer) => {
            Json(json!({ "email": benutzer.email, "message": "user created" })).into_response()
        }
        Err(AuthError::BenutzerExistiert(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "email already registered" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(fehler = %e, "Registrierung fehlgeschlagen");
            fehler_antwort(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

/// POST /sessions
pub async fn login(State(state): State<PforteState>, Form(form): Form<ZugangsForm>) -> Response {
    if !state.benutzer.valid_login(&form.email, &form.password).await {
        return unauthorized();
    }

    let Some(session_id) = state.benutzer.create_session(&form.email).await else {
        return unauthorized();
    };

    let cookie = format!("{BENUTZER_SESSION_COOKIE}={session_id}; Path=/");
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "email": form.email, "message": "logged in" })),
    )
        .into_response()
}

/// DELETE /sessions – Abmelden und zurueck zur Startseite
pub async fn logout(State(state): State<PforteState>, headers: HeaderMap) -> Response {
    let Some(benutzer) = benutzer_aus_cookie(&state, &headers).await else {
        return forbidden();
    };

    if let Err(e) = state.benutzer.destroy_session(&benutzer.id).await {
        tracing::warn!(user_id = %benutzer.id, fehler = %e, "Abmeldung fehlgeschlagen");
        return forbidden();
    }

    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

/// GET /profile
pub async fn profile(State(state): State<PforteState>, headers: HeaderMap) -> Response {
    match benutzer_aus_cookie(&state, &headers).await {
        Some(benutzer) => Json(json!({ "email": benutzer.email })).into_response(),
        None => forbidden(),
    }
}

/// POST /reset_password
pub async fn get_reset_password_token(
    State(state): State<PforteState>,
    Form(form): Form<ResetAnfrageForm>,
) -> Response {
    match state.benutzer.get_reset_password_token(&form.email).await {
        Ok(token) => Json(json!({ "email": form.email, "reset_token": token })).into_response(),
        Err(e) => {
            tracing::debug!(fehler = %e, "Kein Reset-Token ausgestellt");
            forbidden()
        }
    }
}

/// PUT /reset_password
pub async fn update_password(
    State(state): State<PforteState>,
    Form(form): Form<NeuesPasswortForm>,
) -> Response {
    if form.new_password.is_empty() {
        return forbidden();
    }

    match state
        .benutzer
        .update_password(&form.email, &form.reset_token, &form.new_password)
        .await
    {
        Ok(()) => {
            Json(json!({ "email": form.email, "message": "Password updated" })).into_response()
        }
        Err(e) => {
            tracing::debug!(fehler = %e, "Passwort nicht geaendert");
            forbidden()
        }
    }
}

async fn benutzer_aus_cookie(state: &PforteState, headers: &HeaderMap) -> Option<BenutzerRecord> {
    let anfrage = anfrage_aus_headers("/", headers);
    state
        .benutzer
        .get_user_from_session_id(anfrage.cookie(BENUTZER_SESSION_COOKIE))
        .await
}
