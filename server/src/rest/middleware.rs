//! Auth-Middleware fuer `/api/v1`
//!
//! Liegt um die gesamte Anwendung, auch um den Fallback. Ablauf je Anfrage:
//! 1. Pfad ausserhalb von `/api/v1` oder ausgenommen -> durchlassen
//! 2. Weder `Authorization`-Header noch Session-Cookie -> 401; das Cookie
//!    mit dem konfigurierten Namen zaehlt bei jeder Strategie
//! 3. Kein Benutzer aufloesbar -> 403
//! 4. Sonst Benutzer als Request-Extension weiterreichen

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::rest::{anfrage_aus_headers, forbidden, unauthorized, PforteState};

const API_PRAEFIX: &str = "/api/v1";

/// Liegt `pfad` unter `/api/v1` (mit oder ohne abschliessendes `/`)?
fn unter_api(pfad: &str) -> bool {
    pfad.strip_prefix(API_PRAEFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub async fn auth_middleware(
    State(state): State<PforteState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let anfrage = anfrage_aus_headers(req.uri().path(), req.headers());

    if !unter_api(anfrage.pfad())
        || !state.auth.requires_auth(anfrage.pfad(), &state.ausgenommen)
    {
        return next.run(req).await;
    }

    if state.auth.authorization_header(&anfrage).is_none()
        && anfrage.cookie(&state.session_name).is_none()
    {
        tracing::debug!(pfad = %anfrage.pfad(), "Anfrage ohne Credential");
        return unauthorized();
    }

    let Some(benutzer) = state.auth.resolve_user(&anfrage).await else {
        tracing::debug!(pfad = %anfrage.pfad(), "Credential ohne gueltigen Benutzer");
        return forbidden();
    };

    req.extensions_mut().insert(benutzer);
    next.run(req).await
}
