//! Route-Definitionen

use axum::{
    middleware,
    routing::{delete, get, post, MethodRouter},
    Router,
};

use crate::rest::{handlers, middleware::auth_middleware, PforteState};

/// Registriert `pfad` mit und ohne abschliessendes `/`
fn beide_formen(
    router: Router<PforteState>,
    pfad: &str,
    methoden: MethodRouter<PforteState>,
) -> Router<PforteState> {
    router
        .route(pfad, methoden.clone())
        .route(&format!("{pfad}/"), methoden)
}

/// `/api/v1/...`
pub fn api_v1_router() -> Router<PforteState> {
    [
        ("/api/v1/status", get(handlers::index::status)),
        ("/api/v1/unauthorized", get(handlers::index::unauthorized)),
        ("/api/v1/forbidden", get(handlers::index::forbidden)),
        ("/api/v1/users/me", get(handlers::users::me)),
        (
            "/api/v1/auth_session/login",
            post(handlers::session_auth::login),
        ),
        (
            "/api/v1/auth_session/logout",
            delete(handlers::session_auth::logout),
        ),
    ]
    .into_iter()
    .fold(Router::new(), |router, (pfad, methoden)| {
        beide_formen(router, pfad, methoden)
    })
}

/// Benutzer-Service
pub fn benutzer_router() -> Router<PforteState> {
    Router::new()
        .route("/", get(handlers::benutzer_service::index))
        .route("/users", post(handlers::benutzer_service::users))
        .route(
            "/sessions",
            post(handlers::benutzer_service::login).delete(handlers::benutzer_service::logout),
        )
        .route("/profile", get(handlers::benutzer_service::profile))
        .route(
            "/reset_password",
            post(handlers::benutzer_service::get_reset_password_token)
                .put(handlers::benutzer_service::update_password),
        )
}

/// Vollstaendige Anwendung
///
/// Die Auth-Middleware umschliesst auch den Fallback; sie prueft jeden Pfad
/// unter `/api/v1`, ob eine Route existiert oder nicht.
pub fn app(state: PforteState) -> Router {
    Router::new()
        .merge(api_v1_router())
        .merge(benutzer_router())
        .fallback(handlers::index::nicht_gefunden)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
