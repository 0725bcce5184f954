//! Router-Tests fuer den Benutzer-Service (Registrierung bis Passwort-Reset)

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use pforte_auth::SystemUhr;
use pforte_db::SqliteDb;
use pforte_server::{
    config::{AuthEinstellungen, ServerEinstellungen},
    rest::{app, PforteState},
};

const EMAIL: &str = "guillaume@pforte.test";
const PASSWD: &str = "b4l0u";
const NEW_PASSWD: &str = "t4rt1fl3tt3";

struct Antwort {
    status: StatusCode,
    json: Value,
    session_cookie: Option<String>,
    location: Option<String>,
}

async fn test_app() -> Router {
    let db = Arc::new(SqliteDb::in_memory().await.expect("In-Memory DB"));
    let state = PforteState::neu(
        &AuthEinstellungen::default(),
        ServerEinstellungen::default().ausgenommene_pfade,
        db,
        Arc::new(SystemUhr),
    );
    app(state)
}

async fn anfrage(
    app: &Router,
    methode: Method,
    pfad: &str,
    formular: Option<String>,
    cookie: Option<&str>,
) -> Antwort {
    let mut builder = Request::builder().method(methode).uri(pfad);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, format!("session_id={cookie}"));
    }
    let body = match formular {
        Some(formular) => {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(formular)
        }
        None => Body::empty(),
    };

    let antwort = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = antwort.status();
    let kopf = |name: header::HeaderName| {
        antwort
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let session_cookie = kopf(header::SET_COOKIE).and_then(|c| {
        c.split(';')
            .next()
            .and_then(|paar| paar.strip_prefix("session_id="))
            .map(str::to_string)
    });
    let location = kopf(header::LOCATION);
    let bytes = axum::body::to_bytes(antwort.into_body(), usize::MAX)
        .await
        .unwrap();

    Antwort {
        status,
        json: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        session_cookie,
        location,
    }
}

fn zugang(email: &str, passwort: &str) -> Option<String> {
    Some(format!(
        "email={}&password={}",
        email.replace('@', "%40"),
        passwort
    ))
}

#[tokio::test]
async fn startseite() {
    let app = test_app().await;
    let antwort = anfrage(&app, Method::GET, "/", None, None).await;
    assert_eq!(antwort.status, StatusCode::OK);
    assert_eq!(antwort.json, json!({ "message": "Bienvenue" }));
}

#[tokio::test]
async fn registrierung() {
    let app = test_app().await;

    let antwort = anfrage(&app, Method::POST, "/users", zugang(EMAIL, PASSWD), None).await;
    assert_eq!(antwort.status, StatusCode::OK);
    assert_eq!(antwort.json, json!({ "email": EMAIL, "message": "user created" }));

    let antwort = anfrage(&app, Method::POST, "/users", zugang(EMAIL, PASSWD), None).await;
    assert_eq!(antwort.status, StatusCode::BAD_REQUEST);
    assert_eq!(antwort.json, json!({ "message": "email already registered" }));
}

#[tokio::test]
async fn registrieren_anmelden_zuruecksetzen() {
    let app = test_app().await;

    let antwort = anfrage(&app, Method::POST, "/users", zugang(EMAIL, PASSWD), None).await;
    assert_eq!(antwort.status, StatusCode::OK);

    // falsches Passwort
    let antwort = anfrage(&app, Method::POST, "/sessions", zugang(EMAIL, NEW_PASSWD), None).await;
    assert_eq!(antwort.status, StatusCode::UNAUTHORIZED);

    // Profil ohne Session
    let antwort = anfrage(&app, Method::GET, "/profile", None, None).await;
    assert_eq!(antwort.status, StatusCode::FORBIDDEN);

    // Login
    let antwort = anfrage(&app, Method::POST, "/sessions", zugang(EMAIL, PASSWD), None).await;
    assert_eq!(antwort.status, StatusCode::OK);
    assert_eq!(antwort.json, json!({ "email": EMAIL, "message": "logged in" }));
    let session_id = antwort.session_cookie.expect("session_id-Cookie erwartet");

    let antwort = anfrage(&app, Method::GET, "/profile", None, Some(&session_id)).await;
    assert_eq!(antwort.status, StatusCode::OK);
    assert_eq!(antwort.json, json!({ "email": EMAIL }));

    // Logout leitet auf / um
    let antwort = anfrage(&app, Method::DELETE, "/sessions", None, Some(&session_id)).await;
    assert_eq!(antwort.status, StatusCode::FOUND);
    assert_eq!(antwort.location.as_deref(), Some("/"));

    let antwort = anfrage(&app, Method::GET, "/profile", None, Some(&session_id)).await;
    assert_eq!(antwort.status, StatusCode::FORBIDDEN);
    let antwort = anfrage(&app, Method::DELETE, "/sessions", None, Some(&session_id)).await;
    assert_eq!(antwort.status, StatusCode::FORBIDDEN);

    // Passwort-Reset
    let formular = Some(format!("email={}", EMAIL.replace('@', "%40")));
    let antwort = anfrage(&app, Method::POST, "/reset_password", formular, None).await;
    assert_eq!(antwort.status, StatusCode::OK);
    assert_eq!(antwort.json["email"], EMAIL);
    let token = antwort.json["reset_token"]
        .as_str()
        .expect("reset_token erwartet")
        .to_string();

    let formular = Some(format!(
        "email={}&reset_token={token}&new_password={NEW_PASSWD}",
        EMAIL.replace('@', "%40")
    ));
    let antwort = anfrage(&app, Method::PUT, "/reset_password", formular, None).await;
    assert_eq!(antwort.status, StatusCode::OK);
    assert_eq!(antwort.json, json!({ "email": EMAIL, "message": "Password updated" }));

    // Login mit neuem Passwort
    let antwort = anfrage(&app, Method::POST, "/sessions", zugang(EMAIL, NEW_PASSWD), None).await;
    assert_eq!(antwort.status, StatusCode::OK);
    assert!(antwort.session_cookie.is_some());
}

#[tokio::test]
async fn reset_fuer_unbekannte_email_und_falsches_token() {
    let app = test_app().await;
    anfrage(&app, Method::POST, "/users", zugang(EMAIL, PASSWD), None).await;

    let formular = Some("email=niemand%40pforte.test".to_string());
    let antwort = anfrage(&app, Method::POST, "/reset_password", formular, None).await;
    assert_eq!(antwort.status, StatusCode::FORBIDDEN);

    let formular = Some(format!(
        "email={}&reset_token=falsch&new_password={NEW_PASSWD}",
        EMAIL.replace('@', "%40")
    ));
    let antwort = anfrage(&app, Method::PUT, "/reset_password", formular, None).await;
    assert_eq!(antwort.status, StatusCode::FORBIDDEN);

    // altes Passwort gilt weiter
    let antwort = anfrage(&app, Method::POST, "/sessions", zugang(EMAIL, PASSWD), None).await;
    assert_eq!(antwort.status, StatusCode::OK);
}
