//! pforte-auth – Authentifizierung fuer die Pforte-API
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id
//! - Anfrage-Abstraktion (Pfad, Header, Cookies)
//! - Session-Registry (in-memory oder persistent) mit optionalem Ablauf
//! - Auth-Strategien (`NullAuth`, `BasicAuth`, `SessionAuth`)
//! - AuthService (Registrierung, Login, Logout, Passwort-Reset)

pub mod anfrage;
pub mod basic_auth;
pub mod error;
pub mod password;
pub mod service;
pub mod session;
pub mod session_auth;
pub mod strategie;
pub mod uhr;

// Bequeme Re-Exporte
pub use anfrage::Anfrage;
pub use basic_auth::BasicAuth;
pub use error::{AuthError, AuthResult};
pub use password::{passwort_hashen, passwort_verifizieren};
pub use service::AuthService;
pub use session::{
    DbSessions, InMemorySessions, SessionAblauf, SessionBackend, SessionEintrag,
    SessionVerwaltung,
};
pub use session_auth::SessionAuth;
pub use strategie::{
    requires_auth, strategie_erstellen, AuthStrategie, AuthTyp, NullAuth, SessionEinstellungen,
};
pub use uhr::{FesteUhr, SystemUhr, Uhr};
