//! Auth-Strategien
//!
//! Eine Strategie entscheidet, ob ein Pfad Authentifizierung braucht, wie
//! aus einer Anfrage ein Credential gelesen wird und welcher Benutzer dazu
//! gehoert. Alle Methoden fallen bei fehlender oder kaputter Eingabe auf
//! `None`/`false` zurueck, damit der HTTP-Layer "keine Anmeldung" einheitlich
//! als anonym behandeln kann.
//!
//! Welche Strategie aktiv ist, wird beim Start ueber `AuthTyp` festgelegt.

use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pforte_db::{BenutzerRecord, SessionRepository, UserRepository};

use crate::anfrage::Anfrage;
use crate::basic_auth::BasicAuth;
use crate::session::{DbSessions, InMemorySessions, SessionAblauf, SessionVerwaltung};
use crate::session_auth::SessionAuth;
use crate::uhr::Uhr;

/// Prueft ob `pfad` Authentifizierung erfordert
///
/// Exakter Vergleich nach Anhaengen eines abschliessenden `/`; es gibt
/// keine Platzhalter. Leerer Pfad oder leere Ausnahmeliste -> `true`.
pub fn requires_auth(pfad: &str, ausgenommen: &[String]) -> bool {
    if pfad.is_empty() || ausgenommen.is_empty() {
        return true;
    }

    let normalisiert = if pfad.ends_with('/') {
        pfad.to_string()
    } else {
        format!("{pfad}/")
    };

    !ausgenommen.iter().any(|p| *p == normalisiert)
}

/// Gemeinsame Schnittstelle aller Auth-Strategien
#[async_trait]
pub trait AuthStrategie: Send + Sync {
    fn requires_auth(&self, pfad: &str, ausgenommen: &[String]) -> bool {
        requires_auth(pfad, ausgenommen)
    }

    /// Wert des `Authorization`-Headers
    fn authorization_header(&self, anfrage: &Anfrage) -> Option<String> {
        anfrage.header("authorization").map(str::to_string)
    }

    /// Wert des Session-Cookies; nur Session-Strategien kennen eines
    fn session_cookie(&self, _anfrage: &Anfrage) -> Option<String> {
        None
    }

    /// Das Credential, mit dem diese Strategie arbeitet
    fn extract_credential(&self, anfrage: &Anfrage) -> Option<String>;

    /// Der angemeldete Benutzer der Anfrage
    async fn resolve_user(&self, anfrage: &Anfrage) -> Option<BenutzerRecord>;

    /// Neue Session fuer `user_id`; Strategien ohne Sessions liefern `None`
    async fn create_session(&self, _user_id: Option<&str>) -> Option<String> {
        None
    }

    /// Beendet die Session der Anfrage; `false` wenn es keine gab
    async fn destroy_session(&self, _anfrage: &Anfrage) -> bool {
        false
    }
}

/// Basis-Strategie: jeder Pfad ausser den Ausnahmen ist geschuetzt, aber
/// niemand kann sich anmelden
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuth;

#[async_trait]
impl AuthStrategie for NullAuth {
    fn extract_credential(&self, _anfrage: &Anfrage) -> Option<String> {
        None
    }

    async fn resolve_user(&self, _anfrage: &Anfrage) -> Option<BenutzerRecord> {
        None
    }
}

// ---------------------------------------------------------------------------
// Auswahl beim Start
// ---------------------------------------------------------------------------

/// Konfigurierbare Strategie-Varianten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthTyp {
    #[default]
    Auth,
    BasicAuth,
    SessionAuth,
    SessionExpAuth,
    SessionDbAuth,
}

impl AuthTyp {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::BasicAuth => "basic_auth",
            Self::SessionAuth => "session_auth",
            Self::SessionExpAuth => "session_exp_auth",
            Self::SessionDbAuth => "session_db_auth",
        }
    }
}

impl fmt::Display for AuthTyp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.als_str())
    }
}

impl FromStr for AuthTyp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth" => Ok(Self::Auth),
            "basic_auth" => Ok(Self::BasicAuth),
            "session_auth" => Ok(Self::SessionAuth),
            "session_exp_auth" => Ok(Self::SessionExpAuth),
            "session_db_auth" => Ok(Self::SessionDbAuth),
            other => Err(format!("Unbekannter Auth-Typ: {other}")),
        }
    }
}

/// Einstellungen der Session-Strategien
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEinstellungen {
    /// Name des Session-Cookies
    pub session_name: String,
    /// Gueltigkeit in Sekunden, `<= 0` = unbegrenzt
    pub session_duration_secs: i64,
}

impl Default for SessionEinstellungen {
    fn default() -> Self {
        Self {
            session_name: "_my_session_id".into(),
            session_duration_secs: 0,
        }
    }
}

/// Baut die konfigurierte Strategie
///
/// `db` dient als Credential Store und, bei `session_db_auth`, als
/// Session-Speicher. `session_auth` ignoriert die Dauer.
pub fn strategie_erstellen<D>(
    typ: AuthTyp,
    db: Arc<D>,
    einstellungen: &SessionEinstellungen,
    uhr: Arc<dyn Uhr>,
) -> Arc<dyn AuthStrategie>
where
    D: UserRepository + SessionRepository + 'static,
{
    let ablauf = SessionAblauf::sekunden(einstellungen.session_duration_secs);
    let name = einstellungen.session_name.clone();

    let strategie: Arc<dyn AuthStrategie> = match typ {
        AuthTyp::Auth => Arc::new(NullAuth),
        AuthTyp::BasicAuth => Arc::new(BasicAuth::neu(db)),
        AuthTyp::SessionAuth => {
            let verwaltung = SessionVerwaltung::neu(InMemorySessions::neu(), SessionAblauf::nie())
                .mit_uhr(uhr);
            Arc::new(SessionAuth::neu(verwaltung, db, name))
        }
        AuthTyp::SessionExpAuth => {
            let verwaltung = SessionVerwaltung::neu(InMemorySessions::neu(), ablauf).mit_uhr(uhr);
            Arc::new(SessionAuth::neu(verwaltung, db, name))
        }
        AuthTyp::SessionDbAuth => {
            let verwaltung =
                SessionVerwaltung::neu(DbSessions::neu(Arc::clone(&db)), ablauf).mit_uhr(uhr);
            Arc::new(SessionAuth::neu(verwaltung, db, name))
        }
    };

    tracing::info!(auth_typ = %typ, "Auth-Strategie gewaehlt");
    strategie
}
