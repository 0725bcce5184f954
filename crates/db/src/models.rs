//! Datenbankmodelle fuer Pforte
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie dienen als reine Datenuebertragungsobjekte.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz aus der Datenbank
///
/// Passwort-Hash, Session-ID und Reset-Token werden nie serialisiert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    #[serde(skip_serializing, default)]
    pub session_id: Option<String>,
    #[serde(skip_serializing, default)]
    pub reset_token: Option<String>,
}

/// Bekannte Attribute der `users`-Tabelle
///
/// Filter und Updates werden ueber Attributnamen adressiert; nur diese
/// Namen werden akzeptiert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenutzerFeld {
    Id,
    Email,
    HashedPassword,
    SessionId,
    ResetToken,
}

impl BenutzerFeld {
    pub const ALLE: [BenutzerFeld; 5] = [
        Self::Id,
        Self::Email,
        Self::HashedPassword,
        Self::SessionId,
        Self::ResetToken,
    ];

    /// Spaltenname in der Datenbank
    pub fn spalte(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Email => "email",
            Self::HashedPassword => "hashed_password",
            Self::SessionId => "session_id",
            Self::ResetToken => "reset_token",
        }
    }
}

impl FromStr for BenutzerFeld {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALLE
            .into_iter()
            .find(|feld| feld.spalte() == s)
            .ok_or_else(|| format!("Unbekanntes Benutzer-Attribut: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Persistierte Session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Anlegen einer persistenten Session
#[derive(Debug, Clone)]
pub struct NeueSession<'a> {
    pub session_id: &'a str,
    pub user_id: &'a str,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feldnamen_werden_erkannt() {
        for feld in BenutzerFeld::ALLE {
            assert_eq!(feld.spalte().parse::<BenutzerFeld>(), Ok(feld));
        }
    }

    #[test]
    fn unbekanntes_feld_wird_abgelehnt() {
        assert!("password".parse::<BenutzerFeld>().is_err());
        assert!("".parse::<BenutzerFeld>().is_err());
        assert!("EMAIL".parse::<BenutzerFeld>().is_err());
    }

    #[test]
    fn geheime_felder_werden_nicht_serialisiert() {
        let user = BenutzerRecord {
            id: "u1".into(),
            email: "bob@example.com".into(),
            hashed_password: "$argon2id$geheim".into(),
            session_id: Some("sid".into()),
            reset_token: Some("tok".into()),
        };
        let json = serde_json::to_string(&user).expect("Serialisierung fehlgeschlagen");
        assert!(json.contains("bob@example.com"));
        assert!(!json.contains("geheim"));
        assert!(!json.contains("sid"));
        assert!(!json.contains("tok"));
    }
}
