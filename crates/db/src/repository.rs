//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Auth-Logik von der konkreten
//! Datenbank-Implementierung. Benutzer werden ueber Attributnamen
//! gefiltert und geaendert, so wie sie in der `users`-Tabelle heissen.

use std::future::Future;

use crate::error::DbError;
use crate::models::{BenutzerRecord, NeueSession, SessionRecord};

/// Result-Alias fuer das Datenbank-Crate
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://pforte.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://pforte.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer Benutzer-Datenzugriffe (Credential Store)
pub trait UserRepository: Send + Sync {
    /// Legt einen neuen Benutzer an
    ///
    /// Eine bereits vorhandene E-Mail fuehrt zu `DbError::Eindeutigkeit`;
    /// die Pruefung uebernimmt der UNIQUE-Index der Datenbank.
    fn create(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> impl Future<Output = DbResult<BenutzerRecord>> + Send;

    /// Gibt den ersten Benutzer zurueck, auf den alle Filter zutreffen
    ///
    /// - leerer Filter oder unbekanntes Attribut -> `DbError::UngueltigeAbfrage`
    /// - kein Treffer -> `DbError::NichtGefunden`
    fn find_by(
        &self,
        filter: &[(&str, &str)],
    ) -> impl Future<Output = DbResult<BenutzerRecord>> + Send;

    /// Aendert die angegebenen Attribute eines Benutzers in einem Schritt
    ///
    /// `None` setzt die Spalte auf NULL. Unbekannte Attribute fuehren zu
    /// `DbError::UngueltigesFeld`, bevor irgendetwas geschrieben wird.
    fn update(
        &self,
        user_id: &str,
        aenderungen: &[(&str, Option<&str>)],
    ) -> impl Future<Output = DbResult<()>> + Send;
}

/// Repository fuer persistente Sessions
pub trait SessionRepository: Send + Sync {
    /// Speichert eine neue Session
    fn create_session(
        &self,
        data: NeueSession<'_>,
    ) -> impl Future<Output = DbResult<SessionRecord>> + Send;

    /// Laedt eine Session anhand ihrer ID
    fn get_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = DbResult<Option<SessionRecord>>> + Send;

    /// Loescht eine Session; `true` wenn ein Datensatz entfernt wurde
    fn delete_session(&self, session_id: &str) -> impl Future<Output = DbResult<bool>> + Send;
}
