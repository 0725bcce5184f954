//! pforte-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern bereit:
//! - `UserRepository`: Benutzer anlegen, per Feld-Filter suchen und aendern
//! - `SessionRepository`: persistente Sessions (Session-ID -> Benutzer-ID)
//!
//! Die einzige Implementierung ist `SqliteDb` (SQLite via sqlx).

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use models::{BenutzerFeld, BenutzerRecord, NeueSession, SessionRecord};
pub use repository::{DatabaseConfig, DbResult, SessionRepository, UserRepository};
pub use sqlite::SqliteDb;
