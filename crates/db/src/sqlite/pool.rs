//! SQLite-Verbindungspool

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::error::DbError;
use crate::repository::DatabaseConfig;

/// Gemeinsamer Zugang zur Benutzer- und Session-Datenbank
///
/// Implementiert `UserRepository` und `SessionRepository`; guenstig zu
/// klonen, alle Klone teilen denselben Pool.
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
}

impl SqliteDb {
    /// Oeffnet (oder erzeugt) die Datenbankdatei und migriert das Schema
    pub async fn oeffnen(config: &DatabaseConfig) -> Result<Self, DbError> {
        let journal = if config.sqlite_wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };
        let optionen = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(journal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_verbindungen.max(1))
            .connect_with(optionen)
            .await?;

        tracing::info!(url = %config.url, wal = config.sqlite_wal, "SQLite-Datenbank geoeffnet");
        Self::migriert(pool).await
    }

    /// Fluechtige Datenbank fuer Tests
    ///
    /// Jede Verbindung haette ihre eigene In-Memory-Datenbank, daher genau
    /// eine Verbindung, die nie geschlossen wird.
    pub async fn in_memory() -> Result<Self, DbError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?;

        Self::migriert(pool).await
    }

    async fn migriert(pool: SqlitePool) -> Result<Self, DbError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!("Schema-Migrationen angewendet");
        Ok(Self { pool })
    }
}
