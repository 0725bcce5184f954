//! pforte-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod config;
pub mod rest;

use std::sync::Arc;

use anyhow::Result;
use config::ServerConfig;
use pforte_auth::SystemUhr;
use pforte_db::SqliteDb;
use rest::{server::RestServer, PforteState};

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Oeffnet die Datenbank, baut die Auth-Strategie und bedient HTTP
    /// bis zum Shutdown-Signal (Ctrl-C)
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            adresse = %self.config.bind_adresse(),
            auth_typ = %self.config.auth.typ,
            "Server startet"
        );

        let db = SqliteDb::oeffnen(&self.config.datenbank.als_database_config()).await?;

        let state = PforteState::neu(
            &self.config.auth,
            self.config.server.ausgenommene_pfade.clone(),
            Arc::new(db),
            Arc::new(SystemUhr),
        );

        RestServer::neu(
            self.config.bind_adresse().parse()?,
            self.config.server.cors_origins.clone(),
        )
        .starten(state)
        .await?;

        tracing::info!("Server beendet");
        Ok(())
    }
}
