//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist. Einzelne Werte lassen sich ueber Umgebungsvariablen
//! ueberschreiben (`AUTH_TYPE`, `SESSION_NAME`, `SESSION_DURATION`,
//! `API_HOST`, `API_PORT`).

use serde::{Deserialize, Serialize};

use pforte_auth::{AuthTyp, SessionEinstellungen};
use pforte_db::DatabaseConfig;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP-Einstellungen
    pub server: ServerEinstellungen,
    /// Auth-Strategie und Sessions
    pub auth: AuthEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// HTTP-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    pub bind_adresse: String,
    pub port: u16,
    /// Pfade ohne Authentifizierung (mit abschliessendem `/`)
    pub ausgenommene_pfade: Vec<String>,
    /// CORS-Origins (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 5000,
            ausgenommene_pfade: vec![
                "/api/v1/status/".into(),
                "/api/v1/unauthorized/".into(),
                "/api/v1/forbidden/".into(),
                "/api/v1/auth_session/login/".into(),
            ],
            cors_origins: vec![],
        }
    }
}

/// Auth-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthEinstellungen {
    /// Aktive Strategie: auth, basic_auth, session_auth, session_exp_auth, session_db_auth
    pub typ: AuthTyp,
    /// Name des Session-Cookies der API
    pub session_name: String,
    /// Session-Gueltigkeit in Sekunden (`<= 0` = unbegrenzt)
    pub session_duration_secs: i64,
}

impl Default for AuthEinstellungen {
    fn default() -> Self {
        let session = SessionEinstellungen::default();
        Self {
            typ: AuthTyp::default(),
            session_name: session.session_name,
            session_duration_secs: session.session_duration_secs,
        }
    }
}

impl AuthEinstellungen {
    pub fn session_einstellungen(&self) -> SessionEinstellungen {
        SessionEinstellungen {
            session_name: self.session_name.clone(),
            session_duration_secs: self.session_duration_secs,
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// WAL-Journal fuer SQLite
    pub sqlite_wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_verbindungen: db.max_verbindungen,
            sqlite_wal: db.sqlite_wal,
        }
    }
}

impl DatenbankEinstellungen {
    pub fn als_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            max_verbindungen: self.max_verbindungen,
            sqlite_wal: self.sqlite_wal,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "text", "json" oder "redacted"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei und wendet die
    /// Umgebungsvariablen an.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        let mut config = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => toml::from_str::<Self>(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Self::default()
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
                ))
            }
        };

        config.umgebung_anwenden(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Ueberschreibt Werte aus der Umgebung
    ///
    /// Ungueltige Werte werden mit einer Warnung ignoriert; ein nicht
    /// ganzzahliges `SESSION_DURATION` bedeutet unbegrenzte Sessions.
    pub fn umgebung_anwenden<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(typ) = lookup("AUTH_TYPE") {
            match typ.parse::<AuthTyp>() {
                Ok(typ) => self.auth.typ = typ,
                Err(e) => tracing::warn!(fehler = %e, "AUTH_TYPE ignoriert"),
            }
        }

        if let Some(name) = lookup("SESSION_NAME").filter(|n| !n.is_empty()) {
            self.auth.session_name = name;
        }

        if let Some(dauer) = lookup("SESSION_DURATION") {
            self.auth.session_duration_secs = dauer.trim().parse().unwrap_or(0);
        }

        if let Some(host) = lookup("API_HOST").filter(|h| !h.is_empty()) {
            self.server.bind_adresse = host;
        }

        if let Some(port) = lookup("API_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(wert = %port, "API_PORT ignoriert"),
            }
        }
    }

    /// Gibt die vollstaendige Bind-Adresse fuer den HTTP-Server zurueck
    pub fn bind_adresse(&self) -> String {
        format!("{}:{}", self.server.bind_adresse, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn umgebung(paare: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let werte: HashMap<String, String> = paare
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| werte.get(name).cloned()
    }

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.auth.typ, AuthTyp::Auth);
        assert_eq!(cfg.auth.session_name, "_my_session_id");
        assert_eq!(cfg.auth.session_duration_secs, 0);
        assert_eq!(cfg.datenbank.url, "sqlite://pforte.db");
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg
            .server
            .ausgenommene_pfade
            .contains(&"/api/v1/auth_session/login/".to_string()));
    }

    #[test]
    fn bind_adresse() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.bind_adresse(), "0.0.0.0:5000");
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [server]
            port = 8080

            [auth]
            typ = "session_db_auth"
            session_duration_secs = 60
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.auth.typ, AuthTyp::SessionDbAuth);
        assert_eq!(cfg.auth.session_duration_secs, 60);
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.server.bind_adresse, "0.0.0.0");
        assert_eq!(cfg.auth.session_name, "_my_session_id");
        assert_eq!(cfg.server.ausgenommene_pfade.len(), 4);
    }

    #[test]
    fn unbekannter_auth_typ_in_toml() {
        let ergebnis = toml::from_str::<ServerConfig>("[auth]\ntyp = \"oauth\"\n");
        assert!(ergebnis.is_err());
    }

    #[test]
    fn umgebung_ueberschreibt() {
        let mut cfg = ServerConfig::default();
        cfg.umgebung_anwenden(umgebung(&[
            ("AUTH_TYPE", "session_exp_auth"),
            ("SESSION_NAME", "_sid"),
            ("SESSION_DURATION", "120"),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "5001"),
        ]));

        assert_eq!(cfg.auth.typ, AuthTyp::SessionExpAuth);
        assert_eq!(cfg.auth.session_name, "_sid");
        assert_eq!(cfg.auth.session_duration_secs, 120);
        assert_eq!(cfg.bind_adresse(), "127.0.0.1:5001");
    }

    #[test]
    fn ungueltige_umgebungswerte() {
        let mut cfg = ServerConfig::default();
        cfg.auth.session_duration_secs = 300;
        cfg.umgebung_anwenden(umgebung(&[
            ("AUTH_TYPE", "oauth"),
            ("SESSION_DURATION", "bald"),
            ("API_PORT", "99999"),
        ]));

        assert_eq!(cfg.auth.typ, AuthTyp::Auth);
        assert_eq!(cfg.auth.session_duration_secs, 0);
        assert_eq!(cfg.server.port, 5000);
    }

    #[test]
    fn fehlende_datei_ergibt_standardwerte() {
        let cfg = ServerConfig::laden("/gibt/es/nicht/pforte.toml").unwrap();
        assert_eq!(cfg.datenbank.max_verbindungen, 5);
    }
}
