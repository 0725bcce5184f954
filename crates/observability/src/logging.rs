//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable:
//! - `PF_LOG_LEVEL`: Log-Level bzw. EnvFilter-Direktive, Standard: info
//! - `PF_LOG_FORMAT`: Format (text/json/redacted), Standard: text
//!
//! Im Format `redacted` laufen alle Zeilen durch den `RedactingFormatter`,
//! PII-Felder erscheinen dort nur noch als `***`.

use std::str::FromStr;

use tracing_subscriber::{fmt, EnvFilter};

use crate::redaction::RedactingFormatter;

pub const ENV_LOG_LEVEL: &str = "PF_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "PF_LOG_FORMAT";

/// Ausgabeformat der Log-Zeilen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
    Redacted,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "redacted" => Ok(Self::Redacted),
            andere => Err(format!("Unbekanntes Log-Format: {andere}")),
        }
    }
}

/// Initialisiert das Logging-System.
///
/// `PF_LOG_LEVEL` und `PF_LOG_FORMAT` haben Vorrang vor den uebergebenen
/// Werten aus der Konfiguration. Unbekannte Formate fallen auf `text` zurueck.
pub fn logging_initialisieren(level: &str, format: &str) {
    let filter = EnvFilter::try_from_env(ENV_LOG_LEVEL)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match format_waehlen(std::env::var(ENV_LOG_FORMAT).ok(), format) {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_current_span(true)
                .init();
        }
        LogFormat::Redacted => {
            fmt()
                .with_env_filter(filter)
                .event_format(RedactingFormatter::standard())
                .init();
        }
        LogFormat::Text => {
            fmt().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Umgebung vor Konfiguration; ungueltige Werte werden uebersprungen
pub fn format_waehlen(aus_env: Option<String>, aus_config: &str) -> LogFormat {
    aus_env
        .as_deref()
        .and_then(|f| f.parse().ok())
        .or_else(|| aus_config.parse().ok())
        .unwrap_or_default()
}
