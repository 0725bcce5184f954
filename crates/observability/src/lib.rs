//! # pforte-observability
//!
//! Observability-Crate fuer Pforte:
//! - Structured Logging via tracing-subscriber (text, json, redacted)
//! - Redaktion personenbezogener Felder in Log-Zeilen

pub mod logging;
pub mod redaction;

pub use logging::logging_initialisieren;
pub use redaction::{filter_datum, RedactingFormatter, Redaktor, PII_FIELDS};
