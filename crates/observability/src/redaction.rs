//! PII-Redaktion fuer Log-Zeilen
//!
//! Felder der Form `feld=wert;` werden zu `feld=***;`. Feldnamen und
//! Trenner werden woertlich gematcht, der Wert reicht nicht-gierig bis zum
//! naechsten Trenner. Ein Wert ohne nachfolgenden Trenner bleibt stehen.

use std::fmt::{self, Write as _};

use chrono::Utc;
use regex::{NoExpand, Regex};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Felder mit personenbezogenen Daten
pub const PII_FIELDS: [&str; 5] = ["name", "email", "phone", "ssn", "password"];

pub const REDACTION: &str = "***";
pub const SEPARATOR: &str = ";";

const PRAEFIX: &str = "[PFORTE]";

/// Vorkompilierte Redaktion fuer eine feste Feldliste
#[derive(Debug, Clone)]
pub struct Redaktor {
    regeln: Vec<(Regex, String)>,
    redaction: String,
    separator: String,
}

impl Redaktor {
    pub fn neu<S: AsRef<str>>(
        fields: &[S],
        redaction: &str,
        separator: &str,
    ) -> Result<Self, regex::Error> {
        let sep = regex::escape(separator);
        let regeln = fields
            .iter()
            .map(|feld| {
                let feld = feld.as_ref();
                let muster = Regex::new(&format!("{}=.*?{}", regex::escape(feld), sep))?;
                Ok((muster, format!("{feld}={redaction}{separator}")))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            regeln,
            redaction: redaction.to_string(),
            separator: separator.to_string(),
        })
    }

    /// PII-Felder, `***`, `;`
    pub fn standard() -> Self {
        Self::neu(&PII_FIELDS, REDACTION, SEPARATOR).unwrap_or_else(|_| Self {
            regeln: Vec::new(),
            redaction: REDACTION.to_string(),
            separator: SEPARATOR.to_string(),
        })
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Wendet alle Regeln nacheinander auf die Nachricht an
    pub fn anwenden(&self, message: &str) -> String {
        self.regeln
            .iter()
            .fold(message.to_string(), |text, (muster, ersatz)| {
                muster.replace_all(&text, NoExpand(ersatz)).into_owned()
            })
    }
}

/// Ersetzt den Wert jedes Felds bis zum naechsten Trenner durch `redaction`
///
/// Laesst sich ein Muster nicht bauen, wird die ganze Nachricht ersetzt.
pub fn filter_datum<S: AsRef<str>>(
    fields: &[S],
    redaction: &str,
    message: &str,
    separator: &str,
) -> String {
    match Redaktor::neu(fields, redaction, separator) {
        Ok(redaktor) => redaktor.anwenden(message),
        Err(e) => {
            tracing::warn!(fehler = %e, "Redaktionsmuster ungueltig, Nachricht verworfen");
            redaction.to_string()
        }
    }
}

/// Event-Formatter fuer tracing-subscriber
///
/// Zeile: `[PFORTE] <target> <LEVEL> <zeitstempel>: <nachricht>`. Felder des
/// Events werden als `feld=wert;` angehaengt und danach redigiert.
#[derive(Debug, Clone)]
pub struct RedactingFormatter {
    redaktor: Redaktor,
}

impl RedactingFormatter {
    pub fn neu(redaktor: Redaktor) -> Self {
        Self { redaktor }
    }

    pub fn standard() -> Self {
        Self::neu(Redaktor::standard())
    }

    /// Baut die redigierte Nachricht (ohne Praefix)
    pub fn format(&self, message: &str) -> String {
        self.redaktor.anwenden(message)
    }
}

impl<S, N> FormatEvent<S, N> for RedactingFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let mut sammler = FeldSammler::neu(self.redaktor.separator());
        event.record(&mut sammler);

        writeln!(
            writer,
            "{PRAEFIX} {} {} {}: {}",
            meta.target(),
            meta.level(),
            Utc::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            self.format(&sammler.zeile()),
        )
    }
}

/// Sammelt Nachricht und Felder eines Events in `feld=wert<trenner>`-Form
struct FeldSammler<'a> {
    nachricht: String,
    felder: String,
    separator: &'a str,
}

impl<'a> FeldSammler<'a> {
    fn neu(separator: &'a str) -> Self {
        Self {
            nachricht: String::new(),
            felder: String::new(),
            separator,
        }
    }

    fn zeile(&self) -> String {
        match (self.nachricht.is_empty(), self.felder.is_empty()) {
            (_, true) => self.nachricht.clone(),
            (true, false) => self.felder.clone(),
            (false, false) => format!("{} {}", self.nachricht, self.felder),
        }
    }
}

impl Visit for FeldSammler<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.nachricht.push_str(value);
        } else {
            let _ = write!(self.felder, "{}={}{}", field.name(), value, self.separator);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.nachricht, "{value:?}");
        } else {
            let _ = write!(self.felder, "{}={:?}{}", field.name(), value, self.separator);
        }
    }
}
