//! Anfrage-Abstraktion
//!
//! Die Auth-Strategien sehen von einer HTTP-Anfrage nur Pfad, Header und
//! Cookies. Der HTTP-Layer baut daraus eine `Anfrage`; die Strategien lesen
//! sie ausschliesslich.

use std::collections::HashMap;

/// Lesesicht auf eine eingehende HTTP-Anfrage
#[derive(Debug, Clone, Default)]
pub struct Anfrage {
    pfad: String,
    /// Header-Namen sind kleingeschrieben
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
}

impl Anfrage {
    pub fn neu(pfad: impl Into<String>) -> Self {
        Self {
            pfad: pfad.into(),
            ..Default::default()
        }
    }

    /// Fuegt einen Header hinzu; ein `Cookie`-Header wird zusaetzlich zerlegt
    pub fn mit_header(mut self, name: &str, wert: impl Into<String>) -> Self {
        let name = name.to_ascii_lowercase();
        let wert = wert.into();
        if name == "cookie" {
            self.cookies.extend(cookies_parsen(&wert));
        }
        self.headers.insert(name, wert);
        self
    }

    pub fn mit_cookie(mut self, name: impl Into<String>, wert: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), wert.into());
        self
    }

    pub fn pfad(&self) -> &str {
        &self.pfad
    }

    /// Header-Wert, Gross-/Kleinschreibung des Namens egal
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

/// Zerlegt einen `Cookie`-Header (`a=1; b=2`) in Name/Wert-Paare
pub fn cookies_parsen(header: &str) -> impl Iterator<Item = (String, String)> + '_ {
    header.split(';').filter_map(|teil| {
        let (name, wert) = teil.trim().split_once('=')?;
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), wert.to_string()))
    })
}
