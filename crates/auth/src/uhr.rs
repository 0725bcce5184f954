//! Zeitquelle fuer den Session-Ablauf

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Liefert die aktuelle Zeit
pub trait Uhr: Send + Sync {
    fn jetzt(&self) -> DateTime<Utc>;
}

/// Systemzeit
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemUhr;

impl Uhr for SystemUhr {
    fn jetzt(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manuell gestellte Uhr (Tests, Simulationen)
#[derive(Debug)]
pub struct FesteUhr {
    millis: AtomicI64,
}

impl FesteUhr {
    pub fn neu(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn stellen(&self, zeit: DateTime<Utc>) {
        self.millis.store(zeit.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn vorstellen(&self, dauer: Duration) {
        self.millis
            .fetch_add(dauer.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Uhr for FesteUhr {
    fn jetzt(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.millis.load(Ordering::SeqCst))
            .single()
            .unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feste_uhr_laesst_sich_stellen() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let uhr = FesteUhr::neu(start);
        assert_eq!(uhr.jetzt(), start);

        uhr.vorstellen(Duration::seconds(90));
        assert_eq!(uhr.jetzt(), start + Duration::seconds(90));

        uhr.stellen(start);
        assert_eq!(uhr.jetzt(), start);
    }
}
