//! Session-Registry und Session-Lebenszyklus
//!
//! Eine Session ordnet eine zufaellige Session-ID (UUID v4) einer
//! Benutzer-ID zu. Gespeichert wird entweder im Prozess (`InMemorySessions`)
//! oder in der Datenbank (`DbSessions`). Der Ablauf wird nur beim Lesen
//! geprueft; abgelaufene Eintraege bleiben liegen, bis sie explizit
//! geloescht werden.
//!
//! Vertrag aller `SessionBackend`-Implementierungen: Fehler des Speichers
//! werden nie weitergereicht. Lesen liefert dann `None`, Schreiben und
//! Loeschen `false`; der Aufrufer behandelt das wie "keine Session".

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use pforte_db::{NeueSession, SessionRepository};

use crate::uhr::{SystemUhr, Uhr};

/// Gueltigkeitsdauer einer Session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionAblauf {
    /// `None` = Sessions laufen nie ab
    dauer: Option<Duration>,
}

impl SessionAblauf {
    pub fn nie() -> Self {
        Self { dauer: None }
    }

    /// Werte `<= 0` bedeuten "laeuft nie ab", ebenso Werte jenseits des
    /// darstellbaren Bereichs von `Duration`
    pub fn sekunden(sekunden: i64) -> Self {
        if sekunden <= 0 {
            return Self::nie();
        }
        Self {
            dauer: Duration::try_seconds(sekunden),
        }
    }

    /// Abgelaufen erst wenn `erstellt_am + dauer` echt vor `jetzt` liegt
    ///
    /// Liegt das Ende ausserhalb des Kalenders, laeuft die Session nie ab.
    pub fn ist_abgelaufen(&self, erstellt_am: DateTime<Utc>, jetzt: DateTime<Utc>) -> bool {
        match self.dauer {
            None => false,
            Some(dauer) => erstellt_am
                .checked_add_signed(dauer)
                .is_some_and(|ende| ende < jetzt),
        }
    }
}

/// Inhalt einer Session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEintrag {
    pub user_id: String,
    pub erstellt_am: DateTime<Utc>,
}

/// Speicher fuer Session-ID -> Session
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// `false` wenn nicht gespeichert werden konnte
    async fn speichern(&self, session_id: &str, eintrag: SessionEintrag) -> bool;

    async fn laden(&self, session_id: &str) -> Option<SessionEintrag>;

    /// `true` wenn eine Session entfernt wurde
    async fn loeschen(&self, session_id: &str) -> bool;
}

// ---------------------------------------------------------------------------
// In-Memory
// ---------------------------------------------------------------------------

/// Prozesslokale Registry
///
/// Jeder Prozess hat seine eigene Registry; mehrere Worker teilen sich
/// keine Sessions.
#[derive(Debug, Default)]
pub struct InMemorySessions {
    /// session_id -> Eintrag
    sessions: RwLock<HashMap<String, SessionEintrag>>,
}

impl InMemorySessions {
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Anzahl gespeicherter Sessions, abgelaufene eingeschlossen
    pub async fn anzahl(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionBackend for InMemorySessions {
    async fn speichern(&self, session_id: &str, eintrag: SessionEintrag) -> bool {
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), eintrag);
        true
    }

    async fn laden(&self, session_id: &str) -> Option<SessionEintrag> {
        self.sessions.read().await.get(session_id).cloned()
    }

    async fn loeschen(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }
}

// ---------------------------------------------------------------------------
// Datenbank
// ---------------------------------------------------------------------------

/// Persistente Registry ueber ein `SessionRepository`
pub struct DbSessions<R: SessionRepository> {
    repo: Arc<R>,
}

impl<R: SessionRepository> DbSessions<R> {
    pub fn neu(repo: Arc<R>) -> Arc<Self> {
        Arc::new(Self { repo })
    }
}

#[async_trait]
impl<R: SessionRepository + 'static> SessionBackend for DbSessions<R> {
    async fn speichern(&self, session_id: &str, eintrag: SessionEintrag) -> bool {
        let ergebnis = self
            .repo
            .create_session(NeueSession {
                session_id,
                user_id: &eintrag.user_id,
                created_at: eintrag.erstellt_am,
            })
            .await;

        match ergebnis {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(fehler = %e, "Session konnte nicht gespeichert werden");
                false
            }
        }
    }

    async fn laden(&self, session_id: &str) -> Option<SessionEintrag> {
        match self.repo.get_session(session_id).await {
            Ok(record) => record.map(|r| SessionEintrag {
                user_id: r.user_id,
                erstellt_am: r.created_at,
            }),
            Err(e) => {
                tracing::warn!(fehler = %e, "Session-Abfrage fehlgeschlagen");
                None
            }
        }
    }

    async fn loeschen(&self, session_id: &str) -> bool {
        match self.repo.delete_session(session_id).await {
            Ok(entfernt) => entfernt,
            Err(e) => {
                tracing::warn!(fehler = %e, "Session konnte nicht geloescht werden");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Lebenszyklus
// ---------------------------------------------------------------------------

/// Erstellt, prueft und beendet Sessions auf einem `SessionBackend`
#[derive(Clone)]
pub struct SessionVerwaltung {
    backend: Arc<dyn SessionBackend>,
    ablauf: SessionAblauf,
    uhr: Arc<dyn Uhr>,
}

impl SessionVerwaltung {
    pub fn neu(backend: Arc<dyn SessionBackend>, ablauf: SessionAblauf) -> Self {
        Self {
            backend,
            ablauf,
            uhr: Arc::new(SystemUhr),
        }
    }

    /// Ersetzt die Zeitquelle
    pub fn mit_uhr(mut self, uhr: Arc<dyn Uhr>) -> Self {
        self.uhr = uhr;
        self
    }

    /// Legt eine Session fuer `user_id` an und gibt die neue Session-ID zurueck
    ///
    /// Fehlende oder leere Benutzer-ID ergibt `None`, kein Fehler.
    pub async fn erstellen(&self, user_id: Option<&str>) -> Option<String> {
        let user_id = user_id.filter(|id| !id.is_empty())?;

        let session_id = Uuid::new_v4().to_string();
        let eintrag = SessionEintrag {
            user_id: user_id.to_string(),
            erstellt_am: self.uhr.jetzt(),
        };

        if !self.backend.speichern(&session_id, eintrag).await {
            return None;
        }

        tracing::debug!(user_id = %user_id, "Neue Session erstellt");
        Some(session_id)
    }

    /// Benutzer-ID zur Session, `None` bei unbekannter oder abgelaufener Session
    ///
    /// Abgelaufene Sessions werden dabei nicht geloescht.
    pub async fn aufloesen(&self, session_id: Option<&str>) -> Option<String> {
        let session_id = session_id.filter(|id| !id.is_empty())?;
        let eintrag = self.backend.laden(session_id).await?;

        if self.ablauf.ist_abgelaufen(eintrag.erstellt_am, self.uhr.jetzt()) {
            tracing::debug!(user_id = %eintrag.user_id, "Session abgelaufen");
            return None;
        }

        Some(eintrag.user_id)
    }

    /// Entfernt die Session; `false` wenn es nichts zu entfernen gab
    pub async fn beenden(&self, session_id: Option<&str>) -> bool {
        let Some(session_id) = session_id.filter(|id| !id.is_empty()) else {
            return false;
        };

        let entfernt = self.backend.loeschen(session_id).await;
        if entfernt {
            tracing::debug!("Session beendet");
        }
        entfernt
    }
}
