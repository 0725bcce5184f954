//! Session-Authentifizierung ueber ein Cookie
//!
//! Ablauf und Speicher kommen ueber die `SessionVerwaltung` herein; dieselbe
//! Strategie deckt damit Sessions im Speicher, mit Ablauf und in der
//! Datenbank ab.

use std::sync::Arc;

use async_trait::async_trait;

use pforte_db::{BenutzerRecord, UserRepository};

use crate::anfrage::Anfrage;
use crate::session::SessionVerwaltung;
use crate::strategie::AuthStrategie;

/// Strategie ueber Session-Cookie, Session-Registry und Credential Store
pub struct SessionAuth<U: UserRepository> {
    verwaltung: SessionVerwaltung,
    user_repo: Arc<U>,
    session_name: String,
}

impl<U: UserRepository> SessionAuth<U> {
    pub fn neu(verwaltung: SessionVerwaltung, user_repo: Arc<U>, session_name: String) -> Self {
        Self {
            verwaltung,
            user_repo,
            session_name,
        }
    }

    /// Benutzer-ID zur Session-ID (abgelaufen oder unbekannt -> `None`)
    pub async fn user_id_for_session_id(&self, session_id: Option<&str>) -> Option<String> {
        self.verwaltung.aufloesen(session_id).await
    }
}

#[async_trait]
impl<U: UserRepository + 'static> AuthStrategie for SessionAuth<U> {
    fn session_cookie(&self, anfrage: &Anfrage) -> Option<String> {
        anfrage.cookie(&self.session_name).map(str::to_string)
    }

    fn extract_credential(&self, anfrage: &Anfrage) -> Option<String> {
        self.session_cookie(anfrage)
    }

    async fn resolve_user(&self, anfrage: &Anfrage) -> Option<BenutzerRecord> {
        let session_id = self.session_cookie(anfrage);
        let user_id = self.user_id_for_session_id(session_id.as_deref()).await?;

        match self.user_repo.find_by(&[("id", user_id.as_str())]).await {
            Ok(benutzer) => Some(benutzer),
            Err(e) => {
                // Verwaiste Session oder Speicherfehler: anonym
                tracing::debug!(
                    user_id = %user_id,
                    fehler = %e,
                    "Benutzer zur Session nicht ladbar"
                );
                None
            }
        }
    }

    async fn create_session(&self, user_id: Option<&str>) -> Option<String> {
        self.verwaltung.erstellen(user_id).await
    }

    /// Beendet die Session aus dem Cookie
    ///
    /// `false` ohne Cookie, bei unbekannter Session oder Speicherfehler.
    async fn destroy_session(&self, anfrage: &Anfrage) -> bool {
        let Some(session_id) = self.session_cookie(anfrage) else {
            return false;
        };
        self.verwaltung.beenden(Some(&session_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{DbSessions, InMemorySessions, SessionAblauf};
    use crate::uhr::FesteUhr;
    use chrono::{Duration, TimeZone, Utc};
    use pforte_db::{SessionRepository, SqliteDb};

    const COOKIE: &str = "_my_session_id";

    async fn db_mit_benutzer() -> (Arc<SqliteDb>, BenutzerRecord) {
        let db = Arc::new(SqliteDb::in_memory().await.expect("In-Memory DB"));
        let user = db.create("bob@pforte.test", "hash").await.unwrap();
        (db, user)
    }

    fn mit_cookie(session_id: &str) -> Anfrage {
        Anfrage::neu("/api/v1/users/me").mit_header("Cookie", format!("{COOKIE}={session_id}"))
    }

    #[tokio::test]
    async fn login_und_benutzer_aufloesen() {
        let (db, user) = db_mit_benutzer().await;
        let verwaltung = SessionVerwaltung::neu(InMemorySessions::neu(), SessionAblauf::nie());
        let auth = SessionAuth::neu(verwaltung, db, COOKIE.into());

        let sid = auth.create_session(Some(&user.id)).await.expect("Session erwartet");
        let anfrage = mit_cookie(&sid);

        assert_eq!(auth.extract_credential(&anfrage).as_deref(), Some(sid.as_str()));
        let gefunden = auth.resolve_user(&anfrage).await.expect("Benutzer erwartet");
        assert_eq!(gefunden.id, user.id);
    }

    #[tokio::test]
    async fn ohne_cookie_anonym() {
        let (db, _) = db_mit_benutzer().await;
        let verwaltung = SessionVerwaltung::neu(InMemorySessions::neu(), SessionAblauf::nie());
        let auth = SessionAuth::neu(verwaltung, db, COOKIE.into());

        let anfrage = Anfrage::neu("/api/v1/users/me").mit_cookie("anderes", "x");
        assert_eq!(auth.session_cookie(&anfrage), None);
        assert!(auth.resolve_user(&anfrage).await.is_none());
        assert!(!auth.destroy_session(&anfrage).await);
    }

    #[tokio::test]
    async fn logout_beendet_session() {
        let (db, user) = db_mit_benutzer().await;
        let verwaltung = SessionVerwaltung::neu(InMemorySessions::neu(), SessionAblauf::nie());
        let auth = SessionAuth::neu(verwaltung, db, COOKIE.into());

        let sid = auth.create_session(Some(&user.id)).await.unwrap();
        let anfrage = mit_cookie(&sid);

        assert!(auth.destroy_session(&anfrage).await);
        assert!(auth.resolve_user(&anfrage).await.is_none());
        assert!(!auth.destroy_session(&anfrage).await);
    }

    #[tokio::test]
    async fn verwaiste_session_ist_anonym() {
        let (db, _) = db_mit_benutzer().await;
        let verwaltung = SessionVerwaltung::neu(InMemorySessions::neu(), SessionAblauf::nie());
        let auth = SessionAuth::neu(verwaltung, db, COOKIE.into());

        let sid = auth.create_session(Some("gibt-es-nicht")).await.unwrap();
        assert_eq!(
            auth.user_id_for_session_id(Some(&sid)).await.as_deref(),
            Some("gibt-es-nicht")
        );
        assert!(auth.resolve_user(&mit_cookie(&sid)).await.is_none());
    }

    #[tokio::test]
    async fn db_sessions_laufen_ab_ohne_geloescht_zu_werden() {
        let (db, user) = db_mit_benutzer().await;
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let uhr = Arc::new(FesteUhr::neu(start));
        let verwaltung = SessionVerwaltung::neu(
            DbSessions::neu(Arc::clone(&db)),
            SessionAblauf::sekunden(120),
        )
        .mit_uhr(uhr.clone());
        let auth = SessionAuth::neu(verwaltung, Arc::clone(&db), COOKIE.into());

        let sid = auth.create_session(Some(&user.id)).await.unwrap();
        let anfrage = mit_cookie(&sid);

        uhr.stellen(start + Duration::seconds(119));
        assert!(auth.resolve_user(&anfrage).await.is_some());

        uhr.stellen(start + Duration::seconds(121));
        assert!(auth.resolve_user(&anfrage).await.is_none());

        let record = db.get_session(&sid).await.unwrap();
        assert!(record.is_some(), "Abgelaufene Session bleibt in der Datenbank");

        assert!(auth.destroy_session(&anfrage).await);
        assert!(db.get_session(&sid).await.unwrap().is_none());
    }
}
