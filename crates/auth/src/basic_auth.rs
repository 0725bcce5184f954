//! Basic-Authentifizierung
//!
//! `Authorization: Basic base64(email:passwort)`. Jeder Schritt der Kette
//! liefert `None`, sobald die Eingabe nicht passt.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use pforte_db::{BenutzerRecord, UserRepository};

use crate::anfrage::Anfrage;
use crate::password::passwort_passt;
use crate::strategie::AuthStrategie;

/// Strategie ueber Basic-Auth-Header und Credential Store
pub struct BasicAuth<U: UserRepository> {
    user_repo: Arc<U>,
}

impl<U: UserRepository> BasicAuth<U> {
    pub fn neu(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Sucht den Benutzer per E-Mail und prueft das Passwort
    pub async fn user_object_from_credentials(
        &self,
        email: &str,
        passwort: &str,
    ) -> Option<BenutzerRecord> {
        let benutzer = match self.user_repo.find_by(&[("email", email)]).await {
            Ok(benutzer) => benutzer,
            Err(e) if e.ist_nicht_gefunden() => return None,
            Err(e) => {
                tracing::warn!(fehler = %e, "Benutzersuche fuer Basic-Auth fehlgeschlagen");
                return None;
            }
        };

        if !passwort_passt(passwort, &benutzer.hashed_password) {
            tracing::debug!(user_id = %benutzer.id, "Basic-Auth: falsches Passwort");
            return None;
        }

        Some(benutzer)
    }
}

/// Der Teil nach `"Basic "`
pub fn extract_base64_authorization_header(header: Option<&str>) -> Option<&str> {
    header?.strip_prefix("Basic ")
}

/// Base64 nach UTF-8; ungueltiges Base64 oder UTF-8 ergibt `None`
pub fn decode_base64_authorization_header(kodiert: &str) -> Option<String> {
    let bytes = STANDARD.decode(kodiert).ok()?;
    String::from_utf8(bytes).ok()
}

/// Trennt `email:passwort` am ersten `:`; das Passwort darf `:` enthalten
pub fn extract_user_credentials(dekodiert: &str) -> Option<(&str, &str)> {
    dekodiert.split_once(':')
}

#[async_trait]
impl<U: UserRepository + 'static> AuthStrategie for BasicAuth<U> {
    fn extract_credential(&self, anfrage: &Anfrage) -> Option<String> {
        self.authorization_header(anfrage)
    }

    async fn resolve_user(&self, anfrage: &Anfrage) -> Option<BenutzerRecord> {
        let header = self.extract_credential(anfrage);
        let kodiert = extract_base64_authorization_header(header.as_deref())?;
        let dekodiert = decode_base64_authorization_header(kodiert)?;
        let (email, passwort) = extract_user_credentials(&dekodiert)?;
        self.user_object_from_credentials(email, passwort).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::passwort_hashen;
    use pforte_db::SqliteDb;

    async fn auth_mit_benutzer() -> (BasicAuth<SqliteDb>, BenutzerRecord) {
        let db = Arc::new(SqliteDb::in_memory().await.expect("In-Memory DB"));
        let hash = passwort_hashen("pwd:mit:doppelpunkt").unwrap();
        let user = db.create("bob@pforte.test", &hash).await.unwrap();
        (BasicAuth::neu(db), user)
    }

    fn basic(roh: &str) -> String {
        format!("Basic {}", STANDARD.encode(roh))
    }

    #[test]
    fn basic_praefix_wird_entfernt() {
        assert_eq!(extract_base64_authorization_header(Some("Basic Ym9i")), Some("Ym9i"));
        assert_eq!(extract_base64_authorization_header(Some("Bearer Ym9i")), None);
        assert_eq!(extract_base64_authorization_header(Some("Basic")), None);
        assert_eq!(extract_base64_authorization_header(None), None);
    }

    #[test]
    fn base64_dekodieren() {
        assert_eq!(
            decode_base64_authorization_header("UGZvcnRl").as_deref(),
            Some("Pforte")
        );
        assert_eq!(decode_base64_authorization_header("kein base64!"), None);
        // gueltiges Base64, aber kein UTF-8
        assert_eq!(decode_base64_authorization_header("//79"), None);
    }

    #[test]
    fn credentials_am_ersten_doppelpunkt() {
        assert_eq!(extract_user_credentials("a@b.io:pw"), Some(("a@b.io", "pw")));
        assert_eq!(extract_user_credentials("a@b.io:p:w"), Some(("a@b.io", "p:w")));
        assert_eq!(extract_user_credentials("ohne_doppelpunkt"), None);
    }

    #[tokio::test]
    async fn gueltige_anmeldedaten() {
        let (auth, user) = auth_mit_benutzer().await;
        let anfrage = Anfrage::neu("/api/v1/users/me")
            .mit_header("Authorization", basic("bob@pforte.test:pwd:mit:doppelpunkt"));

        let gefunden = auth.resolve_user(&anfrage).await.expect("Benutzer erwartet");
        assert_eq!(gefunden.id, user.id);
    }

    #[tokio::test]
    async fn falsches_passwort_oder_unbekannte_email() {
        let (auth, _) = auth_mit_benutzer().await;

        let falsch = Anfrage::neu("/").mit_header("Authorization", basic("bob@pforte.test:falsch"));
        assert!(auth.resolve_user(&falsch).await.is_none());

        let unbekannt = Anfrage::neu("/").mit_header("Authorization", basic("eve@pforte.test:x"));
        assert!(auth.resolve_user(&unbekannt).await.is_none());

        let ohne_header = Anfrage::neu("/");
        assert!(auth.resolve_user(&ohne_header).await.is_none());
    }
}
