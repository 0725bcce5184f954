//! Auth-Service fuer Pforte
//!
//! Eigenstaendiger Benutzer-Service: Registrierung, Login, Logout,
//! Profil und Passwort-Reset. Sessions und Reset-Tokens liegen hier direkt
//! am Benutzer-Datensatz (`session_id`, `reset_token`), nicht in der
//! Session-Registry.

use std::sync::Arc;

use uuid::Uuid;

use pforte_db::{BenutzerRecord, UserRepository};

use crate::{
    error::{AuthError, AuthResult},
    password::{passwort_hashen, passwort_passt},
};

/// Auth-Service – zentraler Einstiegspunkt fuer die Benutzer-Endpunkte
pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
}

impl<U: UserRepository> AuthService<U> {
    /// Erstellt einen neuen AuthService
    pub fn neu(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Registriert einen neuen Benutzer
    ///
    /// `AuthError::BenutzerExistiert` wenn die E-Mail schon vergeben ist.
    pub async fn register_user(&self, email: &str, passwort: &str) -> AuthResult<BenutzerRecord> {
        match self.user_repo.find_by(&[("email", email)]).await {
            Ok(_) => return Err(AuthError::BenutzerExistiert(email.to_string())),
            Err(e) if e.ist_nicht_gefunden() => {}
            Err(e) => return Err(e.into()),
        }

        let hash = passwort_hashen(passwort)?;
        let benutzer = self.user_repo.create(email, &hash).await.map_err(|e| {
            // Gleichzeitige Registrierung derselben E-Mail
            if e.ist_eindeutigkeit() {
                AuthError::BenutzerExistiert(email.to_string())
            } else {
                e.into()
            }
        })?;

        tracing::info!(user_id = %benutzer.id, "Neuer Benutzer registriert");
        Ok(benutzer)
    }

    /// Prueft E-Mail und Passwort
    pub async fn valid_login(&self, email: &str, passwort: &str) -> bool {
        match self.benutzer_per_email(email).await {
            Some(benutzer) => {
                let korrekt = passwort_passt(passwort, &benutzer.hashed_password);
                if !korrekt {
                    tracing::warn!(user_id = %benutzer.id, "Fehlgeschlagener Login-Versuch");
                }
                korrekt
            }
            None => false,
        }
    }

    /// Legt eine neue Session-ID am Benutzer ab und gibt sie zurueck
    pub async fn create_session(&self, email: &str) -> Option<String> {
        let benutzer = self.benutzer_per_email(email).await?;
        let session_id = Uuid::new_v4().to_string();

        if let Err(e) = self
            .user_repo
            .update(&benutzer.id, &[("session_id", Some(session_id.as_str()))])
            .await
        {
            tracing::warn!(
                user_id = %benutzer.id,
                fehler = %e,
                "Session konnte nicht gespeichert werden"
            );
            return None;
        }

        tracing::info!(user_id = %benutzer.id, "Benutzer angemeldet");
        Some(session_id)
    }

    /// Benutzer zur Session-ID; fehlende Session-ID ergibt `None`
    pub async fn get_user_from_session_id(
        &self,
        session_id: Option<&str>,
    ) -> Option<BenutzerRecord> {
        let session_id = session_id.filter(|id| !id.is_empty())?;
        self.user_repo
            .find_by(&[("session_id", session_id)])
            .await
            .ok()
    }

    /// Entfernt die Session-ID vom Benutzer
    pub async fn destroy_session(&self, user_id: &str) -> AuthResult<()> {
        self.user_repo
            .update(user_id, &[("session_id", None)])
            .await?;
        tracing::debug!(user_id = %user_id, "Session entfernt (Abmeldung)");
        Ok(())
    }

    /// Erzeugt ein Reset-Token und legt es am Benutzer ab
    pub async fn get_reset_password_token(&self, email: &str) -> AuthResult<String> {
        let benutzer = self
            .benutzer_per_email(email)
            .await
            .ok_or_else(|| AuthError::BenutzerNichtGefunden(email.to_string()))?;

        let token = Uuid::new_v4().to_string();
        self.user_repo
            .update(&benutzer.id, &[("reset_token", Some(token.as_str()))])
            .await?;

        tracing::info!(user_id = %benutzer.id, "Reset-Token erstellt");
        Ok(token)
    }

    /// Setzt das Passwort per Reset-Token neu; das Token ist danach verbraucht
    pub async fn update_password(
        &self,
        email: &str,
        reset_token: &str,
        neues_passwort: &str,
    ) -> AuthResult<()> {
        let benutzer = match self
            .user_repo
            .find_by(&[("email", email), ("reset_token", reset_token)])
            .await
        {
            Ok(benutzer) => benutzer,
            Err(e) if e.ist_nicht_gefunden() => return Err(AuthError::ResetTokenUngueltig),
            Err(e) => return Err(e.into()),
        };

        let hash = passwort_hashen(neues_passwort)?;
        self.user_repo
            .update(
                &benutzer.id,
                &[("hashed_password", Some(hash.as_str())), ("reset_token", None)],
            )
            .await?;

        tracing::info!(user_id = %benutzer.id, "Passwort zurueckgesetzt");
        Ok(())
    }

    async fn benutzer_per_email(&self, email: &str) -> Option<BenutzerRecord> {
        match self.user_repo.find_by(&[("email", email)]).await {
            Ok(benutzer) => Some(benutzer),
            Err(e) if e.ist_nicht_gefunden() => None,
            Err(e) => {
                tracing::warn!(fehler = %e, "Benutzersuche fehlgeschlagen");
                None
            }
        }
    }
}
