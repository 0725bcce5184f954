//! Passwort-Hashing mit Argon2id
//!
//! Gespeichert wird der PHC-String (Algorithmus, Parameter, Salt, Hash),
//! sodass die Verifikation ohne weitere Konfiguration auskommt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::AuthError;

/// Argon2id mit den Standardparametern (19 MiB, 2 Iterationen, 1 Thread)
fn argon2_instanz() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// Hasht ein Passwort mit Argon2id und einem zufaelligen Salt
pub fn passwort_hashen(passwort: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    argon2_instanz()
        .hash_password(passwort.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswortHashing(e.to_string()))
}

/// Verifiziert ein Passwort gegen einen gespeicherten PHC-Hash
///
/// Gibt `Ok(false)` bei falschem Passwort, `Err` bei kaputtem Hash.
pub fn passwort_verifizieren(passwort: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::PasswortHashing(format!("Ungueltiges Hash-Format: {e}")))?;

    match argon2_instanz().verify_password(passwort.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::PasswortHashing(e.to_string())),
    }
}

/// Wie `passwort_verifizieren`, aber jeder Fehler zaehlt als "falsch"
pub fn passwort_passt(passwort: &str, hash: &str) -> bool {
    match passwort_verifizieren(passwort, hash) {
        Ok(korrekt) => korrekt,
        Err(e) => {
            tracing::warn!(fehler = %e, "Passwort-Hash nicht pruefbar");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passwort_hashen_und_verifizieren() {
        let passwort = "b4l0u";
        let hash = passwort_hashen(passwort).expect("Hashing fehlgeschlagen");

        assert!(hash.starts_with("$argon2id$"), "Hash muss mit $argon2id$ beginnen");
        assert!(passwort_verifizieren(passwort, &hash).expect("Verifikation fehlgeschlagen"));
    }

    #[test]
    fn falsches_passwort_wird_abgelehnt() {
        let hash = passwort_hashen("richtiges_passwort").expect("Hashing fehlgeschlagen");

        let korrekt =
            passwort_verifizieren("falsches_passwort", &hash).expect("Verifikation fehlgeschlagen");
        assert!(!korrekt, "Falsches Passwort muss abgelehnt werden");
    }

    #[test]
    fn gleiche_passwoerter_unterschiedliche_hashes() {
        let hash1 = passwort_hashen("gleich").unwrap();
        let hash2 = passwort_hashen("gleich").unwrap();
        assert_ne!(hash1, hash2, "Salt muss zufaellig sein");
    }

    #[test]
    fn ungueltiges_hash_format() {
        assert!(passwort_verifizieren("passwort", "kein_gueltiger_hash").is_err());
        assert!(!passwort_passt("passwort", "kein_gueltiger_hash"));
    }
}
