//! SQLite-Implementierung des UserRepository

use uuid::Uuid;

use crate::error::DbError;
use crate::models::{BenutzerFeld, BenutzerRecord};
use crate::repository::{DbResult, UserRepository};
use crate::sqlite::pool::SqliteDb;

const SPALTEN: &str = "id, email, hashed_password, session_id, reset_token";

impl UserRepository for SqliteDb {
    async fn create(&self, email: &str, hashed_password: &str) -> DbResult<BenutzerRecord> {
        let id = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO users (id, email, hashed_password) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(email)
            .bind(hashed_password)
            .execute(&self.pool)
            .await
            .map_err(|e| eindeutigkeit_abbilden(e, format!("E-Mail '{email}' bereits vergeben")))?;

        tracing::debug!(user_id = %id, "Benutzer angelegt");

        Ok(BenutzerRecord {
            id,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            session_id: None,
            reset_token: None,
        })
    }

    async fn find_by(&self, filter: &[(&str, &str)]) -> DbResult<BenutzerRecord> {
        if filter.is_empty() {
            return Err(DbError::UngueltigeAbfrage("Filter ist leer".into()));
        }

        let spalten = spalten_aufloesen(filter.iter().map(|(name, _)| *name))
            .map_err(DbError::UngueltigeAbfrage)?;

        let bedingungen: Vec<String> = spalten.iter().map(|s| format!("{s} = ?")).collect();
        let sql = format!(
            "SELECT {SPALTEN} FROM users WHERE {} ORDER BY rowid LIMIT 1",
            bedingungen.join(" AND ")
        );

        let mut q = sqlx::query(&sql);
        for (_, wert) in filter {
            q = q.bind(*wert);
        }

        match q.fetch_optional(&self.pool).await? {
            Some(row) => row_to_benutzer(&row),
            // Nur Attributnamen ins Fehlerbild, keine Werte
            None => Err(DbError::nicht_gefunden(format!(
                "Kein Benutzer fuer Filter [{}]",
                spalten.join(", ")
            ))),
        }
    }

    async fn update(&self, user_id: &str, aenderungen: &[(&str, Option<&str>)]) -> DbResult<()> {
        let spalten = spalten_aufloesen(aenderungen.iter().map(|(name, _)| *name))
            .map_err(DbError::UngueltigesFeld)?;

        if spalten.is_empty() {
            self.find_by(&[("id", user_id)]).await?;
            return Ok(());
        }

        // Dynamisches UPDATE – nur uebergebene Felder aendern
        let sets: Vec<String> = spalten.iter().map(|s| format!("{s} = ?")).collect();
        let sql = format!("UPDATE users SET {} WHERE id = ?", sets.join(", "));

        let mut q = sqlx::query(&sql);
        for (_, wert) in aenderungen {
            q = q.bind(*wert);
        }
        q = q.bind(user_id);

        let affected = q
            .execute(&self.pool)
            .await
            .map_err(|e| eindeutigkeit_abbilden(e, format!("Update von User {user_id}")))?
            .rows_affected();

        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("User {user_id}")));
        }

        tracing::debug!(user_id = %user_id, felder = %spalten.join(","), "Benutzer aktualisiert");
        Ok(())
    }
}

/// Uebersetzt Attributnamen in Spaltennamen; der erste unbekannte Name bricht ab
fn spalten_aufloesen<'a>(
    namen: impl Iterator<Item = &'a str>,
) -> Result<Vec<&'static str>, String> {
    namen
        .map(|name| name.parse::<BenutzerFeld>().map(|feld| feld.spalte()))
        .collect()
}

fn eindeutigkeit_abbilden(e: sqlx::Error, kontext: String) -> DbError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") || msg.contains("unique") {
        DbError::Eindeutigkeit(kontext)
    } else {
        DbError::Sqlx(e)
    }
}

fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    use sqlx::Row as _;

    Ok(BenutzerRecord {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        hashed_password: row.try_get("hashed_password")?,
        session_id: row.try_get("session_id")?,
        reset_token: row.try_get("reset_token")?,
    })
}
