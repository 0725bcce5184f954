//! SQLite-Implementierung des SessionRepository

use chrono::Utc;

use crate::error::DbError;
use crate::models::{NeueSession, SessionRecord};
use crate::repository::{DbResult, SessionRepository};
use crate::sqlite::pool::SqliteDb;

impl SessionRepository for SqliteDb {
    async fn create_session(&self, data: NeueSession<'_>) -> DbResult<SessionRecord> {
        sqlx::query("INSERT INTO user_sessions (session_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(data.session_id)
            .bind(data.user_id)
            .bind(data.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("UNIQUE") || msg.contains("unique") {
                    DbError::Eindeutigkeit("Session-ID bereits vergeben".into())
                } else {
                    DbError::Sqlx(e)
                }
            })?;

        Ok(SessionRecord {
            session_id: data.session_id.to_string(),
            user_id: data.user_id.to_string(),
            created_at: data.created_at,
        })
    }

    async fn get_session(&self, session_id: &str) -> DbResult<Option<SessionRecord>> {
        let row = sqlx::query(
            "SELECT session_id, user_id, created_at FROM user_sessions WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_session(&r)).transpose()
    }

    async fn delete_session(&self, session_id: &str) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM user_sessions WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}

fn row_to_session(row: &sqlx::sqlite::SqliteRow) -> DbResult<SessionRecord> {
    use sqlx::Row as _;

    let created_at_str: String = row.try_get("created_at")?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| DbError::intern(format!("Ungueltige created_at '{created_at_str}': {e}")))?
        .with_timezone(&Utc);

    Ok(SessionRecord {
        session_id: row.try_get("session_id")?,
        user_id: row.try_get("user_id")?,
        created_at,
    })
}
