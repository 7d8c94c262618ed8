//! SQLite session storage implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ovenlovin_core::auth::{AuthError, Result, Session, SessionId, SessionRepository};
use sqlx::SqlitePool;
use uuid::Uuid;

/// SQLite-backed session storage.
pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    /// Creates a new SQLite session store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Runs database migrations to create required tables.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Storage(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl SessionRepository for SessionStore {
    async fn create_session(&self, session: &Session) -> Result<()> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(session.id.as_str())
        .bind(session.user_id.to_string())
        .bind(session.created_at.to_rfc3339())
        .bind(session.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, (String, String, String, String)>(
            "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Storage(e.to_string()))?;

        match row {
            Some((id, user_id, created_at, expires_at)) => Ok(Some(Session {
                id: SessionId::new(id),
                user_id: user_id
                    .parse::<Uuid>()
                    .map_err(|e| AuthError::Storage(e.to_string()))?,
                created_at: parse_datetime(&created_at)?,
                expires_at: parse_datetime(&expires_at)?,
            })),
            None => Ok(None),
        }
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        Ok(())
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AuthError::Storage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use ovenlovin_core::auth::generate_session_id;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_store() -> SessionStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SessionStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    fn session_for(user_id: Uuid) -> Session {
        let now = Utc::now();
        Session {
            id: generate_session_id(),
            user_id,
            created_at: now,
            expires_at: now + Duration::days(7),
        }
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let store = test_store().await;
        let session = session_for(Uuid::new_v4());

        store.create_session(&session).await.unwrap();

        let fetched = store.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, session.id);
        assert_eq!(fetched.user_id, session.user_id);
    }

    #[tokio::test]
    async fn get_missing_session_returns_none() {
        let store = test_store().await;
        let missing = generate_session_id();
        assert!(store.get_session(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_session_removes_it() {
        let store = test_store().await;
        let session = session_for(Uuid::new_v4());
        store.create_session(&session).await.unwrap();

        store.delete_session(&session.id).await.unwrap();
        assert!(store.get_session(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_user_sessions_removes_all_for_user() {
        let store = test_store().await;
        let user_id = Uuid::new_v4();
        let first = session_for(user_id);
        let second = session_for(user_id);
        let other = session_for(Uuid::new_v4());

        store.create_session(&first).await.unwrap();
        store.create_session(&second).await.unwrap();
        store.create_session(&other).await.unwrap();

        store.delete_user_sessions(user_id).await.unwrap();

        assert!(store.get_session(&first.id).await.unwrap().is_none());
        assert!(store.get_session(&second.id).await.unwrap().is_none());
        assert!(store.get_session(&other.id).await.unwrap().is_some());
    }
}
