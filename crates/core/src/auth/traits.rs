use async_trait::async_trait;
use uuid::Uuid;

use super::{AuthError, Session, SessionId};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Repository for session storage.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persists a new session.
    async fn create_session(&self, session: &Session) -> Result<()>;

    /// Looks up a session by its ID.
    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>>;

    /// Deletes a session by its ID.
    async fn delete_session(&self, id: &SessionId) -> Result<()>;

    /// Deletes all sessions belonging to a user.
    async fn delete_user_sessions(&self, user_id: Uuid) -> Result<()>;
}
