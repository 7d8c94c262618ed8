use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors surfaced by auth handlers and extractors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Core(#[from] ovenlovin_core::auth::AuthError),

    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use ovenlovin_core::auth::AuthError as Core;

        let (status, message) = match &self {
            AuthError::Core(Core::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AuthError::Core(Core::NotAuthenticated)
            | AuthError::Core(Core::SessionNotFound)
            | AuthError::Core(Core::SessionExpired) => (StatusCode::UNAUTHORIZED, self.to_string()),
            AuthError::Core(Core::EmailTaken) => (StatusCode::CONFLICT, self.to_string()),
            AuthError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AuthError::Core(Core::Hashing(_)) | AuthError::Core(Core::Storage(_)) => {
                tracing::error!(error = %self, "Auth internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
            AuthError::Storage(_) => {
                tracing::error!(error = %self, "Auth storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
