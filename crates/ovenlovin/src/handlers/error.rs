use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ovenlovin_core::storage::{repository_error_to_status_code, RepositoryError};

pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Renders a storage failure as a response, for handlers whose error type
/// has to cover authorization failures too.
pub fn storage_error(err: RepositoryError) -> Response {
    AppError(err.into()).into_response()
}

/// A 404 response for a missing entity, phrased like the storage layer's own
/// not-found errors.
pub fn not_found(entity_type: &'static str, id: impl ToString) -> Response {
    storage_error(RepositoryError::NotFound {
        entity_type,
        id: id.to_string(),
    })
}

/// Error response with a logged message, for request validation failures.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let msg = message.into();
    tracing::warn!(status = %status, message = %msg, "API error");
    (status, msg).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_maps_to_404() {
        let error = AppError(
            RepositoryError::NotFound {
                entity_type: "Recipe",
                id: "r-1".to_string(),
            }
            .into(),
        );
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn repository_conflict_maps_to_409() {
        let error = AppError(
            RepositoryError::AlreadyExists {
                entity_type: "Vendor",
                id: "foodmart".to_string(),
            }
            .into(),
        );
        assert_eq!(error.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_errors_map_to_500() {
        let error = AppError(anyhow::anyhow!("boom"));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
