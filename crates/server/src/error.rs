//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Server errors are captured to
//! Sentry before responding; every error renders as a JSON body with a
//! `message` and, for caller errors, a `detail`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::InputError;

/// Client-facing message for a missing recipe.
pub const RECIPE_NOT_FOUND: &str = "Recipe not found";
/// Client-facing message for a missing shopping item.
pub const SHOPPING_ITEM_NOT_FOUND: &str = "Shopping item not found";

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found; carries the client-facing message.
    #[error("Not found: {0}")]
    NotFound(&'static str),

    /// Request body missing fields, malformed or out of range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl AppError {
    /// Map a repository error, reporting `NotFound` with `message`.
    pub fn not_found_as(message: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |err| match err {
            RepositoryError::NotFound => Self::NotFound(message),
            other => Self::Database(other),
        }
    }

    const fn is_server_error(&self) -> bool {
        match self {
            Self::Database(RepositoryError::Conflict(_)) => false,
            Self::Database(_) | Self::Internal(_) => true,
            Self::NotFound(_) | Self::InvalidInput(_) => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let (status, body) = match self {
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    message,
                    detail: None,
                },
            ),
            Self::InvalidInput(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: "Invalid input",
                    detail: Some(detail),
                },
            ),
            Self::Database(RepositoryError::Conflict(detail)) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    message: "Constraint violation",
                    detail: Some(detail),
                },
            ),
            Self::Database(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    message: "Internal server error",
                    detail: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound(RECIPE_NOT_FOUND);
        assert_eq!(err.to_string(), "Not found: Recipe not found");

        let err = AppError::from(InputError::MissingField("title"));
        assert_eq!(
            err.to_string(),
            "Invalid input: missing required field `title`"
        );
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = render(AppError::NotFound(RECIPE_NOT_FOUND)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"message": "Recipe not found"}));
    }

    #[tokio::test]
    async fn test_invalid_input_body() {
        let (status, body) = render(InputError::Empty.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid input");
        assert_eq!(body["detail"], "body must not be empty");
    }

    #[tokio::test]
    async fn test_conflict_body() {
        let err = AppError::Database(RepositoryError::Conflict(
            "UNIQUE constraint failed: ingredient.recipe_id, ingredient.name".to_owned(),
        ));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Constraint violation");
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let (status, body) = render(AppError::Internal("secret detail".to_owned())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"message": "Internal server error"}));

        let (status, _) = render(AppError::Database(RepositoryError::DataCorruption(
            "bad row".to_owned(),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_as_maps_only_not_found() {
        let mapped = AppError::not_found_as(SHOPPING_ITEM_NOT_FOUND)(RepositoryError::NotFound);
        assert!(matches!(mapped, AppError::NotFound(SHOPPING_ITEM_NOT_FOUND)));

        let mapped = AppError::not_found_as(RECIPE_NOT_FOUND)(RepositoryError::Conflict(
            "dup".to_owned(),
        ));
        assert!(matches!(
            mapped,
            AppError::Database(RepositoryError::Conflict(_))
        ));
    }
}
