//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use guildkeeper_core::service::ServiceError;
use guildkeeper_types::error::{CommitError, WizardError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Service(ServiceError),
    /// Validation error in the request itself.
    Validation(String),
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::Service(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Service(ServiceError::Wizard(WizardError::SessionExpired)) => (
                StatusCode::GONE,
                "SESSION_EXPIRED",
                "Session expired, please restart the wizard".to_string(),
            ),
            AppError::Service(ServiceError::Wizard(err @ WizardError::InvalidSelection { .. })) => {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INVALID_SELECTION",
                    err.to_string(),
                )
            }
            AppError::Service(ServiceError::Wizard(
                err @ WizardError::SubclassCapExceeded { .. },
            )) => (StatusCode::CONFLICT, "SUBCLASS_CAP", err.to_string()),
            AppError::Service(ServiceError::Wizard(err @ WizardError::UnknownCharacter(_))) => {
                (StatusCode::NOT_FOUND, "CHARACTER_NOT_FOUND", err.to_string())
            }
            AppError::Service(ServiceError::Wizard(err)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
            }
            AppError::Service(ServiceError::Commit(CommitError::StorageFailure(_))) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_FAILURE",
                "Could not save your character, please try again".to_string(),
            ),
            AppError::Service(ServiceError::Commit(err)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMIT_ERROR",
                err.to_string(),
            ),
            AppError::Service(ServiceError::Storage(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_FAILURE",
                "Storage unavailable, please try again".to_string(),
            ),
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
            }
        };

        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        }

        let body = json!({
            "error": { "code": code, "message": message }
        });
        (status, axum::Json(body)).into_response()
    }
}
