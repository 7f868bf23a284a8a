use axum::http::StatusCode;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use analysis_core::auth::GateError;

use crate::persistence::StorageError;

#[derive(Clone, Error, Debug, PartialEq)]
pub enum AppError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(Uuid),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Gate(gate_error) => gate_error.status_code(),
            AppError::NotFound(_) | AppError::BookmarkNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidKey(key) => AppError::InvalidInput(key),
            e => AppError::Storage(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        if let Some(app_error) = e.downcast_ref::<AppError>() {
            return app_error.clone();
        }
        AppError::InternalServerError(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        let body = ErrorBody {
            error: true,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_gate_errors_keep_status_and_message() {
        let (status, body) = body_of(GateError::MissingCredentials.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "You must be logged in.");

        let (status, body) = body_of(GateError::NoGroup.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body["message"],
            "Access denied. User is not associated with any group."
        );
    }

    #[tokio::test]
    async fn test_storage_errors_are_500() {
        let error: AppError = StorageError::Json(
            serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        )
        .into();
        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], true);
    }

    #[test]
    fn test_invalid_storage_key_is_bad_request() {
        let error: AppError = StorageError::InvalidKey("../x".into()).into();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
