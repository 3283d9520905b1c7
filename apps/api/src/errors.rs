use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::store::StoreError;

pub const QUOTA_MESSAGE: &str = "API quota exceeded. Please try again later.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream quota exhausted: {0}")]
    UpstreamQuota(String),

    /// `message` is the user-facing copy; `detail` is what went wrong upstream.
    #[error("Upstream error: {detail}")]
    Upstream { message: String, detail: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl AppError {
    /// Maps a generation failure for a document of `kind` ("resume", "cover letter").
    pub fn generation(kind: &str, err: LlmError) -> Self {
        if err.is_quota() {
            AppError::UpstreamQuota(err.to_string())
        } else {
            AppError::Upstream {
                message: format!("Failed to generate {kind}: {err}"),
                detail: err.to_string(),
            }
        }
    }

    pub fn not_found(kind: &str) -> Self {
        AppError::NotFound(format!("{kind} not found"))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UpstreamQuota(detail) => {
                tracing::error!("Upstream quota exhausted: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_QUOTA",
                    QUOTA_MESSAGE.to_string(),
                )
            }
            AppError::Upstream { message, detail } => {
                tracing::error!("Upstream error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    message.clone(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::quota_error;

    #[test]
    fn test_quota_errors_map_to_fixed_message() {
        let err = AppError::generation("cover letter", quota_error());
        assert!(matches!(err, AppError::UpstreamQuota(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_other_upstream_errors_name_the_document_kind() {
        match AppError::generation("resume", LlmError::EmptyResponse) {
            AppError::Upstream { message, .. } => {
                assert_eq!(message, "Failed to generate resume: No text in response");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("Resume").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Storage(StoreError::Database(sqlx::Error::PoolClosed))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
