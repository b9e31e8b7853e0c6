use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{"error": ..., "details"?: ...}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A form submission that could not be forwarded. The message and details
    /// are part of the public response contract.
    #[error("{message}")]
    Submission {
        status: StatusCode,
        message: &'static str,
        details: Option<Value>,
    },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn submission(status: StatusCode, message: &'static str) -> Self {
        AppError::Submission {
            status,
            message,
            details: None,
        }
    }
}

/// A body the `Json` extractor refused (bad syntax, wrong content type,
/// missing field) is a client error like any other validation failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Submission {
                status,
                message,
                details,
            } => (status, message.to_string(), details),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "An AI processing error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let body = match details {
            Some(details) => json!({ "error": message, "details": details }),
            None => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_submission_with_details() {
        let response = AppError::Submission {
            status: StatusCode::CONFLICT,
            message: "Failed to create lead",
            details: Some(json!({"message": "duplicate"})),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Failed to create lead", "details": {"message": "duplicate"}})
        );
    }

    #[tokio::test]
    async fn test_internal_does_not_leak() {
        let response = AppError::Internal(anyhow::anyhow!("secret detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(!body.to_string().contains("secret detail"));
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let response = AppError::Validation("requirements cannot be empty".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "requirements cannot be empty"
        );
    }
}
