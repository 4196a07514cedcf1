//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes. Malformed request bodies never reach
//! it: axum's `Json` extractor rejects those before the handler runs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use ips_core::CoreError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Resource conflict (409).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Conflict(_) => "CONFLICT",
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = %status, "{}", self);

        let detail = ApiErrorDetail {
            code: self.code().to_string(),
            message: self.message().to_string(),
        };
        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::InvalidUuid { .. } | CoreError::InvalidJoinCode { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            CoreError::RoomNotFound { .. }
            | CoreError::MemberNotFound { .. }
            | CoreError::JoinCodeNotFound { .. } => ApiError::NotFound(err.to_string()),
            CoreError::JoinCodeExhausted { .. } => ApiError::Conflict(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ips_core::RoomId;
    use uuid::Uuid;

    #[test]
    fn core_errors_map_to_status_codes() {
        let cases = [
            (CoreError::InvalidUuid { value: "x".into() }, StatusCode::BAD_REQUEST),
            (CoreError::InvalidJoinCode { value: "1".into() }, StatusCode::BAD_REQUEST),
            (CoreError::RoomNotFound { id: RoomId(Uuid::nil()) }, StatusCode::NOT_FOUND),
            (CoreError::JoinCodeNotFound { code: "000000".into() }, StatusCode::NOT_FOUND),
            (CoreError::JoinCodeExhausted { attempts: 10 }, StatusCode::CONFLICT),
        ];
        for (core, expected) in cases {
            let status = ApiError::from(core).status();
            assert_eq!(status, expected);
            assert!(status.is_client_error());
        }
    }

    #[test]
    fn response_carries_structured_body() {
        let response = ApiError::NotFound("room not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
