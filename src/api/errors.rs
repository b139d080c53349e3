use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Wire shape for every error: `{"error": ..., "code": ...?}`. The `code`
/// is a stable machine-readable tag carried by validation and conflict
/// responses.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    BadRequest(String),
    BadRequestCode(String, &'static str),
    NotFound(String),
    NotFoundCode(String, &'static str),
    Conflict(String, &'static str),
    PayloadTooLarge(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, code) = match self {
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, message.to_string(), None)
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ApiError::BadRequestCode(message, code) => {
                (StatusCode::BAD_REQUEST, message, Some(code))
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            ApiError::NotFoundCode(message, code) => (StatusCode::NOT_FOUND, message, Some(code)),
            ApiError::Conflict(message, code) => (StatusCode::CONFLICT, message, Some(code)),
            ApiError::PayloadTooLarge(message) => (StatusCode::PAYLOAD_TOO_LARGE, message, None),
            ApiError::ServiceUnavailable(message) => {
                tracing::error!(error = %message, "Service unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, message, None)
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, message, None)
            }
        };

        (status, Json(ErrorResponse { error, code })).into_response()
    }
}
