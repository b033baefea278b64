//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use liveportrait_inference::InferenceError;
use liveportrait_models::ErrorBody;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

pub const MISSING_API_KEY_MESSAGE: &str = "HuggingFace API key not configured. \
     Please add HUGGINGFACE_API_KEY to your environment variables.";
pub const MISSING_PARTS_MESSAGE: &str = "Both source image and driving video are required";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body too large";

#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential available to authenticate the outbound call.
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    BadRequest(String),

    /// Body exceeded the configured size limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Non-success answer from the inference service, passed through as-is.
    #[error("HuggingFace API error: {status} - {body}")]
    Upstream { status: u16, body: String },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn missing_api_key() -> Self {
        Self::Configuration(MISSING_API_KEY_MESSAGE.to_string())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn payload_too_large() -> Self {
        Self::PayloadTooLarge(PAYLOAD_TOO_LARGE_MESSAGE.to_string())
    }

    /// Map a multipart read failure. Size limit hits keep their 413.
    pub fn from_multipart(status: StatusCode, body_text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::payload_too_large()
        } else {
            Self::Internal(body_text)
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upstream { status, .. } => upstream_status(*status),
            ApiError::Configuration(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the caller.
    pub fn message(&self) -> String {
        match self {
            ApiError::Internal(msg) if msg.trim().is_empty() => UNEXPECTED_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

/// Error statuses pass through unchanged. Anything else the upstream could
/// report as a failure (an unfollowed redirect, say) cannot carry an error
/// body to the caller and becomes a bad gateway.
fn upstream_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Upstream { status, body } => ApiError::Upstream { status, body },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Generate request failed");
        }

        (status, Json(ErrorBody::new(self.message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::missing_api_key().status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::internal("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::Upstream { status: 503, body: String::new() }.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Upstream { status: 401, body: String::new() }.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Upstream { status: 304, body: String::new() }.status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_multipart_limit_maps_to_413() {
        let err = ApiError::from_multipart(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded".into());
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.message(), PAYLOAD_TOO_LARGE_MESSAGE);

        let err = ApiError::from_multipart(StatusCode::BAD_REQUEST, "malformed".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "malformed");
    }

    #[test]
    fn test_messages() {
        let err = ApiError::from(InferenceError::Upstream {
            status: 503,
            body: "model loading".to_string(),
        });
        assert_eq!(err.message(), "HuggingFace API error: 503 - model loading");

        assert_eq!(ApiError::internal("").message(), UNEXPECTED_ERROR_MESSAGE);
        assert_eq!(ApiError::bad_request(MISSING_PARTS_MESSAGE).message(), MISSING_PARTS_MESSAGE);
        assert!(ApiError::missing_api_key().message().contains("HUGGINGFACE_API_KEY"));
    }

    #[test]
    fn test_invalid_request_maps_to_internal() {
        let err = ApiError::from(InferenceError::InvalidRequest("bad mime".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().contains("bad mime"));
    }
}
