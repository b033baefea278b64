//! Inference client error types.

use thiserror::Error;

pub type InferenceResult<T> = Result<T, InferenceError>;

#[derive(Debug, Error)]
pub enum InferenceError {
    /// The inference service answered with a non-success status.
    /// The body is kept verbatim.
    #[error("HuggingFace API error: {status} - {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl InferenceError {
    /// Upstream status code, when the service itself rejected the call.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            InferenceError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened before any response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, InferenceError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_carries_body() {
        let err = InferenceError::Upstream {
            status: 503,
            body: "model loading".to_string(),
        };
        assert_eq!(err.to_string(), "HuggingFace API error: 503 - model loading");
        assert_eq!(err.upstream_status(), Some(503));
        assert!(!err.is_transport());
    }
}
