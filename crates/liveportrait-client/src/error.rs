//! Client error types.

use liveportrait_models::DataUriError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Fallback when the proxy's error body carries no message.
pub const GENERATE_FAILED_MESSAGE: &str = "Failed to generate avatar";
/// Fallback when no message is available at all.
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred while generating the avatar";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The proxy answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to fetch example asset {path}: status {status}")]
    Asset { path: String, status: u16 },

    #[error("Invalid result: {0}")]
    InvalidResult(#[from] DataUriError),

    #[error("Credential store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Human-readable message for the error panel.
    pub fn display_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }
}
