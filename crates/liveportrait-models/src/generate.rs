//! Generate endpoint contract.
//!
//! Request: multipart form with `source_image`, `driving_video` and an
//! optional `api_key` field. Response: `{"videoUrl": "data:..."}` on success,
//! `{"error": "..."}` otherwise.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::data_uri::{DataUri, DataUriError};

/// Path of the generate endpoint on the proxy.
pub const GENERATE_PATH: &str = "/api/generate";

/// Multipart field carrying the source portrait.
pub const SOURCE_IMAGE_FIELD: &str = "source_image";
/// Multipart field carrying the driving video.
pub const DRIVING_VIDEO_FIELD: &str = "driving_video";
/// Optional multipart field carrying a caller-supplied credential.
pub const API_KEY_FIELD: &str = "api_key";

/// File name the client uploads the portrait under.
pub const SOURCE_IMAGE_UPLOAD_NAME: &str = "portrait.jpg";
/// File name the client uploads the driving video under.
pub const DRIVING_VIDEO_UPLOAD_NAME: &str = "driving.mp4";
/// Suggested file name when saving a result.
pub const DOWNLOAD_FILE_NAME: &str = "talking-avatar.mp4";

/// MIME type stamped on every generation result.
pub const RESULT_VIDEO_MIME: &str = "video/mp4";

/// Successful generate response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerateResponse {
    /// Base64 data URI of the generated video
    #[serde(rename = "videoUrl")]
    pub video_url: String,
}

/// Error response of the generate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// A generated video as held by the client.
///
/// Results have no identity; each generation produces a new, unrelated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub video_url: String,
}

impl GenerationResult {
    pub fn new(video_url: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
        }
    }

    /// Decode the embedded video bytes.
    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        DataUri::parse(&self.video_url).map(|uri| uri.data)
    }

    /// Declared MIME type, if the reference is a data URI.
    pub fn mime(&self) -> Option<&str> {
        let rest = self.video_url.strip_prefix("data:")?;
        let (header, _) = rest.split_once(',')?;
        Some(header.split(';').next().unwrap_or(header))
    }
}

impl From<GenerateResponse> for GenerationResult {
    fn from(response: GenerateResponse) -> Self {
        Self::new(response.video_url)
    }
}
