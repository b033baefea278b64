//! Shared data models for the LivePortrait proxy.
//!
//! This crate provides the types exchanged between the client uploader,
//! the proxy endpoint and the external inference service:
//! - In-memory media payloads for the source image and driving video
//! - The bearer credential
//! - Data URI encoding of the generation result
//! - JSON response bodies of the generate endpoint
//! - The bundled example asset catalog

pub mod catalog;
pub mod credential;
pub mod data_uri;
pub mod generate;
pub mod media;

// Re-export common types
pub use catalog::{find_example, ExampleAsset, EXAMPLE_PORTRAITS, EXAMPLE_VIDEOS};
pub use credential::Credential;
pub use data_uri::{DataUri, DataUriError};
pub use generate::{
    ErrorBody, GenerateResponse, GenerationResult, API_KEY_FIELD, DOWNLOAD_FILE_NAME,
    DRIVING_VIDEO_FIELD, DRIVING_VIDEO_UPLOAD_NAME, GENERATE_PATH, RESULT_VIDEO_MIME,
    SOURCE_IMAGE_FIELD, SOURCE_IMAGE_UPLOAD_NAME,
};
pub use media::{MediaKind, MediaPayload};
