//! In-memory media payloads.

use std::fmt;

use bytes::Bytes;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fallback content type for parts that arrive without one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Media category of an upload slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Still portrait image
    Image,
    /// Driving video
    Video,
}

impl MediaKind {
    /// Top-level MIME type for this category.
    pub fn mime_prefix(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Video => "video/",
        }
    }

    /// Minimal MIME-category check (`image/*` or `video/*`).
    pub fn matches(&self, content_type: &str) -> bool {
        content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with(self.mime_prefix())
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// A single file held entirely in memory.
///
/// Payloads are transient: they live for one session (client side) or one
/// request (proxy side) and are never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaPayload {
    /// File name reported with the upload
    pub file_name: String,
    /// Declared content type, if any
    pub content_type: Option<String>,
    /// Raw file bytes
    pub data: Bytes,
}

impl MediaPayload {
    /// Create a payload without a declared content type.
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    /// Set the declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Content type, or `application/octet-stream` when none was declared.
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// Payloads can be tens of megabytes; never dump them into logs.
impl fmt::Debug for MediaPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPayload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}
