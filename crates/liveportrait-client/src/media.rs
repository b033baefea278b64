//! Media slot contents.

use std::path::Path;

use liveportrait_models::{ExampleAsset, MediaPayload};

use crate::error::ClientResult;

/// What fills an image or video slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A file picked by the user, already read into memory.
    Uploaded(MediaPayload),
    /// A bundled example, fetched from the proxy host on submission.
    Example(&'static ExampleAsset),
}

impl MediaSource {
    /// Short description for logs and prompts.
    pub fn describe(&self) -> String {
        match self {
            Self::Uploaded(payload) => format!("{} ({} bytes)", payload.file_name, payload.len()),
            Self::Example(asset) => format!("example {}", asset.label),
        }
    }
}

/// Read a local file into a payload, guessing the content type from the
/// extension.
///
/// No size or type checks are applied.
pub async fn load_media_file(path: &Path) -> ClientResult<MediaPayload> {
    let data = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let payload = MediaPayload::new(file_name, data);
    Ok(match mime_guess::from_path(path).first() {
        Some(mime) => payload.with_content_type(mime.essence_str()),
        None => payload,
    })
}
