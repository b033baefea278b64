//! Inference request types.

use liveportrait_models::{MediaPayload, DRIVING_VIDEO_FIELD, SOURCE_IMAGE_FIELD};

/// One animation job: a portrait to animate and the video driving it.
#[derive(Debug, Clone)]
pub struct AnimateRequest {
    pub source_image: MediaPayload,
    pub driving_video: MediaPayload,
}

impl AnimateRequest {
    pub fn new(source_image: MediaPayload, driving_video: MediaPayload) -> Self {
        Self {
            source_image,
            driving_video,
        }
    }

    /// Parts in the order they are sent, keyed by form field name.
    pub fn parts(&self) -> [(&'static str, &MediaPayload); 2] {
        [
            (SOURCE_IMAGE_FIELD, &self.source_image),
            (DRIVING_VIDEO_FIELD, &self.driving_video),
        ]
    }

    /// Combined payload size in bytes.
    pub fn total_bytes(&self) -> usize {
        self.source_image.len() + self.driving_video.len()
    }
}
