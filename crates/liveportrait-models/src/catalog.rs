//! Bundled example assets.
//!
//! Examples are referenced by their static path on the proxy host and are not
//! re-validated when selected.

use schemars::JsonSchema;
use serde::Serialize;

use crate::media::MediaKind;

/// An example portrait or driving video shipped with the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ExampleAsset {
    /// Static path served by the proxy host
    pub src: &'static str,
    /// Display label
    pub label: &'static str,
    /// Slot this example fills
    pub kind: MediaKind,
}

pub const EXAMPLE_PORTRAITS: &[ExampleAsset] = &[
    ExampleAsset {
        src: "/mona-lisa-portrait.jpg",
        label: "Mona Lisa",
        kind: MediaKind::Image,
    },
    ExampleAsset {
        src: "/professional-woman-portrait.png",
        label: "Portrait 1",
        kind: MediaKind::Image,
    },
    ExampleAsset {
        src: "/man-with-beard-portrait.jpg",
        label: "Portrait 2",
        kind: MediaKind::Image,
    },
    ExampleAsset {
        src: "/young-woman-smiling-portrait.png",
        label: "Portrait 3",
        kind: MediaKind::Image,
    },
];

pub const EXAMPLE_VIDEOS: &[ExampleAsset] = &[
    ExampleAsset {
        src: "/person-talking-video-thumbnail.jpg",
        label: "Talking 1",
        kind: MediaKind::Video,
    },
    ExampleAsset {
        src: "/person-speaking-video-thumbnail.jpg",
        label: "Talking 2",
        kind: MediaKind::Video,
    },
    ExampleAsset {
        src: "/facial-expressions-video-thumbnail.jpg",
        label: "Expressions",
        kind: MediaKind::Video,
    },
];

/// Examples for one slot.
pub fn examples(kind: MediaKind) -> &'static [ExampleAsset] {
    match kind {
        MediaKind::Image => EXAMPLE_PORTRAITS,
        MediaKind::Video => EXAMPLE_VIDEOS,
    }
}

/// Look up an example by label (case-insensitive) or by 1-based index.
pub fn find_example(kind: MediaKind, key: &str) -> Option<&'static ExampleAsset> {
    let catalog = examples(kind);
    let key = key.trim();

    if let Ok(index) = key.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| catalog.get(i));
    }

    catalog.iter().find(|e| e.label.eq_ignore_ascii_case(key))
}
