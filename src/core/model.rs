// spotvault - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no platform
// dependencies. These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

// =============================================================================
// Image kind (result of magic-byte sniffing)
// =============================================================================

/// Image format classification derived from a file's leading bytes.
///
/// The cache stores files without extensions; the kind is the only source
/// of a usable extension when copying images out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    WebP,
    Heic,
    Heif,
    #[default]
    Unknown,
}

impl ImageKind {
    /// File extension (without dot) appended when exporting an image.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Gif => "gif",
            ImageKind::Bmp => "bmp",
            ImageKind::Tiff => "tiff",
            ImageKind::WebP => "webp",
            ImageKind::Heic => "heic",
            ImageKind::Heif => "heif",
            ImageKind::Unknown => "bin",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "JPEG",
            ImageKind::Png => "PNG",
            ImageKind::Gif => "GIF",
            ImageKind::Bmp => "BMP",
            ImageKind::Tiff => "TIFF",
            ImageKind::WebP => "WebP",
            ImageKind::Heic => "HEIC",
            ImageKind::Heif => "HEIF",
            ImageKind::Unknown => "Unknown",
        }
    }

    /// Whether dimension probing is worth attempting for this kind.
    pub fn is_probeable(&self) -> bool {
        !matches!(self, ImageKind::Heic | ImageKind::Heif | ImageKind::Unknown)
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Cached image (one inventory entry)
// =============================================================================

/// A single file in the lock-screen image cache, enriched with the metadata
/// the scan collects. This is the unit that flows through listing, export,
/// deletion, and wallpaper selection.
#[derive(Debug, Clone, Serialize)]
pub struct CachedImage {
    /// Absolute path of the cached file.
    pub path: PathBuf,

    /// File size in bytes.
    pub size: u64,

    /// Last-modified timestamp in UTC. `None` when metadata is unreadable.
    pub modified: Option<DateTime<Utc>>,

    /// Format classification from magic-byte sniffing.
    pub kind: ImageKind,

    /// Pixel dimensions (width, height) when the header could be decoded.
    pub dimensions: Option<(u32, u32)>,
}

impl CachedImage {
    /// The cache file name without any path, used as the export name stem.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string())
    }

    /// Human-readable size, binary units.
    pub fn human_size(&self) -> String {
        const UNIT: u64 = 1024;
        let mut value = self.size;
        let mut units = ["B", "KB", "MB", "GB", "TB"].iter();
        let mut unit = units.next().unwrap_or(&"B");
        while value >= UNIT {
            match units.next() {
                Some(next) => {
                    value /= UNIT;
                    unit = next;
                }
                None => break,
            }
        }
        format!("{value}{unit}")
    }
}

// =============================================================================
// String helpers
// =============================================================================

/// Truncate `text` to at most `max_length` visible characters, replacing the
/// removed middle with `mesial`. Short inputs are returned unchanged.
pub fn truncate_mesial(text: &str, max_length: usize, mesial: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if max_length == 0 || chars.len() <= max_length {
        return text.to_string();
    }
    let limit = max_length / 2;
    if limit > 1 {
        let head: String = chars[..limit].iter().collect();
        let tail: String = chars[chars.len() - limit..].iter().collect();
        format!("{}{}{}", head.trim(), mesial, tail.trim())
    } else {
        let head: String = chars[..max_length].iter().collect();
        format!("{}{}", head.trim(), mesial)
    }
}
