// spotvault - app/gallery.rs
//
// Scan the lock-screen image cache and build the inventory.
//
// The walk collects candidate paths and metadata first, then classifies the
// candidates in parallel: each file costs a 16-byte header read plus, for
// recognised formats, an image header decode for pixel dimensions. The cache
// regularly holds a few hundred entries, so the per-file work is fanned out
// with rayon.
//
// Per-file I/O errors are non-fatal and collected as warnings; only an
// invalid root is an error.

use crate::core::model::{CachedImage, ImageKind};
use crate::core::sniff;
use crate::platform::fs::read_file_header;
use crate::util::constants;
use crate::util::error::GalleryError;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Configuration for a cache scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Files smaller than this are skipped (tile/metadata blobs).
    pub min_bytes: u64,

    /// Maximum directory recursion depth.
    pub max_depth: usize,

    /// When true, files whose header matches no known signature are listed
    /// with kind `Unknown` instead of being dropped.
    pub include_unknown: bool,

    /// Glob patterns for files to skip entirely.
    pub exclude_patterns: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_bytes: constants::DEFAULT_MIN_IMAGE_BYTES,
            max_depth: constants::DEFAULT_MAX_DEPTH,
            include_unknown: false,
            exclude_patterns: constants::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Scan `root` and return the image inventory, newest first, plus any
/// non-fatal warnings.
pub fn scan_cache(
    root: &Path,
    config: &ScanConfig,
) -> Result<(Vec<CachedImage>, Vec<String>), GalleryError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(GalleryError::NotADirectory {
                path: root.to_path_buf(),
            })
        }
        Err(_) => {
            return Err(GalleryError::RootNotFound {
                path: root.to_path_buf(),
            })
        }
    }

    let max_depth = config.max_depth.min(constants::ABSOLUTE_MAX_DEPTH);
    let exclude_pats = compile_patterns(&config.exclude_patterns);

    tracing::debug!(
        root = %root.display(),
        max_depth,
        min_bytes = config.min_bytes,
        "Cache scan starting"
    );

    let mut warnings: Vec<String> = Vec::new();
    let mut candidates: Vec<(PathBuf, u64, Option<DateTime<Utc>>)> = Vec::new();

    for entry_result in walkdir::WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
    {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Scan warning");
                warnings.push(msg);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if exclude_pats.iter().any(|p| p.matches(&file_name)) {
            tracing::trace!(file = %file_name, "Excluded by pattern");
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                let msg = format!("Cannot read metadata for '{}': {e}", path.display());
                tracing::debug!(warning = %msg, "Scan warning");
                warnings.push(msg);
                continue;
            }
        };

        let size = metadata.len();
        if size < config.min_bytes {
            tracing::trace!(file = %file_name, size, "Below minimum size");
            continue;
        }

        let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
        candidates.push((path.to_path_buf(), size, modified));
    }

    // Classify in parallel; each worker returns either an inventory entry
    // or a warning string for an unreadable header.
    let classified: Vec<std::result::Result<CachedImage, String>> = candidates
        .into_par_iter()
        .map(|(path, size, modified)| {
            let header = read_file_header(&path)
                .map_err(|e| format!("Cannot read header of '{}': {e}", path.display()))?;
            let kind = sniff::classify(&header);
            let dimensions = if kind.is_probeable() {
                probe_dimensions(&path)
            } else {
                None
            };
            Ok(CachedImage {
                path,
                size,
                modified,
                kind,
                dimensions,
            })
        })
        .collect();

    let mut images: Vec<CachedImage> = Vec::new();
    for result in classified {
        match result {
            Ok(image) => {
                if image.kind != ImageKind::Unknown || config.include_unknown {
                    images.push(image);
                }
            }
            Err(msg) => {
                tracing::debug!(warning = %msg, "Scan warning");
                warnings.push(msg);
            }
        }
    }

    // Newest first; entries without an mtime sort to the end.
    images.sort_unstable_by(|a, b| match (b.modified, a.modified) {
        (Some(bm), Some(am)) => bm.cmp(&am),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.path.cmp(&b.path),
    });

    tracing::debug!(
        images = images.len(),
        warnings = warnings.len(),
        "Cache scan complete"
    );

    Ok((images, warnings))
}

/// Select one image from the inventory by its listing index.
pub fn select<'a>(
    images: &'a [CachedImage],
    index: usize,
) -> Result<&'a CachedImage, GalleryError> {
    images.get(index).ok_or(GalleryError::IndexOutOfRange {
        index,
        count: images.len(),
    })
}

/// Decode just enough of the image header to learn its pixel dimensions.
/// Failures are expected for truncated cache entries and yield `None`.
fn probe_dimensions(path: &Path) -> Option<(u32, u32)> {
    match image::image_dimensions(path) {
        Ok(dims) => Some(dims),
        Err(e) => {
            tracing::trace!(file = %path.display(), error = %e, "Dimension probe failed");
            None
        }
    }
}

/// Compile glob pattern strings, logging and skipping any that fail.
fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
