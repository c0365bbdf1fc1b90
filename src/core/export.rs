// spotvault - core/export.rs
//
// Export planning and inventory serialisation.
// Core layer: computes destination paths and writes to any Write trait
// object. Actual file copies and deletes are executed by app::exporter.

use crate::core::model::CachedImage;
use crate::util::constants::MAX_COLLISION_SUFFIX;
use crate::util::error::ExportError;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

// =============================================================================
// Copy planning
// =============================================================================

/// One planned copy: source cache file to named destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStep {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Plan a copy of every inventory entry into `dest_dir`.
///
/// Destination names are `<cache name>.<sniffed extension>`; collisions
/// within the plan are resolved with a numeric suffix. The plan does not
/// consult the filesystem — pre-existing files at the destination are
/// overwritten by the executor, matching the original copy-all behaviour.
pub fn plan_copy_all(
    images: &[CachedImage],
    dest_dir: &Path,
) -> Result<Vec<CopyStep>, ExportError> {
    if images.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let mut taken: HashSet<String> = HashSet::new();
    let mut steps = Vec::with_capacity(images.len());

    for image in images {
        let name = unique_name(&image.name(), image.kind.extension(), &mut taken).ok_or(
            ExportError::NameExhausted {
                path: image.path.clone(),
            },
        )?;
        steps.push(CopyStep {
            source: image.path.clone(),
            destination: dest_dir.join(name),
        });
    }

    Ok(steps)
}

/// Destination path for saving a single image.
///
/// When `dest` already has an extension it is used as-is; otherwise the
/// sniffed extension is appended.
pub fn single_destination(image: &CachedImage, dest: &Path) -> PathBuf {
    if dest.extension().is_some() {
        dest.to_path_buf()
    } else {
        dest.with_extension(image.kind.extension())
    }
}

/// Find a destination file name not yet used by this plan.
fn unique_name(stem: &str, extension: &str, taken: &mut HashSet<String>) -> Option<String> {
    let candidate = format!("{stem}.{extension}");
    if taken.insert(candidate.clone()) {
        return Some(candidate);
    }
    for suffix in 1..=MAX_COLLISION_SUFFIX {
        let candidate = format!("{stem}_{suffix}.{extension}");
        if taken.insert(candidate.clone()) {
            return Some(candidate);
        }
    }
    None
}

// =============================================================================
// Inventory serialisation
// =============================================================================

/// Write the inventory as CSV: path, kind, size, dimensions, modified.
pub fn inventory_csv<W: Write>(
    images: &[CachedImage],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["path", "kind", "size_bytes", "width", "height", "modified"])
        .map_err(|e| ExportError::Csv {
            path: export_path.to_path_buf(),
            source: e,
        })?;

    let mut count = 0;
    for image in images {
        let (width, height) = match image.dimensions {
            Some((w, h)) => (w.to_string(), h.to_string()),
            None => (String::new(), String::new()),
        };
        let modified = image
            .modified
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();

        csv_writer
            .write_record([
                &image.path.display().to_string(),
                image.kind.label(),
                &image.size.to_string(),
                &width,
                &height,
                &modified,
            ])
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Write the inventory as a JSON array of objects.
pub fn inventory_json<W: Write>(
    images: &[CachedImage],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, images).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(images.len())
}

// =============================================================================
// Tests
// =============================================================================
