// spotvault - app/exporter.rs
//
// Execute export plans against the real filesystem: copy-all, save-one,
// delete-one, and inventory file writes.
//
// Per-file copy failures are collected as warnings so one unreadable cache
// entry never aborts the rest of a batch; single-target operations
// propagate their errors.

use crate::core::export::{self, CopyStep};
use crate::core::model::CachedImage;
use crate::util::error::ExportError;
use std::path::{Path, PathBuf};

/// Outcome of a copy-all run.
#[derive(Debug)]
pub struct CopyOutcome {
    /// Files successfully copied.
    pub copied: usize,
    /// Human-readable messages for entries that failed.
    pub warnings: Vec<String>,
}

/// Copy every inventory entry into `dest_dir`, creating it as needed.
pub fn copy_all(images: &[CachedImage], dest_dir: &Path) -> Result<CopyOutcome, ExportError> {
    let steps = export::plan_copy_all(images, dest_dir)?;

    std::fs::create_dir_all(dest_dir).map_err(|source| ExportError::Io {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    let mut copied = 0usize;
    let mut warnings = Vec::new();
    for CopyStep {
        source,
        destination,
    } in steps
    {
        match std::fs::copy(&source, &destination) {
            Ok(_) => {
                tracing::debug!(
                    from = %source.display(),
                    to = %destination.display(),
                    "Copied image"
                );
                copied += 1;
            }
            Err(e) => {
                let msg = format!("Could not copy '{}': {e}", source.display());
                tracing::warn!("{}", msg);
                warnings.push(msg);
            }
        }
    }

    tracing::info!(copied, failed = warnings.len(), dest = %dest_dir.display(), "Copy-all complete");
    Ok(CopyOutcome { copied, warnings })
}

/// Save one image to `dest`, appending the sniffed extension when the
/// destination has none. Returns the path actually written.
pub fn save_one(image: &CachedImage, dest: &Path) -> Result<PathBuf, ExportError> {
    let destination = export::single_destination(image, dest);

    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::copy(&image.path, &destination).map_err(|source| ExportError::Io {
        path: destination.clone(),
        source,
    })?;

    tracing::info!(to = %destination.display(), "Image saved");
    Ok(destination)
}

/// Remove one image from the cache.
pub fn delete_one(image: &CachedImage) -> Result<(), ExportError> {
    std::fs::remove_file(&image.path).map_err(|source| ExportError::Io {
        path: image.path.clone(),
        source,
    })?;
    tracing::info!(path = %image.path.display(), "Cache entry deleted");
    Ok(())
}

/// Write the inventory listing to `dest` as CSV.
pub fn write_inventory_csv(images: &[CachedImage], dest: &Path) -> Result<usize, ExportError> {
    let file = std::fs::File::create(dest).map_err(|source| ExportError::Io {
        path: dest.to_path_buf(),
        source,
    })?;
    export::inventory_csv(images, file, dest)
}

/// Write the inventory listing to `dest` as JSON.
pub fn write_inventory_json(images: &[CachedImage], dest: &Path) -> Result<usize, ExportError> {
    let file = std::fs::File::create(dest).map_err(|source| ExportError::Io {
        path: dest.to_path_buf(),
        source,
    })?;
    export::inventory_json(images, file, dest)
}

// =============================================================================
// Tests
// =============================================================================
