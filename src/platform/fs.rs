// spotvault - platform/fs.rs
//
// Filesystem helpers used by the app layer: header reads for type
// sniffing and revealing files in the system file manager.

use crate::util::constants::HEADER_SNIFF_BYTES;
use std::io::{self, Read};
use std::path::Path;

/// Read up to `HEADER_SNIFF_BYTES` leading bytes of a file.
///
/// Returns fewer bytes for files shorter than the sniff window; the
/// classifier handles short buffers.
pub fn read_file_header(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = std::fs::File::open(path)?;
    let mut header = vec![0u8; HEADER_SNIFF_BYTES];
    let mut filled = 0;
    while filled < header.len() {
        match file.read(&mut header[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    header.truncate(filled);
    Ok(header)
}

/// Open the system file manager and highlight `path` within it.
///
/// Platform behaviour:
/// - **Windows**: `explorer.exe /select,"<path>"` — opens Explorer with the
///   file pre-selected in its parent folder.
/// - **macOS**: `open -R "<path>"` — reveals the file in Finder.
/// - **Linux**: `xdg-open "<parent>"` — opens the parent directory (most
///   Linux file managers do not support per-file selection via a standard
///   command-line API).
///
/// The subprocess is spawned detached; any launch failure is logged at WARN
/// level but never propagated so the caller never blocks.
pub fn reveal_in_file_manager(path: &Path) {
    #[cfg(target_os = "windows")]
    {
        // `/select,<path>` must be a single argument — no space after comma.
        let arg = format!("/select,{}", path.display());
        if let Err(e) = std::process::Command::new("explorer").arg(arg).spawn() {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to reveal file in Explorer"
            );
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Err(e) = std::process::Command::new("open")
            .arg("-R")
            .arg(path)
            .spawn()
        {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to reveal file in Finder"
            );
        }
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let parent = path.parent().unwrap_or(path);
        if let Err(e) = std::process::Command::new("xdg-open").arg(parent).spawn() {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to open parent directory"
            );
        }
    }
}
