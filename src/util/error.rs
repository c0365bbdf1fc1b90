// spotvault - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; all errors preserve the causal chain
// for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all spotvault operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum SpotvaultError {
    /// Settings store load or save failed.
    Settings(SettingsError),

    /// Profile store load, save, or field crypto failed.
    Profile(ProfileError),

    /// Cache gallery scan failed.
    Gallery(GalleryError),

    /// Export, save, or delete operation failed.
    Export(ExportError),

    /// Desktop wallpaper could not be applied.
    Wallpaper(WallpaperError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for SpotvaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings(e) => write!(f, "Settings error: {e}"),
            Self::Profile(e) => write!(f, "Profile error: {e}"),
            Self::Gallery(e) => write!(f, "Gallery error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Wallpaper(e) => write!(f, "Wallpaper error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SpotvaultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Settings(e) => Some(e),
            Self::Profile(e) => Some(e),
            Self::Gallery(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Wallpaper(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings errors
// ---------------------------------------------------------------------------

/// Errors related to the versioned-XML settings store.
///
/// Version and root-name mismatches are NOT errors — they are hard skips
/// surfaced as a "nothing populated" load result.
#[derive(Debug)]
pub enum SettingsError {
    /// The settings file contains XML the reader could not process.
    Xml {
        path: PathBuf,
        source: quick_xml::Error,
    },

    /// The document parsed but violates the expected shape (bad attribute,
    /// orphaned value node, serializer failure).
    Malformed { path: PathBuf, reason: String },

    /// I/O error reading or writing the settings file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml { path, source } => {
                write!(f, "Failed to parse '{}': {source}", path.display())
            }
            Self::Malformed { path, reason } => {
                write!(f, "Malformed settings '{}': {reason}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Settings I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Malformed { .. } => None,
        }
    }
}

impl From<SettingsError> for SpotvaultError {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

// ---------------------------------------------------------------------------
// Secret (field crypto) errors
// ---------------------------------------------------------------------------

/// Errors from sealing or opening an individual field value.
#[derive(Debug)]
pub enum SecretError {
    /// AES-GCM refused the operation (wrong key, tampered ciphertext).
    /// The cipher's error type is deliberately opaque, so only a phase
    /// label is available.
    Cipher { phase: &'static str },

    /// A sealed value was not valid Base64.
    Decode { source: base64::DecodeError },

    /// A sealed value decoded to fewer bytes than a nonce.
    TooShort { len: usize },

    /// Decrypted bytes were not valid UTF-8.
    Utf8 { source: std::string::FromUtf8Error },

    /// The fallback key could not be derived.
    KeyDerivation { reason: String },
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cipher { phase } => write!(f, "AES-GCM {phase} failed"),
            Self::Decode { source } => write!(f, "Sealed value is not valid Base64: {source}"),
            Self::TooShort { len } => {
                write!(f, "Sealed value is {len} bytes, shorter than a nonce")
            }
            Self::Utf8 { source } => write!(f, "Decrypted bytes are not UTF-8: {source}"),
            Self::KeyDerivation { reason } => write!(f, "Key derivation failed: {reason}"),
        }
    }
}

impl std::error::Error for SecretError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source } => Some(source),
            Self::Utf8 { source } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Profile errors
// ---------------------------------------------------------------------------

/// Errors related to the encrypted profile store.
#[derive(Debug)]
pub enum ProfileError {
    /// JSON (de)serialisation failed.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The machine key file exists but has the wrong length.
    BadKeyFile { path: PathBuf, len: usize },

    /// Sealing or opening a specific field failed.
    Field {
        field: &'static str,
        source: SecretError,
    },

    /// I/O error reading or writing the profile or key file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { path, source } => {
                write!(f, "Profile JSON error '{}': {source}", path.display())
            }
            Self::BadKeyFile { path, len } => write!(
                f,
                "Machine key file '{}' is {len} bytes, expected {}",
                path.display(),
                crate::util::constants::FIELD_KEY_LEN
            ),
            Self::Field { field, source } => {
                write!(f, "Field '{field}': {source}")
            }
            Self::Io { path, source } => {
                write!(f, "Profile I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source, .. } => Some(source),
            Self::Field { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::BadKeyFile { .. } => None,
        }
    }
}

impl From<ProfileError> for SpotvaultError {
    fn from(e: ProfileError) -> Self {
        Self::Profile(e)
    }
}

// ---------------------------------------------------------------------------
// Gallery errors
// ---------------------------------------------------------------------------

/// Errors related to scanning the image cache.
#[derive(Debug)]
pub enum GalleryError {
    /// The cache directory does not exist.
    RootNotFound { path: PathBuf },

    /// The cache path is not a directory.
    NotADirectory { path: PathBuf },

    /// No cache directory is known for this platform and none was configured.
    NoCacheDir,

    /// A requested image index is outside the scanned inventory.
    IndexOutOfRange { index: usize, count: usize },

    /// Walkdir traversal error (wraps individual file/dir access failures).
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for GalleryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Cache directory '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Cache path '{}' is not a directory", path.display())
            }
            Self::NoCacheDir => write!(
                f,
                "No lock-screen cache directory is known for this platform. \
                 Set [gallery] cache_dir in config.toml or pass --cache-dir."
            ),
            Self::IndexOutOfRange { index, count } => write!(
                f,
                "Image index {index} is out of range; the inventory holds {count} images"
            ),
            Self::Traversal { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for GalleryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Traversal { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<GalleryError> for SpotvaultError {
    fn from(e: GalleryError) -> Self {
        Self::Gallery(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to copy, save, delete, and inventory export.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error copying, writing, or deleting a file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A destination name collision could not be resolved.
    NameExhausted { path: PathBuf },

    /// The operation was asked to run against an empty inventory.
    NothingToExport,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::NameExhausted { path } => write!(
                f,
                "Could not find a free destination name for '{}'",
                path.display()
            ),
            Self::NothingToExport => write!(f, "The image inventory is empty"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for SpotvaultError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Wallpaper errors
// ---------------------------------------------------------------------------

/// Errors applying a desktop wallpaper.
#[derive(Debug)]
pub enum WallpaperError {
    /// No wallpaper mechanism is known for the current platform.
    Unsupported { os: &'static str },

    /// The helper process could not be spawned.
    Launch {
        program: &'static str,
        source: io::Error,
    },

    /// The helper process ran but reported failure.
    CommandFailed {
        program: &'static str,
        detail: String,
    },
}

impl fmt::Display for WallpaperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { os } => {
                write!(f, "Setting the wallpaper is not supported on {os}")
            }
            Self::Launch { program, source } => {
                write!(f, "Could not launch '{program}': {source}")
            }
            Self::CommandFailed { program, detail } => {
                write!(f, "'{program}' failed: {detail}")
            }
        }
    }
}

impl std::error::Error for WallpaperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Launch { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<WallpaperError> for SpotvaultError {
    fn from(e: WallpaperError) -> Self {
        Self::Wallpaper(e)
    }
}

/// Convenience type alias for spotvault results.
pub type Result<T> = std::result::Result<T, SpotvaultError>;
