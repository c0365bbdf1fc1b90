// spotvault - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "spotvault";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "spotvault";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Settings store
// =============================================================================

/// Settings file name, written to the platform config directory.
pub const SETTINGS_FILE_NAME: &str = "spotvault.config.xml";

/// Schema version stamp for the settings store. The `version` attribute on
/// the root element must equal this value or the load is skipped entirely.
pub const SETTINGS_VERSION: &str = "1.0";

// =============================================================================
// Profile store
// =============================================================================

/// Profile file name, written to the platform data directory.
pub const PROFILE_FILE_NAME: &str = "profile.json";

/// Machine key file name (0600 on Unix), stored in the platform data directory.
pub const FIELD_KEY_FILE_NAME: &str = ".field_key";

/// AES-256 key length in bytes.
pub const FIELD_KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes.
pub const FIELD_NONCE_LEN: usize = 12;

/// Marker prefix identifying a sealed (encrypted) field value.
pub const SEALED_PREFIX: &str = "ENC::";

// =============================================================================
// Gallery scan limits
// =============================================================================

/// Number of bytes read from the start of a file for type sniffing.
pub const HEADER_SNIFF_BYTES: usize = 16;

/// Files smaller than this are skipped during a cache scan. The lock-screen
/// cache mixes full-resolution images with tiny tile/metadata blobs.
pub const DEFAULT_MIN_IMAGE_BYTES: u64 = 1024;

/// Maximum directory recursion depth during a cache scan. The cache folder
/// is flat; depth > 1 only matters for user-supplied directories.
pub const DEFAULT_MAX_DEPTH: usize = 1;

/// Hard upper bound on scan depth (prevents configuration mistakes).
pub const ABSOLUTE_MAX_DEPTH: usize = 10;

/// Default exclude glob patterns for a cache scan.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["*.tmp", "*.bak", "desktop.ini", "Thumbs.db"];

// =============================================================================
// Export
// =============================================================================

/// Default destination folder name for the copy-all operation.
pub const DEFAULT_EXPORT_DIR_NAME: &str = "ImageCopy";

/// Maximum numeric suffix tried when resolving destination name collisions.
pub const MAX_COLLISION_SUFFIX: u32 = 10_000;

// =============================================================================
// Journal (rotating application log)
// =============================================================================

/// Directory name under the journal base holding all journal output.
pub const JOURNAL_DIR_NAME: &str = "logs";

/// Default component tag for journal entries.
pub const JOURNAL_COMPONENT: &str = "spotvault";

/// Component tags are padded/truncated to this width in formatted lines.
pub const JOURNAL_COMPONENT_WIDTH: usize = 10;

/// Days a journal file is retained before becoming eligible for purge.
pub const DEFAULT_RETENTION_DAYS: u32 = 365;

/// Minimum user-configurable retention window in days.
pub const MIN_RETENTION_DAYS: u32 = 1;

/// Maximum user-configurable retention window in days.
pub const MAX_RETENTION_DAYS: u32 = 3_650;

/// Maximum number of journal files examined in a single purge sweep.
pub const MAX_PURGE_FILES_PER_SWEEP: usize = 50_000;

// =============================================================================
// Logging (diagnostic stream)
// =============================================================================

/// Default diagnostic log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
