// spotvault - platform/config.rs
//
// Platform-specific path resolution and config.toml loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for spotvault data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/spotvault/ or %APPDATA%\spotvault\)
    pub config_dir: PathBuf,

    /// Data directory for the profile store, machine key, and journal.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be
    /// determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Path of the settings store.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(constants::SETTINGS_FILE_NAME)
    }

    /// Path of the profile store.
    pub fn profile_file(&self) -> PathBuf {
        self.data_dir.join(constants::PROFILE_FILE_NAME)
    }

    /// Path of the machine key file.
    pub fn field_key_file(&self) -> PathBuf {
        self.data_dir.join(constants::FIELD_KEY_FILE_NAME)
    }

    /// Default journal base directory.
    pub fn journal_base(&self) -> PathBuf {
        self.data_dir.join(constants::JOURNAL_DIR_NAME)
    }
}

/// The OS lock-screen image cache directory, when one is known for this
/// platform.
///
/// Windows keeps Spotlight images in the ContentDeliveryManager package
/// state under the local AppData root. Other platforms have no standard
/// equivalent, so the directory must come from configuration.
pub fn default_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        directories::BaseDirs::new().map(|dirs| {
            dirs.data_local_dir()
                .join("Packages")
                .join("Microsoft.Windows.ContentDeliveryManager_cw5n1h2txyewy")
                .join("LocalState")
                .join("Assets")
        })
    }
    #[cfg(not(target_os = "windows"))]
    {
        None
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility — a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[gallery]` section.
    pub gallery: GallerySection,
    /// `[journal]` section.
    pub journal: JournalSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[gallery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct GallerySection {
    /// Override for the lock-screen cache directory.
    pub cache_dir: Option<String>,
    /// Minimum file size in bytes for a cache entry to be listed.
    pub min_image_bytes: Option<u64>,
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
}

/// `[journal]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct JournalSection {
    /// Override for the journal base directory.
    pub base_dir: Option<String>,
    /// Retention window in days.
    pub retention_days: Option<u32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Diagnostic level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time. Invalid
/// values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Gallery --
    /// Cache directory override (None = platform default).
    pub cache_dir: Option<PathBuf>,
    /// Minimum file size for listing.
    pub min_image_bytes: u64,
    /// Maximum scan recursion depth.
    pub max_depth: usize,

    // -- Journal --
    /// Journal base directory override (None = platform data dir).
    pub journal_dir: Option<PathBuf>,
    /// Retention window in days.
    pub retention_days: u32,

    // -- Logging --
    /// Diagnostic level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            min_image_bytes: constants::DEFAULT_MIN_IMAGE_BYTES,
            max_depth: constants::DEFAULT_MAX_DEPTH,
            journal_dir: None,
            retention_days: constants::DEFAULT_RETENTION_DAYS,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// warnings. If the file does not exist, returns defaults with no warnings
/// (first-run). If the file is unparseable, returns defaults with an error
/// warning — the application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- Gallery: cache_dir --
    if let Some(ref dir) = raw.gallery.cache_dir {
        if dir.is_empty() {
            warnings.push("[gallery] cache_dir is empty. Ignoring.".to_string());
        } else {
            config.cache_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Gallery: min_image_bytes (any value accepted; 0 disables the filter) --
    if let Some(bytes) = raw.gallery.min_image_bytes {
        config.min_image_bytes = bytes;
    }

    // -- Gallery: max_depth --
    if let Some(depth) = raw.gallery.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.max_depth = depth;
        } else {
            warnings.push(format!(
                "[gallery] max_depth = {depth} is out of range (1-{}). Using default ({}).",
                constants::ABSOLUTE_MAX_DEPTH,
                constants::DEFAULT_MAX_DEPTH,
            ));
        }
    }

    // -- Journal: base_dir --
    if let Some(ref dir) = raw.journal.base_dir {
        if dir.is_empty() {
            warnings.push("[journal] base_dir is empty. Ignoring.".to_string());
        } else {
            config.journal_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Journal: retention_days --
    if let Some(days) = raw.journal.retention_days {
        if (constants::MIN_RETENTION_DAYS..=constants::MAX_RETENTION_DAYS).contains(&days) {
            config.retention_days = days;
        } else {
            warnings.push(format!(
                "[journal] retention_days = {days} is out of range ({}-{}). Using default ({}).",
                constants::MIN_RETENTION_DAYS,
                constants::MAX_RETENTION_DAYS,
                constants::DEFAULT_RETENTION_DAYS,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}
