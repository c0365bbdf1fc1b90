// spotvault - app/settings_mgr.rs
//
// Settings store I/O: reads and writes the versioned XML file, feeding the
// text through core::settings for parsing and rendering.
//
// Load errors other than a missing file are surfaced to the caller; a
// missing file is the normal first-run case and simply populates nothing.

use crate::core::settings::{self, Settings};
use crate::util::error::SettingsError;
use std::path::Path;

/// Load the settings file into `settings`.
///
/// Returns `Ok(true)` when at least one field was populated. A missing
/// file, a root-name mismatch, or a version mismatch all return
/// `Ok(false)` and leave the record untouched.
pub fn load(
    settings: &mut Settings,
    path: &Path,
    version: &str,
) -> Result<bool, SettingsError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No settings file; using defaults");
        return Ok(false);
    }

    let xml = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    settings::apply_xml(settings, &xml, version, path)
}

/// Write `settings` to the settings file, overwriting any existing content
/// and creating parent directories as needed.
pub fn save(settings: &Settings, path: &Path, version: &str) -> Result<(), SettingsError> {
    let xml = settings::to_xml(settings, version, path)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, xml).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "Settings saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants::SETTINGS_VERSION;

    #[test]
    fn test_missing_file_populates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        let populated = load(
            &mut settings,
            &dir.path().join("absent.xml"),
            SETTINGS_VERSION,
        )
        .unwrap();
        assert!(!populated);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.xml");

        let mut original = Settings::default();
        original.first_run = false;
        original.last_count = 99;
        original.theme = "Light".to_string();

        save(&original, &path, SETTINGS_VERSION).unwrap();

        let mut loaded = Settings::default();
        let populated = load(&mut loaded, &path, SETTINGS_VERSION).unwrap();
        assert!(populated);
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");

        let mut first = Settings::default();
        first.last_count = 1;
        save(&first, &path, SETTINGS_VERSION).unwrap();

        let mut second = Settings::default();
        second.last_count = 2;
        save(&second, &path, SETTINGS_VERSION).unwrap();

        let mut loaded = Settings::default();
        load(&mut loaded, &path, SETTINGS_VERSION).unwrap();
        assert_eq!(loaded.last_count, 2);
    }

    #[test]
    fn test_version_bump_voids_old_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");

        let mut old = Settings::default();
        old.last_count = 7;
        save(&old, &path, "1.0").unwrap();

        let mut loaded = Settings::default();
        let populated = load(&mut loaded, &path, "2.0").unwrap();
        assert!(!populated, "a version bump must void the old store");
        assert_eq!(loaded.last_count, 0);
    }
}
