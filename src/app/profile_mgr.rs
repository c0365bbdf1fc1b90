// spotvault - app/profile_mgr.rs
//
// Profile store I/O: JSON on disk with sealed string fields.
//
// Save seals every non-empty field before serialising; load opens them
// after parsing. When no key can be obtained at all the store degrades to
// plaintext JSON with a warning — data is never lost to a crypto failure,
// matching the store this replaces.

use crate::core::profile::{self, Profile};
use crate::core::secret::FieldCipher;
use crate::platform::keys;
use crate::util::error::ProfileError;
use std::path::Path;

/// Load the profile from `path`, opening sealed fields.
///
/// A missing file yields a default profile (first run).
pub fn load(path: &Path, data_dir: &Path) -> Result<Profile, ProfileError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No profile file; using defaults");
        return Ok(Profile::default());
    }

    let json = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let stored = profile::from_json(&json, path)?;

    match keys::field_key(data_dir) {
        Some(key) => stored.opened_copy(&FieldCipher::new(key)),
        None => Ok(stored),
    }
}

/// Save the profile to `path`, sealing every non-empty field first.
pub fn save(profile: &Profile, path: &Path, data_dir: &Path) -> Result<(), ProfileError> {
    let to_store = match keys::field_key(data_dir) {
        Some(key) => profile.sealed_copy(&FieldCipher::new(key))?,
        None => {
            tracing::warn!("No field key available; profile saved as plaintext");
            profile.clone()
        }
    };

    let json = profile::to_json(&to_store, path)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ProfileError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, json).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "Profile saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants::SEALED_PREFIX;

    fn sample() -> Profile {
        Profile {
            title: "My profile".to_string(),
            last_count: "3".to_string(),
            api_key: "sk-secret".to_string(),
            last_use: "2024-06-01T00:00:00Z".to_string(),
            position_x: "10".to_string(),
            position_y: "20".to_string(),
        }
    }

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(&dir.path().join("absent.json"), dir.path()).unwrap();
        assert_eq!(loaded, Profile::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        save(&sample(), &path, dir.path()).unwrap();
        let loaded = load(&path, dir.path()).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_fields_are_sealed_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        save(&sample(), &path, dir.path()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(
            !raw.contains("sk-secret"),
            "API key must not be stored in clear: {raw}"
        );
        assert!(raw.contains(SEALED_PREFIX));
    }

    #[test]
    fn test_plaintext_store_still_loads() {
        // A store written before encryption was enabled: fields unmarked.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{"Title": "legacy", "APIKey": "plain-key"}"#,
        )
        .unwrap();

        let loaded = load(&path, dir.path()).unwrap();
        assert_eq!(loaded.title, "legacy");
        assert_eq!(loaded.api_key, "plain-key");
    }

    #[test]
    fn test_double_save_does_not_double_encrypt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        save(&sample(), &path, dir.path()).unwrap();
        // Load sealed JSON directly and save it again without opening.
        let raw = std::fs::read_to_string(&path).unwrap();
        let sealed = profile::from_json(&raw, &path).unwrap();
        save(&sealed, &path, dir.path()).unwrap();

        let loaded = load(&path, dir.path()).unwrap();
        assert_eq!(loaded, sample(), "marker must prevent double encryption");
    }
}
