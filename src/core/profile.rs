// spotvault - core/profile.rs
//
// The user profile record and its field-level crypto transforms.
// Core layer: accepts and produces JSON strings, never touches the
// filesystem. I/O is handled by app::profile_mgr which feeds content here.
//
// The wire format keeps the PascalCase member names of the store this
// replaces, so an existing profile.json loads unchanged.

use crate::core::secret::FieldCipher;
use crate::util::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Small set of user-profile string fields. Free-text fields stay numeric
/// strings on the wire (the store predates typed fields).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Profile {
    pub title: String,
    pub last_count: String,
    #[serde(rename = "APIKey")]
    pub api_key: String,
    pub last_use: String,
    pub position_x: String,
    pub position_y: String,
}

impl Profile {
    /// Produce a copy with every non-empty field sealed.
    pub fn sealed_copy(&self, cipher: &FieldCipher) -> Result<Profile, ProfileError> {
        let seal = |field: &'static str, value: &str| {
            cipher
                .seal(value)
                .map_err(|source| ProfileError::Field { field, source })
        };
        Ok(Profile {
            title: seal("Title", &self.title)?,
            last_count: seal("LastCount", &self.last_count)?,
            api_key: seal("APIKey", &self.api_key)?,
            last_use: seal("LastUse", &self.last_use)?,
            position_x: seal("PositionX", &self.position_x)?,
            position_y: seal("PositionY", &self.position_y)?,
        })
    }

    /// Produce a copy with every sealed field opened.
    pub fn opened_copy(&self, cipher: &FieldCipher) -> Result<Profile, ProfileError> {
        let open = |field: &'static str, value: &str| {
            cipher
                .open(value)
                .map_err(|source| ProfileError::Field { field, source })
        };
        Ok(Profile {
            title: open("Title", &self.title)?,
            last_count: open("LastCount", &self.last_count)?,
            api_key: open("APIKey", &self.api_key)?,
            last_use: open("LastUse", &self.last_use)?,
            position_x: open("PositionX", &self.position_x)?,
            position_y: open("PositionY", &self.position_y)?,
        })
    }
}

/// Parse a profile from JSON text. `source_path` is error context only.
pub fn from_json(json: &str, source_path: &Path) -> Result<Profile, ProfileError> {
    serde_json::from_str(json).map_err(|source| ProfileError::Json {
        path: source_path.to_path_buf(),
        source,
    })
}

/// Render a profile as pretty JSON text. `source_path` is error context only.
pub fn to_json(profile: &Profile, source_path: &Path) -> Result<String, ProfileError> {
    serde_json::to_string_pretty(profile).map_err(|source| ProfileError::Json {
        path: source_path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants::FIELD_KEY_LEN;
    use std::path::PathBuf;

    fn sample() -> Profile {
        Profile {
            title: "Spotlight favourites".to_string(),
            last_count: "17".to_string(),
            api_key: "sk-123456".to_string(),
            last_use: "2024-06-01T12:30:00Z".to_string(),
            position_x: "120".to_string(),
            position_y: "340".to_string(),
        }
    }

    #[test]
    fn test_sealed_copy_round_trips() {
        let cipher = FieldCipher::new([3u8; FIELD_KEY_LEN]);
        let original = sample();
        let sealed = original.sealed_copy(&cipher).unwrap();

        assert_ne!(sealed.api_key, original.api_key);
        assert!(FieldCipher::is_sealed(&sealed.api_key));

        let opened = sealed.opened_copy(&cipher).unwrap();
        assert_eq!(opened, original);
    }

    #[test]
    fn test_empty_fields_stay_empty_when_sealed() {
        let cipher = FieldCipher::new([3u8; FIELD_KEY_LEN]);
        let sealed = Profile::default().sealed_copy(&cipher).unwrap();
        assert_eq!(sealed, Profile::default());
    }

    #[test]
    fn test_wire_format_uses_pascal_case_names() {
        let path = PathBuf::from("profile.json");
        let json = to_json(&sample(), &path).unwrap();
        assert!(json.contains("\"Title\""));
        assert!(json.contains("\"APIKey\""));
        assert!(json.contains("\"PositionX\""));
        assert!(!json.contains("api_key"));

        let parsed = from_json(&json, &path).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_missing_members_default_to_empty() {
        let path = PathBuf::from("profile.json");
        let parsed = from_json(r#"{"Title": "only title"}"#, &path).unwrap();
        assert_eq!(parsed.title, "only title");
        assert_eq!(parsed.api_key, "");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let path = PathBuf::from("profile.json");
        assert!(matches!(
            from_json("{not json", &path),
            Err(ProfileError::Json { .. })
        ));
    }
}
