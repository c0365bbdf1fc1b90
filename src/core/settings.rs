// spotvault - core/settings.rs
//
// Versioned-XML settings record.
// Core layer: converts between the record and XML text, never touches the
// filesystem. I/O is handled by app::settings_mgr which feeds content here.
//
// Wire format, one element per field:
//
//   <?xml version="1.0" encoding="utf-8" standalone="yes"?>
//   <Settings version="1.0">
//     <property name="window_width" type="f64">
//       <value>1280</value>
//     </property>
//     ...
//   </Settings>
//
// The root element name must equal the record name and its `version`
// attribute must equal the expected version, or the load is skipped whole —
// no partial migration. Individual fields that fail to parse are logged and
// skipped; a corrupt field never aborts the rest of the load.
//
// Fields are enumerated through an explicit registry (`write_fields` /
// `apply_field`) rather than any runtime reflection, so the set of
// persisted fields is auditable in one place.

use crate::util::error::SettingsError;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::path::Path;

/// Root element name; must match on load.
pub const RECORD_NAME: &str = "Settings";

// =============================================================================
// Record
// =============================================================================

/// Flat application settings record: window geometry, session bookkeeping,
/// and a few behaviour flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub first_run: bool,
    pub debug_mode: bool,
    pub theme: String,
    pub startup_position: String,
    pub window_width: f64,
    pub window_height: f64,
    pub window_top: f64,
    pub window_left: f64,
    pub window_state: i32,
    pub monitor_dpi: i32,
    pub inactivity_timeout: i32,
    pub last_count: i32,
    pub last_use: DateTime<Utc>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            first_run: true,
            debug_mode: false,
            theme: "Dark".to_string(),
            startup_position: String::new(),
            window_width: -1.0,
            window_height: -1.0,
            window_top: -1.0,
            window_left: -1.0,
            window_state: -1,
            monitor_dpi: 96,
            inactivity_timeout: 15,
            last_count: 0,
            last_use: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl Settings {
    /// The field registry: (name, type tag, serialised value) for every
    /// persisted field, in stable write order.
    fn write_fields(&self) -> Vec<(&'static str, &'static str, String)> {
        vec![
            ("first_run", "bool", self.first_run.to_string()),
            ("debug_mode", "bool", self.debug_mode.to_string()),
            ("theme", "string", self.theme.clone()),
            ("startup_position", "string", self.startup_position.clone()),
            ("window_width", "f64", self.window_width.to_string()),
            ("window_height", "f64", self.window_height.to_string()),
            ("window_top", "f64", self.window_top.to_string()),
            ("window_left", "f64", self.window_left.to_string()),
            ("window_state", "i32", self.window_state.to_string()),
            ("monitor_dpi", "i32", self.monitor_dpi.to_string()),
            (
                "inactivity_timeout",
                "i32",
                self.inactivity_timeout.to_string(),
            ),
            ("last_count", "i32", self.last_count.to_string()),
            ("last_use", "datetime", self.last_use.to_rfc3339()),
        ]
    }

    /// Apply one named field from its serialised text.
    ///
    /// Returns `Ok(true)` when the field was recognised and applied,
    /// `Ok(false)` for an unknown name, and `Err` with a reason when the
    /// value failed to parse. Callers log and skip both non-applied cases.
    fn apply_field(&mut self, name: &str, raw: &str) -> std::result::Result<bool, String> {
        fn parse<T: std::str::FromStr>(raw: &str) -> std::result::Result<T, String>
        where
            T::Err: std::fmt::Display,
        {
            raw.trim().parse::<T>().map_err(|e| e.to_string())
        }

        match name {
            "first_run" => self.first_run = parse_bool(raw)?,
            "debug_mode" => self.debug_mode = parse_bool(raw)?,
            "theme" => self.theme = raw.to_string(),
            "startup_position" => self.startup_position = raw.to_string(),
            "window_width" => self.window_width = parse(raw)?,
            "window_height" => self.window_height = parse(raw)?,
            "window_top" => self.window_top = parse(raw)?,
            "window_left" => self.window_left = parse(raw)?,
            "window_state" => self.window_state = parse(raw)?,
            "monitor_dpi" => self.monitor_dpi = parse(raw)?,
            "inactivity_timeout" => self.inactivity_timeout = parse(raw)?,
            "last_count" => self.last_count = parse(raw)?,
            "last_use" => {
                self.last_use = DateTime::parse_from_rfc3339(raw.trim())
                    .map(|d| d.with_timezone(&Utc))
                    .map_err(|e| e.to_string())?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Accepts "true"/"false" in any case (the .NET-era store wrote "True").
fn parse_bool(raw: &str) -> std::result::Result<bool, String> {
    raw.trim()
        .to_ascii_lowercase()
        .parse::<bool>()
        .map_err(|e| e.to_string())
}

// =============================================================================
// Serialisation
// =============================================================================

/// Render the record as the versioned XML document.
///
/// `source_path` is used for error context only (not for I/O).
pub fn to_xml(
    settings: &Settings,
    version: &str,
    source_path: &Path,
) -> std::result::Result<String, SettingsError> {
    let malformed = |reason: String| SettingsError::Malformed {
        path: source_path.to_path_buf(),
        reason,
    };

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), Some("yes"))))
        .map_err(|e| malformed(e.to_string()))?;

    let mut root = BytesStart::new(RECORD_NAME);
    root.push_attribute(("version", version));
    writer
        .write_event(Event::Start(root))
        .map_err(|e| malformed(e.to_string()))?;

    for (name, type_tag, value) in settings.write_fields() {
        let mut prop = BytesStart::new("property");
        prop.push_attribute(("name", name));
        prop.push_attribute(("type", type_tag));
        writer
            .write_event(Event::Start(prop))
            .map_err(|e| malformed(e.to_string()))?;

        // Empty values are written self-closing; a `<value></value>` pair
        // would re-read as indentation whitespace.
        if value.is_empty() {
            writer
                .write_event(Event::Empty(BytesStart::new("value")))
                .map_err(|e| malformed(e.to_string()))?;
        } else {
            writer
                .write_event(Event::Start(BytesStart::new("value")))
                .map_err(|e| malformed(e.to_string()))?;
            writer
                .write_event(Event::Text(BytesText::new(&value)))
                .map_err(|e| malformed(e.to_string()))?;
            writer
                .write_event(Event::End(BytesEnd::new("value")))
                .map_err(|e| malformed(e.to_string()))?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("property")))
            .map_err(|e| malformed(e.to_string()))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(RECORD_NAME)))
        .map_err(|e| malformed(e.to_string()))?;

    String::from_utf8(writer.into_inner()).map_err(|e| malformed(e.to_string()))
}

/// Populate `settings` from XML text, gated on root name and version.
///
/// Returns `Ok(true)` when at least one field was populated. A missing or
/// mismatched root element or a `version` attribute that does not equal
/// `version` is a hard skip: the record is left untouched and the result is
/// `Ok(false)`. Only unreadable XML is an error.
pub fn apply_xml(
    settings: &mut Settings,
    xml: &str,
    version: &str,
    source_path: &Path,
) -> std::result::Result<bool, SettingsError> {
    let mut reader = Reader::from_str(xml);

    let mut root_checked = false;
    let mut current_field: Option<String> = None;
    let mut in_value = false;
    let mut value_text: Option<String> = None;
    let mut populated = 0usize;

    // Apply into a scratch copy so a version mismatch discovered at the root
    // leaves the caller's record untouched.
    let mut scratch = settings.clone();

    loop {
        let event = reader.read_event().map_err(|e| SettingsError::Xml {
            path: source_path.to_path_buf(),
            source: e,
        })?;

        match event {
            Event::Start(e) if !root_checked => {
                let name = e.name();
                if name.as_ref() != RECORD_NAME.as_bytes() {
                    tracing::warn!(
                        expected = RECORD_NAME,
                        found = %String::from_utf8_lossy(name.as_ref()),
                        path = %source_path.display(),
                        "Settings root element mismatch; skipping load"
                    );
                    return Ok(false);
                }
                let found_version = attribute_value(&e, b"version");
                if found_version.as_deref() != Some(version) {
                    tracing::warn!(
                        expected = version,
                        found = found_version.as_deref().unwrap_or("<none>"),
                        path = %source_path.display(),
                        "Settings version mismatch; skipping load"
                    );
                    return Ok(false);
                }
                root_checked = true;
            }
            Event::Start(e) if e.name().as_ref() == b"property" => {
                current_field = attribute_value(&e, b"name");
            }
            Event::Start(e) if e.name().as_ref() == b"value" => {
                in_value = true;
                value_text = None;
            }
            Event::Text(t) if in_value => {
                let text = t.unescape().map_err(|e| SettingsError::Xml {
                    path: source_path.to_path_buf(),
                    source: e,
                })?;
                value_text = Some(text.into_owned());
            }
            Event::Empty(e) if root_checked && e.name().as_ref() == b"value" => {
                if let Some(name) = current_field.as_deref() {
                    apply_one(&mut scratch, name, "", &mut populated);
                }
            }
            Event::End(e) if e.name().as_ref() == b"value" => {
                in_value = false;
                if let Some(name) = current_field.as_deref() {
                    let raw = value_text.take().unwrap_or_default();
                    // Whitespace-only content is formatting, not data.
                    let raw = if raw.trim().is_empty() { "" } else { raw.as_str() };
                    apply_one(&mut scratch, name, raw, &mut populated);
                }
            }
            Event::End(e) if e.name().as_ref() == b"property" => {
                current_field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if populated > 0 {
        *settings = scratch;
    }
    tracing::debug!(populated, path = %source_path.display(), "Settings load complete");
    Ok(populated > 0)
}

/// Apply one field into the scratch record, counting successes and logging
/// the skip cases.
fn apply_one(scratch: &mut Settings, name: &str, raw: &str, populated: &mut usize) {
    match scratch.apply_field(name, raw) {
        Ok(true) => *populated += 1,
        Ok(false) => {
            tracing::debug!(field = name, "Unknown settings field; skipped");
        }
        Err(reason) => {
            tracing::warn!(
                field = name,
                %reason,
                "Settings field failed to parse; skipped"
            );
        }
    }
}

/// Read a named attribute from a start tag, unescaped. Returns `None` when
/// the attribute is absent or malformed (malformed attributes are treated
/// the same as missing ones — the surrounding gate then rejects the load).
fn attribute_value(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn sample() -> Settings {
        Settings {
            first_run: false,
            debug_mode: true,
            theme: "Light".to_string(),
            startup_position: "CenterScreen".to_string(),
            window_width: 1280.0,
            window_height: 720.5,
            window_top: 10.0,
            window_left: 20.0,
            window_state: 2,
            monitor_dpi: 144,
            inactivity_timeout: 30,
            last_count: 42,
            last_use: Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let path = PathBuf::from("test.xml");
        let original = sample();
        let xml = to_xml(&original, "1.0", &path).unwrap();

        let mut loaded = Settings::default();
        let populated = apply_xml(&mut loaded, &xml, "1.0", &path).unwrap();

        assert!(populated, "round-trip load should populate fields");
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_version_mismatch_populates_nothing() {
        let path = PathBuf::from("test.xml");
        let xml = to_xml(&sample(), "1.0", &path).unwrap();

        let mut loaded = Settings::default();
        let populated = apply_xml(&mut loaded, &xml, "2.0", &path).unwrap();

        assert!(!populated, "version mismatch must be a hard skip");
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_root_name_mismatch_populates_nothing() {
        let path = PathBuf::from("test.xml");
        let xml = r#"<?xml version="1.0"?>
<SomethingElse version="1.0">
  <property name="last_count" type="i32"><value>7</value></property>
</SomethingElse>"#;

        let mut loaded = Settings::default();
        let populated = apply_xml(&mut loaded, xml, "1.0", &path).unwrap();
        assert!(!populated);
        assert_eq!(loaded.last_count, 0);
    }

    #[test]
    fn test_corrupt_field_is_skipped_not_fatal() {
        let path = PathBuf::from("test.xml");
        let xml = format!(
            r#"<?xml version="1.0"?>
<{RECORD_NAME} version="1.0">
  <property name="window_width" type="f64"><value>not-a-number</value></property>
  <property name="last_count" type="i32"><value>7</value></property>
</{RECORD_NAME}>"#
        );

        let mut loaded = Settings::default();
        let populated = apply_xml(&mut loaded, &xml, "1.0", &path).unwrap();

        assert!(populated, "the valid field should still be populated");
        assert_eq!(loaded.last_count, 7);
        assert_eq!(
            loaded.window_width,
            Settings::default().window_width,
            "corrupt field keeps its default"
        );
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let path = PathBuf::from("test.xml");
        let xml = format!(
            r#"<?xml version="1.0"?>
<{RECORD_NAME} version="1.0">
  <property name="no_such_field" type="string"><value>x</value></property>
  <property name="theme" type="string"><value>Light</value></property>
</{RECORD_NAME}>"#
        );

        let mut loaded = Settings::default();
        let populated = apply_xml(&mut loaded, &xml, "1.0", &path).unwrap();
        assert!(populated);
        assert_eq!(loaded.theme, "Light");
    }

    #[test]
    fn test_empty_string_field_round_trips() {
        let path = PathBuf::from("test.xml");
        let mut original = sample();
        original.startup_position = String::new();
        let xml = to_xml(&original, "1.0", &path).unwrap();

        let mut loaded = Settings {
            startup_position: "WillBeCleared".to_string(),
            ..Settings::default()
        };
        apply_xml(&mut loaded, &xml, "1.0", &path).unwrap();
        assert_eq!(loaded.startup_position, "");
    }

    #[test]
    fn test_dotnet_style_booleans_accepted() {
        let path = PathBuf::from("test.xml");
        let xml = format!(
            r#"<?xml version="1.0"?>
<{RECORD_NAME} version="1.0">
  <property name="debug_mode" type="bool"><value>True</value></property>
</{RECORD_NAME}>"#
        );

        let mut loaded = Settings::default();
        apply_xml(&mut loaded, &xml, "1.0", &path).unwrap();
        assert!(loaded.debug_mode);
    }

    #[test]
    fn test_unreadable_xml_is_an_error() {
        let path = PathBuf::from("test.xml");
        let mut loaded = Settings::default();
        let result = apply_xml(&mut loaded, "<Settings version=\"1.0\"><property>", "1.0", &path);
        // Truncated document: either an Xml error or, at minimum, nothing
        // populated. quick-xml reports the dangling tag at EOF.
        match result {
            Err(SettingsError::Xml { .. }) => {}
            Ok(populated) => assert!(!populated),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
}
