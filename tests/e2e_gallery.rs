// spotvault - tests/e2e_gallery.rs
//
// End-to-end tests for the cache-management pipeline.
//
// These tests exercise the real filesystem, real walkdir traversal, real
// header sniffing, and the real stores — no mocks, no stubs. They cover the
// full path from raw bytes in a cache directory to classified inventory
// entries, exported copies, and persisted settings/profile state.

use spotvault::app::{exporter, gallery, journal, profile_mgr, settings_mgr};
use spotvault::core::journal::JournalLevel;
use spotvault::core::model::ImageKind;
use spotvault::core::profile::Profile;
use spotvault::core::settings::Settings;
use spotvault::util::constants;
use std::fs;
use std::path::Path;

// =============================================================================
// Helpers
// =============================================================================

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn write_fake_png(dir: &Path, name: &str) {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.resize(4096, 0);
    fs::write(dir.join(name), bytes).unwrap();
}

fn write_fake_jpeg(dir: &Path, name: &str) {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    bytes.extend_from_slice(b"JFIF");
    bytes.resize(4096, 0);
    fs::write(dir.join(name), bytes).unwrap();
}

fn scan_config() -> gallery::ScanConfig {
    gallery::ScanConfig {
        min_bytes: 16,
        ..Default::default()
    }
}

// =============================================================================
// Scan → export pipeline
// =============================================================================

/// Raw cache bytes on disk come back as a classified inventory, and the
/// copy-all export materialises them with usable extensions.
#[test]
fn e2e_scan_and_copy_all() {
    let cache = tempfile::tempdir().unwrap();
    write_fake_png(cache.path(), "5c2d8aef91");
    write_fake_jpeg(cache.path(), "77b01fc4d2");
    fs::write(cache.path().join("not-an-image"), vec![0x42; 4096]).unwrap();

    let (images, warnings) = gallery::scan_cache(cache.path(), &scan_config()).unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    assert_eq!(images.len(), 2, "the unknown blob must be dropped");

    let out = tempfile::tempdir().unwrap();
    let outcome = exporter::copy_all(&images, out.path()).unwrap();
    assert_eq!(outcome.copied, 2);
    assert!(outcome.warnings.is_empty());

    let exported: Vec<String> = fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(exported.contains(&"5c2d8aef91.png".to_string()), "{exported:?}");
    assert!(exported.contains(&"77b01fc4d2.jpg".to_string()), "{exported:?}");
}

/// Save-one writes a single image to a chosen destination, and delete-one
/// removes the cache entry so the next scan no longer lists it.
#[test]
fn e2e_save_then_delete() {
    let cache = tempfile::tempdir().unwrap();
    write_fake_png(cache.path(), "keepsake");

    let (images, _) = gallery::scan_cache(cache.path(), &scan_config()).unwrap();
    assert_eq!(images.len(), 1);

    let out = tempfile::tempdir().unwrap();
    let written = exporter::save_one(&images[0], &out.path().join("favourite")).unwrap();
    assert_eq!(written.extension().and_then(|e| e.to_str()), Some("png"));
    assert!(written.exists());

    exporter::delete_one(&images[0]).unwrap();
    let (images, _) = gallery::scan_cache(cache.path(), &scan_config()).unwrap();
    assert!(images.is_empty(), "deleted entry must not be listed again");
}

/// Sniffing classifies by content, not by name: misleading extensions do
/// not change the detected kind.
#[test]
fn e2e_sniffing_ignores_file_names() {
    let cache = tempfile::tempdir().unwrap();
    write_fake_png(cache.path(), "lies.jpg");

    let (images, _) = gallery::scan_cache(cache.path(), &scan_config()).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].kind, ImageKind::Png);
}

// =============================================================================
// Settings store
// =============================================================================

/// Settings survive a full save/load cycle through the real file, and a
/// version bump voids the stored values.
#[test]
fn e2e_settings_round_trip_and_version_gate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(constants::SETTINGS_FILE_NAME);

    let mut saved = Settings::default();
    saved.first_run = false;
    saved.last_count = 23;
    saved.window_width = 1600.0;
    saved.theme = "Light".to_string();
    settings_mgr::save(&saved, &path, constants::SETTINGS_VERSION).unwrap();

    let mut loaded = Settings::default();
    let populated = settings_mgr::load(&mut loaded, &path, constants::SETTINGS_VERSION).unwrap();
    assert!(populated);
    assert_eq!(loaded, saved);

    let mut stale = Settings::default();
    let populated = settings_mgr::load(&mut stale, &path, "9.9").unwrap();
    assert!(!populated, "version mismatch must populate nothing");
    assert_eq!(stale, Settings::default());
}

// =============================================================================
// Profile store
// =============================================================================

/// The profile round-trips through the encrypted store, and the sensitive
/// values never appear in clear text on disk.
#[test]
fn e2e_profile_round_trip_is_sealed_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(constants::PROFILE_FILE_NAME);

    let profile = Profile {
        title: "weekly rotation".to_string(),
        api_key: "sk-do-not-leak".to_string(),
        last_count: "23".to_string(),
        ..Profile::default()
    };
    profile_mgr::save(&profile, &path, dir.path()).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("sk-do-not-leak"), "clear text on disk: {raw}");
    assert!(raw.contains(constants::SEALED_PREFIX));

    let loaded = profile_mgr::load(&path, dir.path()).unwrap();
    assert_eq!(loaded, profile);
}

/// Field encryption round-trips on both key paths: the persisted machine
/// key and the derived fallback key.
#[test]
fn e2e_field_crypto_round_trips_on_both_key_paths() {
    use spotvault::core::secret::FieldCipher;
    use spotvault::platform::keys;

    let dir = tempfile::tempdir().unwrap();

    let machine = FieldCipher::new(keys::machine_key(dir.path()).unwrap());
    let sealed = machine.seal("round trip me").unwrap();
    assert_eq!(machine.open(&sealed).unwrap(), "round trip me");

    let fallback = FieldCipher::new(keys::fallback_key().unwrap());
    let sealed = fallback.seal("round trip me").unwrap();
    assert_eq!(fallback.open(&sealed).unwrap(), "round trip me");
}

// =============================================================================
// Journal
// =============================================================================

/// Journal entries land in the date-bucketed file and an aggressive purge
/// removes expired files along with their emptied directories.
#[test]
fn e2e_journal_write_and_purge() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join(constants::JOURNAL_DIR_NAME);
    let j = journal::Journal::new(base.clone(), "e2etest", 365);

    j.write(JournalLevel::Information, "pipeline finished");
    j.write(JournalLevel::Error, "something fell over");

    let current = j.current_file();
    assert!(current.exists());
    let content = fs::read_to_string(&current).unwrap();
    assert!(content.contains("pipeline finished"));
    assert!(content.contains("something fell over"));
    assert!(content.contains("Error"));

    // Plant an expired file from a long-gone month and sweep it.
    let stale_dir = base.join("e2etest").join("2002").join("03-March");
    fs::create_dir_all(&stale_dir).unwrap();
    fs::write(stale_dir.join("e2etest_14.log"), "stale").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(20));

    let (files, dirs) = journal::purge_old(&base, 0, constants::MAX_PURGE_FILES_PER_SWEEP);
    assert!(files >= 1, "the stale file must be purged");
    assert!(dirs >= 1, "its emptied month directory must be removed");
    assert!(!stale_dir.exists());
}
