// spotvault - app/journal.rs
//
// The rotating application journal: date-bucketed files, lazy creation,
// and an age-based purge sweep.
//
// Concurrency model, kept from the store this replaces:
// - Base-directory resolution happens once per process behind its own lock.
// - Appends are serialised by a per-journal file lock.
// - The purge runs fire-and-forget on a plain thread with no cancellation
//   and no backpressure; it runs to completion or is abandoned at process
//   exit. The file lock is the only mitigation for purge/write races.

use crate::core::journal::{day_file_path, format_line, JournalLevel};
use crate::util::constants;
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

/// Process-wide journal base directory, resolved once.
static JOURNAL_BASE: OnceLock<PathBuf> = OnceLock::new();

/// Resolve (and cache) the journal base directory: the configured override
/// when present, else `<data_dir>/logs`.
pub fn resolve_base(override_dir: Option<&Path>, data_dir: &Path) -> PathBuf {
    JOURNAL_BASE
        .get_or_init(|| {
            let base = override_dir
                .map(Path::to_path_buf)
                .unwrap_or_else(|| data_dir.join(constants::JOURNAL_DIR_NAME));
            tracing::debug!(base = %base.display(), "Journal base resolved");
            base
        })
        .clone()
}

/// Handle to one component's journal. Cloning shares the file lock.
#[derive(Clone)]
pub struct Journal {
    inner: Arc<JournalInner>,
}

struct JournalInner {
    base: PathBuf,
    component: String,
    retention_days: u32,
    file_lock: Mutex<()>,
}

impl Journal {
    /// Open a journal rooted at `base` for `component`.
    pub fn new(base: PathBuf, component: &str, retention_days: u32) -> Self {
        Self {
            inner: Arc::new(JournalInner {
                base,
                component: component.to_string(),
                retention_days,
                file_lock: Mutex::new(()),
            }),
        }
    }

    /// The journal file that receives entries written right now.
    pub fn current_file(&self) -> PathBuf {
        day_file_path(
            &self.inner.base,
            &self.inner.component,
            Local::now().date_naive(),
        )
    }

    /// Format and append one entry to the current day's file.
    ///
    /// Never panics and never propagates I/O failures — a journal that
    /// cannot be written must not take the operation down with it. Failures
    /// go to the diagnostic stream instead.
    pub fn write(&self, level: JournalLevel, message: &str) {
        let now = Local::now();
        let line = format_line(now, &self.inner.component, level, message);

        if level == JournalLevel::Debug {
            tracing::debug!(target: "journal", "{line}");
        }

        if let Err(e) = self.append(&line) {
            tracing::warn!(error = %e, "Journal append failed");
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let path = self.current_file();

        let guard = self
            .inner
            .file_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let is_new_file = !path.exists();
        if is_new_file {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        if is_new_file {
            // First entry of the day: stamp a banner and schedule a sweep.
            let banner = format_line(
                Local::now(),
                &self.inner.component,
                JournalLevel::Information,
                &format!(
                    "------- Created new log file for v{} -------",
                    constants::APP_VERSION
                ),
            );
            writeln!(file, "{banner}")?;
        }
        writeln!(file, "{line}")?;
        drop(guard);

        if is_new_file {
            self.spawn_purge();
        }
        Ok(())
    }

    /// Kick off a purge sweep on a background thread. Fire-and-forget: the
    /// handle is dropped and the thread finishes on its own schedule.
    fn spawn_purge(&self) {
        let journal = self.clone();
        std::thread::spawn(move || {
            journal.write(
                JournalLevel::Information,
                &format!(
                    "Purging up to {} logs older than {} days.",
                    constants::MAX_PURGE_FILES_PER_SWEEP,
                    journal.inner.retention_days
                ),
            );
            let (files, dirs) = purge_old(
                &journal.inner.base,
                journal.inner.retention_days,
                constants::MAX_PURGE_FILES_PER_SWEEP,
            );
            if files > 0 || dirs > 0 {
                journal.write(
                    JournalLevel::Information,
                    &format!("Purge removed {files} files and {dirs} empty directories."),
                );
            }
        });
    }

    /// Run a purge sweep synchronously. Returns (files removed, directories
    /// removed).
    pub fn purge_now(&self) -> (usize, usize) {
        purge_old(
            &self.inner.base,
            self.inner.retention_days,
            constants::MAX_PURGE_FILES_PER_SWEEP,
        )
    }
}

/// Delete `.log` files under `base` whose last modification is older than
/// `retention_days`, examining at most `max_files` files per sweep, then
/// remove directories the sweep left empty.
///
/// Individual deletion failures are logged and skipped; the sweep always
/// runs to completion.
pub fn purge_old(base: &Path, retention_days: u32, max_files: usize) -> (usize, usize) {
    if !base.is_dir() {
        return (0, 0);
    }

    let cutoff = std::time::SystemTime::now()
        .checked_sub(std::time::Duration::from_secs(
            u64::from(retention_days) * 24 * 60 * 60,
        ))
        .unwrap_or(std::time::SystemTime::UNIX_EPOCH);

    let mut log_files: Vec<PathBuf> = Vec::new();
    let mut directories: Vec<PathBuf> = Vec::new();

    for entry in walkdir::WalkDir::new(base).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(error = %e, "Purge cannot access entry; skipped");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            if entry.depth() > 0 {
                directories.push(entry.into_path());
            }
        } else if entry.path().extension().and_then(|e| e.to_str()) == Some("log") {
            log_files.push(entry.into_path());
        }
    }

    log_files.sort_unstable();
    log_files.truncate(max_files);

    let mut files_removed = 0usize;
    for path in &log_files {
        let modified = match std::fs::metadata(path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!(file = %path.display(), error = %e, "Purge cannot stat file");
                continue;
            }
        };
        if modified < cutoff {
            match std::fs::remove_file(path) {
                Ok(()) => {
                    tracing::debug!(file = %path.display(), "Purged log file");
                    files_removed += 1;
                }
                Err(e) => {
                    tracing::debug!(file = %path.display(), error = %e, "Purge delete failed");
                }
            }
        }
    }

    // Deepest directories first so emptied parents fall in the same sweep.
    // remove_dir refuses non-empty directories, which is the filter.
    directories.sort_unstable_by_key(|d| std::cmp::Reverse(d.components().count()));
    let mut dirs_removed = 0usize;
    for dir in &directories {
        if std::fs::remove_dir(dir).is_ok() {
            tracing::debug!(dir = %dir.display(), "Removed empty log directory");
            dirs_removed += 1;
        }
    }

    (files_removed, dirs_removed)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Tests that need "expired" files purge with retention_days = 0, under
    /// which any mtime in the past is eligible. The short sleep keeps the
    /// freshly written mtime strictly below the cutoff on coarse-grained
    /// filesystems.
    fn settle() {
        std::thread::sleep(std::time::Duration::from_millis(20));
    }

    #[test]
    fn test_write_creates_date_bucketed_file() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(dir.path().to_path_buf(), "testcomp", 365);

        journal.write(JournalLevel::Information, "hello journal");

        let path = journal.current_file();
        assert!(path.exists(), "journal file should exist at {path:?}");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("hello journal"));
        assert!(
            content.contains("Created new log file"),
            "first write stamps the banner: {content}"
        );

        let relative = path.strip_prefix(dir.path()).unwrap();
        let components: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        assert_eq!(components[0], "testcomp");
        assert_eq!(components.len(), 4, "component/year/month/file: {components:?}");
        assert!(components[3].starts_with("testcomp_"));
        assert!(components[3].ends_with(".log"));
    }

    #[test]
    fn test_writes_append_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(dir.path().to_path_buf(), "testcomp", 365);

        journal.write(JournalLevel::Information, "first");
        journal.write(JournalLevel::Warning, "second");

        let content = fs::read_to_string(journal.current_file()).unwrap();
        let first = content.find("first").unwrap();
        let second = content.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_concurrent_writes_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(dir.path().to_path_buf(), "testcomp", 365);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let j = journal.clone();
                std::thread::spawn(move || {
                    for k in 0..10 {
                        j.write(JournalLevel::Information, &format!("entry-{i}-{k}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = fs::read_to_string(journal.current_file()).unwrap();
        let entries = content.lines().filter(|l| l.contains("entry-")).count();
        assert_eq!(entries, 80);
    }

    #[test]
    fn test_purge_removes_only_expired_files() {
        let dir = tempfile::tempdir().unwrap();
        let old_dir = dir.path().join("comp").join("2001").join("01-January");
        fs::create_dir_all(&old_dir).unwrap();
        let old_file = old_dir.join("comp_01.log");
        fs::write(&old_file, "ancient").unwrap();
        settle();

        // retention 0: everything with an mtime in the past is eligible.
        let (files, _) = purge_old(dir.path(), 0, constants::MAX_PURGE_FILES_PER_SWEEP);
        assert_eq!(files, 1);
        assert!(!old_file.exists());

        // A fresh file under a generous retention must survive.
        let keep_dir = dir.path().join("comp").join("2099").join("01-January");
        fs::create_dir_all(&keep_dir).unwrap();
        let keep_file = keep_dir.join("comp_02.log");
        fs::write(&keep_file, "recent").unwrap();
        let (files, _) = purge_old(dir.path(), 365, constants::MAX_PURGE_FILES_PER_SWEEP);
        assert_eq!(files, 0);
        assert!(keep_file.exists());
    }

    #[test]
    fn test_purge_removes_emptied_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nest = dir.path().join("comp").join("2001").join("02-February");
        fs::create_dir_all(&nest).unwrap();
        fs::write(nest.join("comp_03.log"), "ancient").unwrap();
        settle();

        let (files, dirs) = purge_old(dir.path(), 0, constants::MAX_PURGE_FILES_PER_SWEEP);
        assert_eq!(files, 1);
        assert!(dirs >= 3, "month, year, and component dirs should go: {dirs}");
        assert!(!dir.path().join("comp").exists());
    }

    #[test]
    fn test_purge_respects_batch_limit() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            fs::write(dir.path().join(format!("f{i}.log")), "x").unwrap();
        }
        settle();
        let (files, _) = purge_old(dir.path(), 0, 2);
        assert_eq!(files, 2, "only the batch limit may be removed per sweep");
    }

    #[test]
    fn test_purge_ignores_non_log_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("keep.txt"), "x").unwrap();
        settle();
        let (files, _) = purge_old(dir.path(), 0, 100);
        assert_eq!(files, 0);
        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_purge_of_missing_base_is_a_noop() {
        assert_eq!(purge_old(Path::new("/no/such/base"), 0, 100), (0, 0));
    }
}
