// spotvault - core/journal.rs
//
// Line formatting and path layout for the rotating application journal.
// Core layer: pure functions over timestamps and paths — the writer,
// locking, and purge sweep live in app::journal.
//
// Journal files are bucketed by date:
//
//   <base>/<component>/<year>/<month>-<monthname>/<component>_<day>.log
//
// e.g. logs/spotvault/2024/06-June/spotvault_01.log

use crate::util::constants::JOURNAL_COMPONENT_WIDTH;
use chrono::{DateTime, Datelike, Local, NaiveDate};
use std::path::{Path, PathBuf};

// =============================================================================
// Levels
// =============================================================================

/// Journal severity levels, ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum JournalLevel {
    Debug,
    Information,
    Important,
    Warning,
    Error,
    Fatal,
}

impl JournalLevel {
    pub fn label(&self) -> &'static str {
        match self {
            JournalLevel::Debug => "Debug",
            JournalLevel::Information => "Information",
            JournalLevel::Important => "Important",
            JournalLevel::Warning => "Warning",
            JournalLevel::Error => "Error",
            JournalLevel::Fatal => "Fatal",
        }
    }

    /// Width of the longest label; levels are padded to this in log lines.
    pub fn pad_width() -> usize {
        "Information".len()
    }
}

impl std::fmt::Display for JournalLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Format one journal line:
/// `[2024-06-01 02:30:00.000 PM] spotvault  Information  message`
///
/// The component tag is right-padded and truncated to a fixed width so the
/// columns line up across entries from different components.
pub fn format_line(
    now: DateTime<Local>,
    component: &str,
    level: JournalLevel,
    message: &str,
) -> String {
    let mut tag = format!("{component:<JOURNAL_COMPONENT_WIDTH$}");
    tag.truncate(JOURNAL_COMPONENT_WIDTH);
    format!(
        "[{}] {} {:<width$} {}",
        now.format("%Y-%m-%d %I:%M:%S%.3f %p"),
        tag,
        level.label(),
        message,
        width = JournalLevel::pad_width(),
    )
}

// =============================================================================
// Path layout
// =============================================================================

/// Directory holding the journal files for `date`.
pub fn day_directory(base: &Path, component: &str, date: NaiveDate) -> PathBuf {
    base.join(component)
        .join(format!("{:04}", date.year()))
        .join(format!("{:02}-{}", date.month(), month_name(date.month())))
}

/// Full journal file path for `date`.
pub fn day_file_path(base: &Path, component: &str, date: NaiveDate) -> PathBuf {
    day_directory(base, component, date).join(format!("{component}_{:02}.log", date.day()))
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}
