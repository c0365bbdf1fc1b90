// spotvault - main.rs
//
// CLI entry point. Handles:
// 1. Argument parsing
// 2. Diagnostic logging initialisation (debug mode support)
// 3. Config and settings loading
// 4. Command dispatch against the library crate

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use spotvault::app::{exporter, gallery, journal, profile_mgr, settings_mgr};
use spotvault::core::export;
use spotvault::core::journal::JournalLevel;
use spotvault::core::model::{truncate_mesial, CachedImage};
use spotvault::core::profile::Profile;
use spotvault::core::settings::Settings;
use spotvault::platform::{config, fs as platform_fs, wallpaper};
use spotvault::util::constants;
use spotvault::util::error::{GalleryError, Result, SpotvaultError};

/// Manage the OS lock-screen/Spotlight image cache: list, save, copy,
/// delete, or apply an image as the desktop wallpaper.
#[derive(Debug, Parser)]
#[command(name = constants::APP_NAME, version, about)]
struct Cli {
    /// Enable debug diagnostics on stderr.
    #[arg(long, global = true)]
    debug: bool,

    /// Override the lock-screen cache directory.
    #[arg(long, global = true, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the cached images, newest first.
    List {
        /// Include files whose header matches no known image signature.
        #[arg(long)]
        all: bool,

        /// Output format.
        #[arg(long, value_enum, default_value = "table")]
        format: ListFormat,

        /// Write the listing to a file instead of stdout.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Save one image to a chosen path.
    Save {
        /// Image index from `list`.
        index: usize,

        /// Destination path; the sniffed extension is appended when missing.
        #[arg(long, value_name = "PATH")]
        to: PathBuf,
    },

    /// Copy every listed image into a folder.
    Export {
        /// Destination folder (default: ./ImageCopy).
        #[arg(long, value_name = "DIR")]
        to: Option<PathBuf>,
    },

    /// Delete one image from the cache.
    Delete {
        /// Image index from `list`.
        index: usize,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        force: bool,
    },

    /// Set one image as the desktop wallpaper.
    Wallpaper {
        /// Image index from `list`.
        index: usize,
    },

    /// Reveal an image (or the cache folder) in the system file manager.
    Reveal {
        /// Image index from `list`; omit to reveal the cache folder itself.
        index: Option<usize>,
    },

    /// Inspect or update the stored profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Run a journal purge sweep immediately.
    PurgeLogs,

    /// Print the resolved platform paths.
    Paths,
}

#[derive(Debug, Subcommand)]
enum ProfileAction {
    /// Print the profile with sealed fields opened.
    Show,

    /// Update one profile field and re-save the store.
    Set {
        field: ProfileField,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileField {
    Title,
    ApiKey,
    LastCount,
    LastUse,
    PositionX,
    PositionY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListFormat {
    Table,
    Csv,
    Json,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let paths = config::PlatformPaths::resolve();
    let (app_config, config_warnings) = config::load_config(&paths.config_dir);

    spotvault::util::logging::init(cli.debug, app_config.log_level.as_deref());
    for warning in &config_warnings {
        eprintln!("Warning: {warning}");
    }

    match run(&cli, &paths, &app_config) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, paths: &config::PlatformPaths, app_config: &config::AppConfig) -> Result<()> {
    let journal = journal::Journal::new(
        journal::resolve_base(app_config.journal_dir.as_deref(), &paths.data_dir),
        constants::JOURNAL_COMPONENT,
        app_config.retention_days,
    );

    match &cli.command {
        Command::List {
            all,
            format,
            output,
        } => {
            let (images, cache_dir) = scan(cli, app_config, *all)?;
            report_listing(&images, *format, output.as_deref())?;
            record_scan(&images, paths, &journal);
            tracing::debug!(cache = %cache_dir.display(), "Listing complete");
            Ok(())
        }

        Command::Save { index, to } => {
            let (images, _) = scan(cli, app_config, false)?;
            let image = gallery::select(&images, *index)?;
            let written = exporter::save_one(image, to)?;
            journal.write(
                JournalLevel::Information,
                &format!("Saved {} to {}", image.name(), written.display()),
            );
            println!("Saved to {}", written.display());
            Ok(())
        }

        Command::Export { to } => {
            let dest = to
                .clone()
                .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_EXPORT_DIR_NAME));
            let (images, _) = scan(cli, app_config, false)?;
            let outcome = exporter::copy_all(&images, &dest)?;
            for warning in &outcome.warnings {
                eprintln!("Warning: {warning}");
            }
            journal.write(
                JournalLevel::Information,
                &format!("Copied {} images to {}", outcome.copied, dest.display()),
            );
            println!("Copied {} images to {}", outcome.copied, dest.display());
            Ok(())
        }

        Command::Delete { index, force } => {
            let (images, _) = scan(cli, app_config, true)?;
            let image = gallery::select(&images, *index)?;
            if !*force && !confirm(&format!("Delete '{}' from the cache?", image.name()))? {
                journal.write(JournalLevel::Information, "Delete was canceled by user.");
                println!("Canceled.");
                return Ok(());
            }
            exporter::delete_one(image)?;
            journal.write(
                JournalLevel::Important,
                &format!("Deleted cache entry {}", image.name()),
            );
            println!("Deleted {}", image.path.display());
            Ok(())
        }

        Command::Wallpaper { index } => {
            let (images, _) = scan(cli, app_config, false)?;
            let image = gallery::select(&images, *index)?;
            wallpaper::set_wallpaper(&image.path)?;
            journal.write(
                JournalLevel::Information,
                &format!("Wallpaper set to {}", image.name()),
            );
            println!("Wallpaper set to {}", image.path.display());
            Ok(())
        }

        Command::Reveal { index } => {
            match index {
                Some(index) => {
                    let (images, _) = scan(cli, app_config, true)?;
                    let image = gallery::select(&images, *index)?;
                    platform_fs::reveal_in_file_manager(&image.path);
                }
                None => {
                    let cache_dir = resolve_cache_dir(cli, app_config)?;
                    platform_fs::reveal_in_file_manager(&cache_dir);
                }
            }
            Ok(())
        }

        Command::Profile { action } => run_profile(action, paths),

        Command::PurgeLogs => {
            let (files, dirs) = journal.purge_now();
            journal.write(
                JournalLevel::Information,
                &format!("Manual purge removed {files} files and {dirs} empty directories."),
            );
            println!("Removed {files} files and {dirs} empty directories.");
            Ok(())
        }

        Command::Paths => {
            println!("config dir:    {}", paths.config_dir.display());
            println!("data dir:      {}", paths.data_dir.display());
            println!("settings file: {}", paths.settings_file().display());
            println!("profile file:  {}", paths.profile_file().display());
            println!(
                "journal base:  {}",
                journal::resolve_base(app_config.journal_dir.as_deref(), &paths.data_dir)
                    .display()
            );
            match resolve_cache_dir(cli, app_config) {
                Ok(dir) => println!("image cache:   {}", dir.display()),
                Err(_) => println!("image cache:   <not configured>"),
            }
            Ok(())
        }
    }
}

// =============================================================================
// Command helpers
// =============================================================================

/// Cache directory priority: CLI flag > config override > platform default.
fn resolve_cache_dir(cli: &Cli, app_config: &config::AppConfig) -> Result<PathBuf> {
    cli.cache_dir
        .clone()
        .or_else(|| app_config.cache_dir.clone())
        .or_else(config::default_cache_dir)
        .ok_or_else(|| GalleryError::NoCacheDir.into())
}

fn scan(
    cli: &Cli,
    app_config: &config::AppConfig,
    include_unknown: bool,
) -> Result<(Vec<CachedImage>, PathBuf)> {
    let cache_dir = resolve_cache_dir(cli, app_config)?;
    let scan_config = gallery::ScanConfig {
        min_bytes: app_config.min_image_bytes,
        max_depth: app_config.max_depth,
        include_unknown,
        ..Default::default()
    };
    let (images, warnings) = gallery::scan_cache(&cache_dir, &scan_config)?;
    for warning in &warnings {
        eprintln!("Warning: {warning}");
    }
    Ok((images, cache_dir))
}

fn report_listing(
    images: &[CachedImage],
    format: ListFormat,
    output: Option<&Path>,
) -> Result<()> {
    match (format, output) {
        (ListFormat::Table, _) => {
            if images.is_empty() {
                println!("No cached images found.");
                return Ok(());
            }
            println!(
                "{:>4}  {:<8} {:>11}  {:>8}  {:<20} {}",
                "#", "kind", "dimensions", "size", "modified", "name"
            );
            for (index, image) in images.iter().enumerate() {
                let dims = image
                    .dimensions
                    .map(|(w, h)| format!("{w}x{h}"))
                    .unwrap_or_else(|| "-".to_string());
                let modified = image
                    .modified
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{index:>4}  {:<8} {dims:>11}  {:>8}  {modified:<20} {}",
                    image.kind.label(),
                    image.human_size(),
                    truncate_mesial(&image.name(), 44, "…"),
                );
            }
            Ok(())
        }
        (ListFormat::Csv, None) => {
            let stdout = std::io::stdout();
            export::inventory_csv(images, stdout.lock(), Path::new("<stdout>"))?;
            Ok(())
        }
        (ListFormat::Csv, Some(path)) => {
            let count = exporter::write_inventory_csv(images, path)?;
            println!("Wrote {count} rows to {}", path.display());
            Ok(())
        }
        (ListFormat::Json, None) => {
            let stdout = std::io::stdout();
            export::inventory_json(images, stdout.lock(), Path::new("<stdout>"))?;
            println!();
            Ok(())
        }
        (ListFormat::Json, Some(path)) => {
            let count = exporter::write_inventory_json(images, path)?;
            println!("Wrote {count} entries to {}", path.display());
            Ok(())
        }
    }
}

/// Update the session bookkeeping fields after a successful scan.
///
/// Settings failures must never break a listing, so they are logged and
/// swallowed here.
fn record_scan(images: &[CachedImage], paths: &config::PlatformPaths, journal: &journal::Journal) {
    let settings_path = paths.settings_file();
    let mut settings = Settings::default();

    match settings_mgr::load(&mut settings, &settings_path, constants::SETTINGS_VERSION) {
        Ok(populated) => {
            if settings.first_run && !populated {
                journal.write(JournalLevel::Information, "First run detected.");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Settings load failed; continuing with defaults");
        }
    }

    settings.first_run = false;
    settings.last_count = images.len() as i32;
    settings.last_use = chrono::Utc::now();

    if let Err(e) = settings_mgr::save(&settings, &settings_path, constants::SETTINGS_VERSION) {
        tracing::warn!(error = %e, "Settings save failed");
    }
    journal.write(
        JournalLevel::Information,
        &format!("Listed {} cached images.", images.len()),
    );
}

fn run_profile(action: &ProfileAction, paths: &config::PlatformPaths) -> Result<()> {
    let profile_path = paths.profile_file();

    match action {
        ProfileAction::Show => {
            let profile = profile_mgr::load(&profile_path, &paths.data_dir)?;
            println!("Title:      {}", profile.title);
            println!("APIKey:     {}", profile.api_key);
            println!("LastCount:  {}", profile.last_count);
            println!("LastUse:    {}", profile.last_use);
            println!("PositionX:  {}", profile.position_x);
            println!("PositionY:  {}", profile.position_y);
            Ok(())
        }
        ProfileAction::Set { field, value } => {
            let mut profile = profile_mgr::load(&profile_path, &paths.data_dir)?;
            apply_profile_field(&mut profile, *field, value);
            profile_mgr::save(&profile, &profile_path, &paths.data_dir)?;
            println!("Profile updated.");
            Ok(())
        }
    }
}

fn apply_profile_field(profile: &mut Profile, field: ProfileField, value: &str) {
    let slot = match field {
        ProfileField::Title => &mut profile.title,
        ProfileField::ApiKey => &mut profile.api_key,
        ProfileField::LastCount => &mut profile.last_count,
        ProfileField::LastUse => &mut profile.last_use,
        ProfileField::PositionX => &mut profile.position_x,
        ProfileField::PositionY => &mut profile.position_y,
    };
    *slot = value.to_string();
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush().map_err(|source| SpotvaultError::Io {
        path: PathBuf::from("<stdout>"),
        operation: "flush",
        source,
    })?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .map_err(|source| SpotvaultError::Io {
            path: PathBuf::from("<stdin>"),
            operation: "read",
            source,
        })?;

    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
