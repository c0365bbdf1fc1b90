// spotvault - platform/wallpaper.rs
//
// Apply an image as the desktop wallpaper through the platform's own
// mechanism, spawned as a short-lived helper process.
//
// Platform behaviour:
// - **Windows**: write the Wallpaper value in the user's Control Panel
//   registry key, then poke the per-user system parameters so the desktop
//   repaints without a logoff.
// - **macOS**: AppleScript via `osascript` telling Finder to change the
//   desktop picture.
// - **Linux**: `gsettings` against the GNOME desktop schema; other desktops
//   are reported as unsupported rather than guessed at.

use crate::util::error::WallpaperError;
use std::path::Path;
use std::process::Command;

/// Set `path` as the desktop wallpaper. The image must already exist;
/// callers pass paths straight out of the scanned inventory.
pub fn set_wallpaper(path: &Path) -> Result<(), WallpaperError> {
    tracing::info!(image = %path.display(), "Setting desktop wallpaper");
    set_wallpaper_impl(path)
}

fn run(program: &'static str, args: &[&str]) -> Result<(), WallpaperError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| WallpaperError::Launch { program, source })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(WallpaperError::CommandFailed {
            program,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(target_os = "windows")]
fn set_wallpaper_impl(path: &Path) -> Result<(), WallpaperError> {
    let image = path.display().to_string();
    run(
        "reg",
        &[
            "add",
            r"HKCU\Control Panel\Desktop",
            "/v",
            "Wallpaper",
            "/t",
            "REG_SZ",
            "/d",
            &image,
            "/f",
        ],
    )?;
    run(
        "rundll32",
        &["user32.dll,UpdatePerUserSystemParameters", "1", "True"],
    )
}

#[cfg(target_os = "macos")]
fn set_wallpaper_impl(path: &Path) -> Result<(), WallpaperError> {
    let script = format!(
        "tell application \"Finder\" to set desktop picture to POSIX file \"{}\"",
        path.display()
    );
    run("osascript", &["-e", &script])
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn set_wallpaper_impl(path: &Path) -> Result<(), WallpaperError> {
    let uri = format!("file://{}", path.display());
    // GNOME tracks light and dark wallpapers separately; set both so the
    // change is visible regardless of the active colour scheme.
    run(
        "gsettings",
        &[
            "set",
            "org.gnome.desktop.background",
            "picture-uri",
            &uri,
        ],
    )?;
    run(
        "gsettings",
        &[
            "set",
            "org.gnome.desktop.background",
            "picture-uri-dark",
            &uri,
        ],
    )
}
