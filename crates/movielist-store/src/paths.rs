//! Per-user file locations.
//!
//! Favorites live under the data directory and the CLI config under the
//! config directory. An explicit `--dir` puts both files side by side.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// File name of the persisted favorites collection.
pub const FAVORITES_FILE_NAME: &str = "favorites.json";

/// Application directory name below the per-user base directories.
const APP_DIR_NAME: &str = "movielist";

/// Per-user base directory a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseDir {
    /// `$XDG_CONFIG_HOME`, else `~/.config`.
    Config,
    /// `$XDG_DATA_HOME`, else `~/.local/share`.
    Data,
}

impl BaseDir {
    const fn env_var(self) -> &'static str {
        match self {
            Self::Config => "XDG_CONFIG_HOME",
            Self::Data => "XDG_DATA_HOME",
        }
    }

    const fn home_relative(self) -> &'static str {
        match self {
            Self::Config => ".config",
            Self::Data => ".local/share",
        }
    }
}

/// Resolves `file_name` for this application.
///
/// - If `dir` is `Some`, returns `{dir}/{file_name}`.
/// - Otherwise returns `{base}/movielist/{file_name}`, where `base` comes from
///   the XDG variable of `base_dir` or falls back below `$HOME`.
///
/// # Errors
///
/// Returns an error if `dir` is `None` and neither an absolute XDG directory
/// nor `HOME` is available.
pub fn resolve_app_file(
    dir: Option<&Path>,
    base_dir: BaseDir,
    file_name: &str,
) -> Result<PathBuf> {
    resolve_with_env(dir, base_dir, file_name, |key| std::env::var_os(key))
}

/// Resolves the favorites file path (`favorites.json` in the data directory).
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn resolve_favorites_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    resolve_app_file(dir.map(PathBuf::as_path), BaseDir::Data, FAVORITES_FILE_NAME)
}

fn resolve_with_env(
    dir: Option<&Path>,
    base_dir: BaseDir,
    file_name: &str,
    env: impl Fn(&str) -> Option<OsString>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(file_name));
    }

    // Relative XDG paths are invalid and ignored.
    let base = match env(base_dir.env_var()).map(PathBuf::from) {
        Some(xdg) if xdg.is_absolute() => xdg,
        _ => match env("HOME").filter(|home| !home.is_empty()) {
            Some(home) => PathBuf::from(home).join(base_dir.home_relative()),
            None => bail!("HOME environment variable is not set"),
        },
    };

    Ok(base.join(APP_DIR_NAME).join(file_name))
}
