//! Whole-file JSON persistence for the favorites collection.

use std::ffi::OsString;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};
use movielist_api::catalog::MovieSummary;
use tempfile::NamedTempFile;

/// Reads the persisted collection.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of movies.
pub(crate) fn read_collection(path: &Path) -> Result<Option<Vec<MovieSummary>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    let movies = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(movies))
}

/// Replaces `path` with `movies` serialized as one JSON array.
///
/// The data goes to a uniquely named hidden temp file in the same directory,
/// which is synced and then renamed over `path`. Concurrent writers never
/// share a temp file, so readers see one complete version or another.
///
/// # Errors
///
/// Returns an error if directory creation, the temp write, or the rename fails.
pub(crate) fn write_atomic(path: &Path, movies: &[MovieSummary]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create directory {}", parent.display()))?;

    let json = serde_json::to_vec_pretty(movies).context("failed to serialize favorites")?;
    let mut tmp = temp_file_in(parent, path)?;

    tmp.write_all(&json)
        .with_context(|| format!("failed to write {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("failed to sync {}", tmp.path().display()))?;

    // A failed persist drops the temp file, which removes it.
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    tracing::trace!(path = %path.display(), count = movies.len(), "favorites written");
    Ok(())
}

/// Creates `{dir}/.{file_name}.XXXXXX.tmp`, next to the target so the rename
/// stays on one filesystem.
fn temp_file_in(dir: &Path, target: &Path) -> Result<NamedTempFile> {
    let file_name = target
        .file_name()
        .with_context(|| format!("not a file path: {}", target.display()))?;
    let mut prefix = OsString::from(".");
    prefix.push(file_name);
    prefix.push(".");

    tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))
}
