//! Local favorites storage for movielist.
//!
//! Keeps the user's favorite movies in a single JSON file that is
//! rewritten atomically after every change.

/// Favorites collection and change notifications.
pub mod favorites;
mod paths;
mod persist;

use std::path::PathBuf;

use anyhow::{Context, Result};

#[allow(clippy::module_name_repetitions)]
pub use favorites::{AddOutcome, FavoritesEvent, FavoritesStore, ToggleOutcome};
pub use paths::{BaseDir, FAVORITES_FILE_NAME, resolve_app_file, resolve_favorites_path};

/// Opens the favorites store in `dir` (or the default data directory).
///
/// # Errors
///
/// Returns an error if the data path cannot be resolved.
pub fn open_favorites(dir: Option<&PathBuf>) -> Result<FavoritesStore> {
    let path = resolve_favorites_path(dir).context("failed to resolve favorites path")?;
    Ok(FavoritesStore::open(path))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_open_favorites_in_temp_dir() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_path_buf();

        // Act
        let store = open_favorites(Some(&dir_path)).unwrap();

        // Assert
        assert!(store.is_empty());
        assert_eq!(store.path(), dir_path.join(FAVORITES_FILE_NAME));
    }
}
