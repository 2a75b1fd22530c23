//! `FavoritesStore` - durable, deduplicated list of favorite movies.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use movielist_api::catalog::MovieSummary;
use tokio::sync::broadcast;

use super::persist::{read_collection, write_atomic};

/// Capacity of the change-notification channel.
const EVENT_CAPACITY: usize = 64;

/// Result of [`FavoritesStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The movie was appended and persisted.
    Added,
    /// A movie with the same id is already stored; nothing changed.
    Duplicate,
}

/// Result of [`FavoritesStore::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The movie was not a favorite and has been added.
    Added,
    /// The movie was a favorite and has been removed.
    Removed,
}

/// Change notification published after the store state was updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesEvent {
    /// A movie was added.
    Added {
        /// Movie id.
        id: String,
    },
    /// A movie was removed.
    Removed {
        /// Movie id.
        id: String,
    },
    /// The collection was replaced from disk.
    Reloaded {
        /// Number of movies loaded.
        count: usize,
    },
}

/// Favorite movies, unique by id, persisted as one JSON array.
///
/// Every mutation writes the full next collection first and only swaps it
/// in after the write succeeded, so memory and disk never disagree.
/// Mutations take `&mut self`; share a store between tasks behind a mutex.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct FavoritesStore {
    path: PathBuf,
    movies: Vec<MovieSummary>,
    events: broadcast::Sender<FavoritesEvent>,
}

impl FavoritesStore {
    /// Opens the store at `path` and loads whatever is persisted there.
    ///
    /// A missing or unreadable file yields an empty store.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let mut store = Self {
            path: path.into(),
            movies: Vec::new(),
            events,
        };
        store.load();
        store
    }

    /// Replaces the in-memory collection with the persisted one.
    ///
    /// A missing file or content that is not a JSON array of movies keeps
    /// the current collection; the failure is logged, not returned.
    /// Repeated ids in the file keep their first occurrence.
    pub fn load(&mut self) {
        match read_collection(&self.path) {
            Ok(Some(movies)) => {
                self.movies = dedup_by_id(movies);
                tracing::debug!(
                    path = %self.path.display(),
                    count = self.movies.len(),
                    "favorites loaded"
                );
                let _ = self.events.send(FavoritesEvent::Reloaded {
                    count: self.movies.len(),
                });
            }
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "no favorites file");
            }
            Err(e) => {
                tracing::warn!(
                    error = %format!("{e:#}"),
                    "unable to load favorites, keeping current list"
                );
            }
        }
    }

    /// Adds `movie` unless its id is already stored.
    ///
    /// The stored copy is marked as favorite.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written; the store is
    /// then unchanged.
    pub fn add(&mut self, movie: MovieSummary) -> Result<AddOutcome> {
        if self.contains(&movie.id) {
            tracing::debug!(id = %movie.id, "already a favorite");
            return Ok(AddOutcome::Duplicate);
        }

        let id = movie.id.clone();
        let mut next = self.movies.clone();
        next.push(MovieSummary {
            is_favorite: Some(true),
            ..movie
        });
        self.commit(next)?;

        tracing::info!(id = %id, count = self.movies.len(), "favorite added");
        let _ = self.events.send(FavoritesEvent::Added { id });
        Ok(AddOutcome::Added)
    }

    /// Removes every entry with `id` and persists the result.
    ///
    /// Succeeds whether or not `id` was stored; the collection is written
    /// either way. Returns `true` if an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written; the store is
    /// then unchanged.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let next: Vec<MovieSummary> = self
            .movies
            .iter()
            .filter(|m| m.id != id)
            .cloned()
            .collect();
        let removed = next.len() < self.movies.len();
        self.commit(next)?;

        if removed {
            tracing::info!(id, count = self.movies.len(), "favorite removed");
            let _ = self.events.send(FavoritesEvent::Removed {
                id: String::from(id),
            });
        } else {
            tracing::debug!(id, "not a favorite, nothing removed");
        }
        Ok(removed)
    }

    /// Removes `movie` if stored, otherwise adds it.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written.
    pub fn toggle(&mut self, movie: MovieSummary) -> Result<ToggleOutcome> {
        if self.contains(&movie.id) {
            self.remove(&movie.id)?;
            Ok(ToggleOutcome::Removed)
        } else {
            self.add(movie)?;
            Ok(ToggleOutcome::Added)
        }
    }

    /// Whether a movie with `id` is stored.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }

    /// Stored movies in insertion order.
    #[must_use]
    pub fn list(&self) -> &[MovieSummary] {
        &self.movies
    }

    /// Number of stored movies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Sets `is_favorite` on each of `movies` from this store.
    pub fn annotate(&self, movies: &mut [MovieSummary]) {
        let ids: HashSet<&str> = self.movies.iter().map(|m| m.id.as_str()).collect();
        for movie in movies {
            movie.is_favorite = Some(ids.contains(movie.id.as_str()));
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesEvent> {
        self.events.subscribe()
    }

    /// Writes `next`, then makes it the current collection.
    fn commit(&mut self, next: Vec<MovieSummary>) -> Result<()> {
        write_atomic(&self.path, &next)
            .with_context(|| format!("failed to save favorites to {}", self.path.display()))?;
        self.movies = next;
        Ok(())
    }
}

/// Keeps the first movie for each id.
fn dedup_by_id(movies: Vec<MovieSummary>) -> Vec<MovieSummary> {
    let total = movies.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(total);
    let unique: Vec<MovieSummary> = movies
        .into_iter()
        .filter(|m| seen.insert(m.id.clone()))
        .collect();

    let dropped = total.saturating_sub(unique.len());
    if dropped > 0 {
        tracing::warn!(dropped, "favorites file contained repeated ids");
    }
    unique
}
