//! `SearchResultAccumulator` - merges successive search pages into one list.

use anyhow::{Context, Result, bail};
use tokio::sync::broadcast;
use tracing::instrument;

use super::query::{DEFAULT_SEARCH_TERM, effective_term};
use crate::catalog::{LocalCatalogApi, MovieSummary};

/// Capacity of the change-notification channel.
const EVENT_CAPACITY: usize = 64;

/// Change notification published after the accumulator state was updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// Results were cleared for a new query.
    Reset {
        /// Trimmed query (may be empty).
        query: String,
    },
    /// A page was applied to `items`.
    PageApplied {
        /// Page number that was applied.
        page: u32,
        /// Number of movies on that page.
        fetched: usize,
        /// Upstream total for the query.
        total_available: u32,
    },
    /// A fetch failed; state is unchanged.
    FetchFailed {
        /// Page number that was requested.
        page: u32,
        /// Human-readable cause.
        cause: String,
    },
}

/// Result of a successful `search`, `load_more` or `reset` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A page was fetched and applied.
    Loaded {
        /// Page number that was applied.
        page: u32,
        /// Number of movies on that page.
        fetched: usize,
    },
    /// Every result is already loaded; nothing was requested.
    Exhausted,
}

/// Accumulates paginated search results for one query session.
///
/// Page 1 replaces the list, later pages append to it. Duplicates across
/// pages are kept as delivered. State is only touched after a response has
/// been decoded, so a failed or dropped request leaves it as it was.
/// Mutating calls take `&mut self`, which serializes page appends for an
/// instance.
#[derive(Debug)]
pub struct SearchResultAccumulator<A> {
    api: A,
    default_term: String,
    query: String,
    page: u32,
    items: Vec<MovieSummary>,
    total_available: u32,
    has_initialized: bool,
    /// Set when the upstream returned an empty page.
    reached_end: bool,
    events: broadcast::Sender<SearchEvent>,
}

impl<A: LocalCatalogApi> SearchResultAccumulator<A> {
    /// Creates an empty accumulator using [`DEFAULT_SEARCH_TERM`].
    #[must_use]
    pub fn new(api: A) -> Self {
        Self::with_default_term(api, DEFAULT_SEARCH_TERM)
    }

    /// Creates an empty accumulator with a custom default term.
    #[must_use]
    pub fn with_default_term(api: A, default_term: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            default_term: default_term.into(),
            query: String::new(),
            page: 1,
            items: Vec::new(),
            total_available: 0,
            has_initialized: false,
            reached_end: false,
            events,
        }
    }

    /// The catalog this accumulator queries.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Current query as entered (trimmed, possibly empty).
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Term actually sent upstream for the current query.
    #[must_use]
    pub fn term(&self) -> &str {
        effective_term(&self.query, &self.default_term)
    }

    /// Last applied page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Accumulated results in arrival order.
    #[must_use]
    pub fn items(&self) -> &[MovieSummary] {
        &self.items
    }

    /// Upstream total for the current query.
    #[must_use]
    pub const fn total_available(&self) -> u32 {
        self.total_available
    }

    /// Whether any response has been applied yet.
    #[must_use]
    pub const fn has_initialized(&self) -> bool {
        self.has_initialized
    }

    /// Whether the upstream reports more results than are loaded.
    ///
    /// An empty page ends the session even if `total_available` claims
    /// otherwise, so an over-reported total cannot page forever.
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.reached_end
            && usize::try_from(self.total_available).map_or(true, |total| total > self.items.len())
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    /// Fetches `page` of `query` and applies it.
    ///
    /// Page 1 replaces `items`; later pages append. `total_available` is
    /// overwritten with the upstream total.
    ///
    /// # Errors
    ///
    /// Returns an error if `page` is 0, or if the request or decoding fails.
    /// In that case `items` and `total_available` are unchanged.
    #[instrument(skip_all, fields(page = page))]
    pub async fn search(&mut self, query: &str, page: u32) -> Result<SearchOutcome> {
        if page == 0 {
            bail!("page numbering starts at 1");
        }

        let query = query.trim();
        let term = effective_term(query, &self.default_term);

        let result = self
            .api
            .search_movies(term, page)
            .await
            .with_context(|| format!("failed to fetch search page {page} for {term:?}"));

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let cause = format!("{e:#}");
                tracing::warn!(page, term, %cause, "search fetch failed");
                let _ = self.events.send(SearchEvent::FetchFailed { page, cause });
                return Err(e);
            }
        };

        let fetched = response.movies.len();
        if page == 1 {
            self.items = response.movies;
        } else {
            self.items.extend(response.movies);
        }
        self.total_available = response.total_results;
        self.query = String::from(query);
        self.page = page;
        self.has_initialized = true;
        self.reached_end = fetched == 0;

        tracing::debug!(
            page,
            fetched,
            loaded = self.items.len(),
            total_available = self.total_available,
            "search page applied"
        );

        let _ = self.events.send(SearchEvent::PageApplied {
            page,
            fetched,
            total_available: self.total_available,
        });

        Ok(SearchOutcome::Loaded { page, fetched })
    }

    /// Fetches the next page of the current query.
    ///
    /// Returns [`SearchOutcome::Exhausted`] without a request when every
    /// result is already loaded. The page counter only advances when the
    /// page is applied, so a failed call can be retried as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn load_more(&mut self) -> Result<SearchOutcome> {
        if !self.has_more() {
            tracing::debug!(
                loaded = self.items.len(),
                total_available = self.total_available,
                "all results loaded"
            );
            return Ok(SearchOutcome::Exhausted);
        }

        let next = self.page.checked_add(1).context("page counter overflow")?;
        let query = self.query.clone();
        self.search(&query, next).await
    }

    /// Starts a new query session and fetches its first page.
    ///
    /// `items` and `total_available` are cleared before the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails; the list then
    /// stays empty.
    pub async fn reset(&mut self, new_query: &str) -> Result<SearchOutcome> {
        self.query = String::from(new_query.trim());
        self.page = 1;
        self.items.clear();
        self.total_available = 0;
        self.reached_end = false;

        let _ = self.events.send(SearchEvent::Reset {
            query: self.query.clone(),
        });

        let query = self.query.clone();
        self.search(&query, 1).await
    }
}
