//! Paginated search over the movie catalog.
//!
//! Turns a free-text query plus "load more" gestures into one growing
//! result list.

mod accumulator;
mod query;

pub use accumulator::{SearchEvent, SearchOutcome, SearchResultAccumulator};
pub use query::{DEFAULT_SEARCH_TERM, effective_term};
