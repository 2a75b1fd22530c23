//! Search term normalisation.

/// Term searched when the user query is empty.
pub const DEFAULT_SEARCH_TERM: &str = "Jurassic";

/// Returns the term to send upstream for `query`.
///
/// Leading and trailing whitespace is removed; an empty result falls back
/// to `default_term`.
#[must_use]
pub fn effective_term<'a>(query: &'a str, default_term: &'a str) -> &'a str {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        default_term.trim()
    } else {
        trimmed
    }
}
