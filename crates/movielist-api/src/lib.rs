//! Movie catalog client library for movielist.
//!
//! Provides the upstream catalog client and the paginated search
//! accumulator built on top of it.

/// Movie catalog API client.
pub mod catalog;

/// Paginated search result accumulation.
pub mod search;

