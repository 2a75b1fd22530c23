//! Movie catalog API client module.
//!
//! Handles HTTP requests to the upstream `movies/{term}` search and
//! `movie/{id}` detail endpoints.

mod api;
mod client;
mod spacer;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{CatalogClient, CatalogClientBuilder, DEFAULT_BASE_URL};
#[allow(clippy::module_name_repetitions)]
pub use types::{CatalogErrorResponse, MovieDetail, MovieSummary, PLACEHOLDER_POSTER_URL, SearchPage};
