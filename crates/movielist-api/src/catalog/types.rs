//! Movie catalog response types.

use serde::{Deserialize, Deserializer, Serialize};

/// Image shown when the upstream has no poster for a movie.
pub const PLACEHOLDER_POSTER_URL: &str = "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTChQdlYiED1Ot1XBsYrExnQlEPnuU55oXFXA&usqp=CAU";

/// Poster value the upstream uses for "no poster".
const NO_POSTER: &str = "N/A";

/// Returns the poster URL, or the placeholder if the upstream has none.
fn poster_or_placeholder(poster_url: &str) -> &str {
    let trimmed = poster_url.trim();
    if trimmed.is_empty() || trimmed == NO_POSTER {
        PLACEHOLDER_POSTER_URL
    } else {
        poster_url
    }
}

// --- Search ---

/// A single movie in a search page or in the favorites file.
///
/// Field names on the wire follow the upstream (`imdbID`, `Title`, ...).
/// Equality is structural; identity across collections is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// External identifier (IMDb ID, e.g. `tt0107290`).
    #[serde(rename = "imdbID")]
    pub id: String,
    /// Movie title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year as reported upstream (may be a range such as `2020–2022`).
    #[serde(rename = "Year")]
    pub year: String,
    /// Poster image URL, or `N/A`.
    #[serde(rename = "Poster")]
    pub poster_url: String,
    /// Favorite flag, present once the movie has been seen by the favorites store.
    #[serde(rename = "isFav", default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl MovieSummary {
    /// Creates a summary with no favorite flag.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        year: impl Into<String>,
        poster_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year: year.into(),
            poster_url: poster_url.into(),
            is_favorite: None,
        }
    }

    /// Poster URL to display, falling back to [`PLACEHOLDER_POSTER_URL`].
    #[must_use]
    pub fn poster_or_placeholder(&self) -> &str {
        poster_or_placeholder(&self.poster_url)
    }

    /// Returns `true` only when the flag is explicitly set.
    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.is_favorite.unwrap_or(false)
    }
}

/// Response from the `movies/{term}` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    /// Movies on this page.
    #[serde(rename = "Search")]
    pub movies: Vec<MovieSummary>,
    /// Total number of results for the query (all pages).
    #[serde(rename = "totalResults", deserialize_with = "de_total_results")]
    pub total_results: u32,
}

/// `totalResults` arrives string-encoded; a plain number is accepted too.
fn de_total_results<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u32),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid totalResults: {s:?}"))),
    }
}

// --- Detail ---

/// Response from the `movie/{id}` endpoint.
///
/// Identifying fields are required; descriptive fields default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieDetail {
    /// External identifier.
    #[serde(rename = "imdbID")]
    pub id: String,
    /// Movie title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year.
    #[serde(rename = "Year")]
    pub year: String,
    /// Poster image URL, or `N/A`.
    #[serde(rename = "Poster")]
    pub poster_url: String,
    /// Plot synopsis.
    #[serde(rename = "Plot", default)]
    pub plot: String,
    /// Content rating (e.g. `PG-13`).
    #[serde(rename = "Rated", default)]
    pub rated: String,
    /// Release date.
    #[serde(rename = "Released", default)]
    pub released: String,
    /// Runtime (e.g. `127 min`).
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    /// Comma-separated genres.
    #[serde(rename = "Genre", default)]
    pub genre: String,
    /// Director(s).
    #[serde(rename = "Director", default)]
    pub director: String,
    /// Writer(s).
    #[serde(rename = "Writer", default)]
    pub writer: String,
    /// Main cast.
    #[serde(rename = "Actors", default)]
    pub actors: String,
    /// Spoken languages.
    #[serde(rename = "Language", default)]
    pub language: String,
    /// Production countries.
    #[serde(rename = "Country", default)]
    pub country: String,
    /// Awards summary.
    #[serde(rename = "Awards", default)]
    pub awards: String,
    /// Metascore.
    #[serde(rename = "Metascore", default)]
    pub metascore: String,
    /// IMDb rating.
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    /// IMDb vote count.
    #[serde(rename = "imdbVotes", default)]
    pub imdb_votes: String,
    /// Production company.
    #[serde(rename = "Production", default)]
    pub production: String,
    /// Official website.
    #[serde(rename = "Website", default)]
    pub website: String,
}

impl MovieDetail {
    /// Poster URL to display, falling back to [`PLACEHOLDER_POSTER_URL`].
    #[must_use]
    pub fn poster_or_placeholder(&self) -> &str {
        poster_or_placeholder(&self.poster_url)
    }

    /// Builds the summary stored as a favorite.
    #[must_use]
    pub fn to_summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            poster_url: self.poster_url.clone(),
            is_favorite: Some(true),
        }
    }
}

// --- Error ---

/// Error body returned by the upstream (`{"Response":"False","Error":"..."}`).
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogErrorResponse {
    /// Error message.
    #[serde(rename = "Error")]
    pub error: String,
}
