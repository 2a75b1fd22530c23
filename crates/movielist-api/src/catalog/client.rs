//! `CatalogClient` - movie catalog API client implementation.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::LocalCatalogApi;
use super::spacer::RequestSpacer;
use super::types::{CatalogErrorResponse, MovieDetail, SearchPage};

/// Default base URL of the movie catalog.
pub const DEFAULT_BASE_URL: &str = "https://flask-movie-app.herokuapp.com/";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default minimum interval between requests; the catalog is a small hosted
/// service and repeated "load more" gestures should not fire back to back.
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Movie catalog API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Request spacing.
    spacer: RequestSpacer,
}

/// Builder for `CatalogClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    min_interval: Option<Duration>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (config, or wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the per-request timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the minimum request interval (default: 100ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - The base URL cannot carry path segments (e.g. `mailto:`).
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CatalogClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?
        };
        if base_url.cannot_be_a_base() {
            bail!("base URL cannot carry a path: {base_url}");
        }

        let spacer = RequestSpacer::new(self.min_interval.unwrap_or(DEFAULT_MIN_INTERVAL));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(CatalogClient {
            http_client,
            base_url,
            spacer,
        })
    }
}

impl CatalogClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET request with query params and request spacing.
    ///
    /// Upstream error bodies (`{"Error": "..."}`) are surfaced as the error
    /// message, both on non-2xx statuses and on 2xx bodies that do not match `T`.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.spacer.pace().await;

        let request = self
            .http_client
            .get(url.clone())
            .query(query)
            .build()
            .with_context(|| format!("failed to build request: {url}"))?;

        tracing::debug!(url = %request.url(), "catalog API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {url}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {url}"))?;

        if !status.is_success() {
            if let Ok(error_response) = serde_json::from_str::<CatalogErrorResponse>(&body) {
                bail!(
                    "catalog API error (HTTP {status}): {}",
                    error_response.error
                );
            }
            bail!("catalog API error (HTTP {status}): {body}");
        }

        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                if let Ok(error_response) = serde_json::from_str::<CatalogErrorResponse>(&body) {
                    bail!("catalog API error: {}", error_response.error);
                }
                Err(e).with_context(|| format!("failed to decode JSON response: {url}"))
            }
        }
    }
}

impl LocalCatalogApi for CatalogClient {
    #[instrument(skip_all, fields(term = %term, page = page))]
    async fn search_movies(&self, term: &str, page: u32) -> Result<SearchPage> {
        if term.is_empty() {
            bail!("search term must not be empty");
        }
        let url = self.endpoint(&["movies", term])?;
        let query = [("page", page.to_string())];
        self.get_json(url, &query).await
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn movie_detail(&self, id: &str) -> Result<MovieDetail> {
        if id.is_empty() {
            bail!("movie id must not be empty");
        }
        let url = self.endpoint(&["movie", id])?;
        self.get_json(url, &[]).await
    }
}
