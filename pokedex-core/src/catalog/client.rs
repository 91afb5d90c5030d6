//! Catalog client trait and its HTTP implementation
//!
//! The trait allows swapping the network-backed client for an in-memory
//! catalog in tests. Every call is a single request: no caching, no
//! deduplication, no retry.

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use super::types::{Entity, ListingEntry, ListingPage};
use crate::config::AppConfig;
use crate::error::{CatalogError, FetchFailure};

/// Read-only access to the creature catalog
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch a single entity by name or numeric identifier
    ///
    /// The identifier is lower-cased before the request. Any failure is
    /// reported as [`CatalogError::NotFound`].
    async fn fetch_by_identifier(&self, identifier: &str) -> Result<Entity, CatalogError>;

    /// Fetch the first `limit` listing entries in API order
    async fn fetch_listing(&self, limit: usize) -> Result<Vec<ListingEntry>, CatalogError>;

    /// Dereference a detail URL taken from a listing entry
    async fn fetch_detail(&self, url: &str) -> Result<Entity, CatalogError>;

    /// Client identifier for logging
    fn name(&self) -> &'static str;
}

/// Catalog client talking to the HTTP API
pub struct HttpCatalogClient {
    client: reqwest::Client,
    api_base: Url,
}

impl HttpCatalogClient {
    /// Build a client from configuration
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        use anyhow::Context;

        let api_base = Url::parse(config.api_base.trim_end_matches('/'))
            .with_context(|| format!("Invalid API base URL: {}", config.api_base))?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(seconds));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, api_base })
    }

    /// `{API_BASE}/{identifier}` with the identifier as one encoded path segment
    fn identifier_url(&self, identifier: &str) -> Result<Url, FetchFailure> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchFailure::InvalidUrl(self.api_base.to_string()))?
            .pop_if_empty()
            .push(&identifier.to_lowercase());
        Ok(url)
    }

    /// `{API_BASE}?limit={limit}`
    fn listing_url(&self, limit: usize) -> Url {
        let mut url = self.api_base.clone();
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, FetchFailure> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            debug!("GET {} returned HTTP {}", url, status);
            return Err(FetchFailure::Status(status));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_by_identifier(&self, identifier: &str) -> Result<Entity, CatalogError> {
        let not_found = |source| CatalogError::NotFound {
            identifier: identifier.to_string(),
            source,
        };

        let url = self.identifier_url(identifier).map_err(not_found)?;
        self.get_json(url).await.map_err(not_found)
    }

    async fn fetch_listing(&self, limit: usize) -> Result<Vec<ListingEntry>, CatalogError> {
        let page: ListingPage = self
            .get_json(self.listing_url(limit))
            .await
            .map_err(|source| {
                warn!("Listing request failed: {}", source);
                CatalogError::Listing { limit, source }
            })?;

        debug!("Listing returned {} entries", page.results.len());
        Ok(page.results)
    }

    async fn fetch_detail(&self, url: &str) -> Result<Entity, CatalogError> {
        let detail_error = |source| CatalogError::DetailFetch {
            url: url.to_string(),
            source,
        };

        let parsed = Url::parse(url)
            .map_err(|_| detail_error(FetchFailure::InvalidUrl(url.to_string())))?;
        self.get_json(parsed).await.map_err(detail_error)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
