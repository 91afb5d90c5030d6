//! Search resolution
//!
//! Two phases: an exact lookup by identifier, then (only if that fails) a
//! substring scan over a bounded listing window whose matches are hydrated
//! concurrently. The outcome is a tagged [`Resolution`] rather than an error
//! path, so callers decide what to render and what to persist.

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::catalog::{CatalogClient, Entity, ListingEntry};
use crate::config::AppConfig;
use crate::error::CatalogError;

/// A trimmed, lower-cased, non-empty query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Normalize raw input. Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unanchored, case-insensitive substring match against an entity name
    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.0)
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of resolving one query
#[derive(Debug)]
pub enum Resolution {
    /// The query was empty; show the default listing instead
    DefaultListing,
    /// The identifier lookup succeeded
    Exact(Entity),
    /// Substring matches from the listing window, hydrated, in listing order
    Fallback(Vec<Entity>),
    /// Resolution failed; the error carries the user-facing message
    Failed(CatalogError),
}

impl Resolution {
    /// Entities to render, or the failure
    ///
    /// `None` for `DefaultListing`: nothing is resolved until the caller
    /// fetches the default listing itself.
    pub fn into_entities(self) -> Option<Result<Vec<Entity>, CatalogError>> {
        match self {
            Resolution::DefaultListing => None,
            Resolution::Exact(entity) => Some(Ok(vec![entity])),
            Resolution::Fallback(entities) => Some(Ok(entities)),
            Resolution::Failed(err) => Some(Err(err)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resolution::Exact(_) | Resolution::Fallback(_))
    }
}

/// Size limits used by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub default_count: usize,
    pub search_window: usize,
    pub fallback_cap: usize,
}

impl From<&AppConfig> for SearchLimits {
    fn from(config: &AppConfig) -> Self {
        Self {
            default_count: config.default_count,
            search_window: config.search_window,
            fallback_cap: config.fallback_cap,
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits::from(&AppConfig::default())
    }
}

/// Runs the exact-then-fallback policy against a catalog client
pub struct SearchResolver<'a> {
    client: &'a dyn CatalogClient,
    limits: SearchLimits,
}

impl<'a> SearchResolver<'a> {
    pub fn new(client: &'a dyn CatalogClient, limits: SearchLimits) -> Self {
        Self { client, limits }
    }

    /// Resolve raw user input
    pub async fn resolve(&self, raw: &str) -> Resolution {
        match SearchQuery::parse(raw) {
            Some(query) => self.resolve_query(&query).await,
            None => Resolution::DefaultListing,
        }
    }

    /// Resolve an already-normalized query
    pub async fn resolve_query(&self, query: &SearchQuery) -> Resolution {
        match self.client.fetch_by_identifier(query.as_str()).await {
            Ok(entity) => {
                info!("Exact match for '{}': #{} {}", query, entity.id, entity.name);
                return Resolution::Exact(entity);
            }
            Err(e) => {
                debug!("No exact match for '{}', trying substring search: {}", query, e);
            }
        }

        match self.fallback(query).await {
            Ok(entities) => Resolution::Fallback(entities),
            Err(e) => {
                info!("Search for '{}' failed: {}", query, e);
                Resolution::Failed(e)
            }
        }
    }

    async fn fallback(&self, query: &SearchQuery) -> Result<Vec<Entity>, CatalogError> {
        let listing = self.client.fetch_listing(self.limits.search_window).await?;

        let matches: Vec<ListingEntry> = listing
            .into_iter()
            .filter(|entry| query.matches(&entry.name))
            .collect();

        if matches.is_empty() {
            return Err(CatalogError::NoMatch {
                query: query.to_string(),
            });
        }

        if matches.len() > self.limits.fallback_cap {
            debug!(
                "'{}' matched {} entries, hydrating the first {}",
                query,
                matches.len(),
                self.limits.fallback_cap
            );
        }

        let capped: Vec<ListingEntry> = matches
            .into_iter()
            .take(self.limits.fallback_cap)
            .collect();

        self.hydrate(&capped).await
    }

    /// Unfiltered listing of `default_count` entries, hydrated
    pub async fn default_listing(&self) -> Result<Vec<Entity>, CatalogError> {
        let listing = self
            .client
            .fetch_listing(self.limits.default_count)
            .await
            .map_err(CatalogError::default_listing)?;

        self.hydrate(&listing)
            .await
            .map_err(CatalogError::default_listing)
    }

    /// Fetch every entry's detail concurrently; any failure fails the whole batch
    async fn hydrate(&self, entries: &[ListingEntry]) -> Result<Vec<Entity>, CatalogError> {
        debug!(
            "Hydrating {} entries via {} client",
            entries.len(),
            self.client.name()
        );
        try_join_all(entries.iter().map(|e| self.client.fetch_detail(&e.url))).await
    }
}
