//! In-memory catalog
//!
//! Serves a fixed set of entities with the same lookup rules as the HTTP API
//! and records every request, so search behaviour can be exercised without a
//! network. Failures can be injected per endpoint.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashSet;
use std::sync::Mutex;

use super::client::CatalogClient;
use super::types::{Entity, ListingEntry};
use crate::error::{CatalogError, FetchFailure};

const DETAIL_URL_PREFIX: &str = "https://catalog.invalid/pokemon/";

/// A request observed by [`StaticCatalog`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    Identifier(String),
    Listing(usize),
    Detail(String),
}

/// Catalog backed by a vector of entities in listing order
#[derive(Default)]
pub struct StaticCatalog {
    entities: Vec<Entity>,
    listing_fails: bool,
    failing_details: HashSet<u32>,
    requests: Mutex<Vec<CatalogRequest>>,
}

impl StaticCatalog {
    /// Create a catalog whose listing order is the order of `entities`
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            ..Default::default()
        }
    }

    /// Make every listing request fail with HTTP 500
    pub fn with_failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    /// Make detail requests for the given identifier fail with HTTP 500
    pub fn with_failing_detail(mut self, id: u32) -> Self {
        self.failing_details.insert(id);
        self
    }

    /// Detail URL advertised in listing entries for an identifier
    pub fn detail_url(id: u32) -> String {
        format!("{DETAIL_URL_PREFIX}{id}/")
    }

    /// Every request seen so far, in arrival order
    pub fn requests(&self) -> Vec<CatalogRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Whether any listing request was made
    pub fn listing_requested(&self) -> bool {
        self.requests()
            .iter()
            .any(|r| matches!(r, CatalogRequest::Listing(_)))
    }

    /// Number of detail requests made
    pub fn detail_request_count(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| matches!(r, CatalogRequest::Detail(_)))
            .count()
    }

    fn record(&self, request: CatalogRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
    }

    fn find_by_id(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }
}

#[async_trait]
impl CatalogClient for StaticCatalog {
    async fn fetch_by_identifier(&self, identifier: &str) -> Result<Entity, CatalogError> {
        let key = identifier.to_lowercase();
        self.record(CatalogRequest::Identifier(key.clone()));

        self.entities
            .iter()
            .find(|e| e.name == key || e.id.to_string() == key)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound {
                identifier: identifier.to_string(),
                source: FetchFailure::Status(StatusCode::NOT_FOUND),
            })
    }

    async fn fetch_listing(&self, limit: usize) -> Result<Vec<ListingEntry>, CatalogError> {
        self.record(CatalogRequest::Listing(limit));

        if self.listing_fails {
            return Err(CatalogError::Listing {
                limit,
                source: FetchFailure::Status(StatusCode::INTERNAL_SERVER_ERROR),
            });
        }

        Ok(self
            .entities
            .iter()
            .take(limit)
            .map(|e| ListingEntry {
                name: e.name.clone(),
                url: Self::detail_url(e.id),
            })
            .collect())
    }

    async fn fetch_detail(&self, url: &str) -> Result<Entity, CatalogError> {
        self.record(CatalogRequest::Detail(url.to_string()));

        let detail_error = |status| CatalogError::DetailFetch {
            url: url.to_string(),
            source: FetchFailure::Status(status),
        };

        let id = url
            .strip_prefix(DETAIL_URL_PREFIX)
            .map(|rest| rest.trim_end_matches('/'))
            .and_then(|rest| rest.parse::<u32>().ok())
            .ok_or_else(|| detail_error(StatusCode::NOT_FOUND))?;

        if self.failing_details.contains(&id) {
            return Err(detail_error(StatusCode::INTERNAL_SERVER_ERROR));
        }

        self.find_by_id(id)
            .cloned()
            .ok_or_else(|| detail_error(StatusCode::NOT_FOUND))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
