//! Catalog and search error types with user-facing messages

use thiserror::Error;

/// Message shown when the fallback listing or a detail hydration fails
pub const SEARCH_FAILED_MESSAGE: &str = "Search failed.";

/// Message shown when the fallback phase finds nothing
pub const NO_MATCH_MESSAGE: &str = "No matching entity found.";

/// Message shown when the default listing cannot be loaded
pub const LIST_UNAVAILABLE_MESSAGE: &str = "Unable to load list. Try again later.";

/// Why a single HTTP request did not produce a usable body
#[derive(Error, Debug)]
pub enum FetchFailure {
    /// The server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Connection, TLS or body decoding failure
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The request URL could not be built
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Failures of the catalog client and the search resolver
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Exact identifier lookup failed. Expected during search; triggers the fallback phase.
    #[error("Entity not found: {identifier} ({source})")]
    NotFound {
        identifier: String,
        #[source]
        source: FetchFailure,
    },

    /// The broader listing could not be fetched
    #[error("Failed to load listing of {limit} entries ({source})")]
    Listing {
        limit: usize,
        #[source]
        source: FetchFailure,
    },

    /// Hydrating a listing entry failed
    #[error("Failed to fetch entity detail from {url} ({source})")]
    DetailFetch {
        url: String,
        #[source]
        source: FetchFailure,
    },

    /// The fallback phase found no entity whose name contains the query
    #[error("No entity name contains '{query}'")]
    NoMatch { query: String },

    /// The unfiltered default listing could not be loaded
    #[error("Failed to load default listing: {source}")]
    DefaultListing {
        #[source]
        source: Box<CatalogError>,
    },
}

impl CatalogError {
    /// The single message shown in the error region for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            CatalogError::NoMatch { .. } => NO_MATCH_MESSAGE,
            CatalogError::DefaultListing { .. } => LIST_UNAVAILABLE_MESSAGE,
            CatalogError::NotFound { .. }
            | CatalogError::Listing { .. }
            | CatalogError::DetailFetch { .. } => SEARCH_FAILED_MESSAGE,
        }
    }

    /// Wrap any failure that happened while building the default listing
    pub fn default_listing(source: CatalogError) -> Self {
        CatalogError::DefaultListing {
            source: Box::new(source),
        }
    }
}
