//! Pokedex Catalog - read-only access to the creature API
//!
//! # Architecture
//!
//! ```text
//! PokeAPI
//!     │
//!     ├── /pokemon/{id|name}   ← Single entity
//!     ├── /pokemon?limit=N     ← Listing of {name, url}
//!     └── listing entry url    ← Entity detail (hydration)
//!            │
//!            ▼
//!     CatalogClient (HttpCatalogClient | StaticCatalog)
//! ```

mod client;
mod memory;
mod types;

pub use client::{CatalogClient, HttpCatalogClient};
pub use memory::{CatalogRequest, StaticCatalog};
pub use types::{Entity, ListingEntry, ListingPage, Sprites, Stat};
