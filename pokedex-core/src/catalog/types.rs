//! Catalog data model
//!
//! The API returns deeply nested JSON; it is deserialized into private `Raw*`
//! mirrors and flattened into [`Entity`] so the rest of the crate never deals
//! with the wire shape.

use serde::{Deserialize, Serialize};

/// A single catalog record (a creature)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawEntity")]
pub struct Entity {
    /// Catalog identifier (positive)
    pub id: u32,

    /// Lowercase unique name
    pub name: String,

    /// Height in decimetres
    pub height: u32,

    /// Weight in hectograms
    pub weight: u32,

    /// Category tags in API order
    pub types: Vec<String>,

    /// Named base statistics in API order
    pub stats: Vec<Stat>,

    /// Image references
    pub sprites: Sprites,
}

/// A named base statistic
#[derive(Debug, Clone, PartialEq)]
pub struct Stat {
    pub name: String,
    pub value: i64,
}

/// Image URLs an entity may carry; any of them can be missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sprites {
    /// `sprites.other["official-artwork"].front_default`
    pub official_artwork: Option<String>,

    /// `sprites.front_default`
    pub front_default: Option<String>,
}

/// Lightweight reference to an entity, as returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub name: String,
    pub url: String,
}

/// One page of the listing endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub results: Vec<ListingEntry>,
}

#[derive(Deserialize)]
struct RawEntity {
    id: u32,
    name: String,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    sprites: Option<RawSprites>,
    #[serde(default)]
    types: Vec<RawTypeSlot>,
    #[serde(default)]
    stats: Vec<RawStat>,
}

#[derive(Deserialize)]
struct RawSprites {
    #[serde(default)]
    front_default: Option<String>,
    #[serde(default)]
    other: Option<RawOtherSprites>,
}

#[derive(Deserialize)]
struct RawOtherSprites {
    #[serde(default, rename = "official-artwork")]
    official_artwork: Option<RawArtwork>,
}

#[derive(Deserialize)]
struct RawArtwork {
    #[serde(default)]
    front_default: Option<String>,
}

#[derive(Deserialize)]
struct RawTypeSlot {
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Deserialize)]
struct RawStat {
    base_stat: i64,
    stat: NamedResource,
}

#[derive(Deserialize)]
struct NamedResource {
    name: String,
}

impl From<RawEntity> for Entity {
    fn from(raw: RawEntity) -> Self {
        let sprites = raw
            .sprites
            .map(|s| Sprites {
                official_artwork: s
                    .other
                    .and_then(|o| o.official_artwork)
                    .and_then(|a| a.front_default),
                front_default: s.front_default,
            })
            .unwrap_or_default();

        Entity {
            id: raw.id,
            name: raw.name,
            height: raw.height,
            weight: raw.weight,
            types: raw.types.into_iter().map(|t| t.kind.name).collect(),
            stats: raw
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    value: s.base_stat,
                })
                .collect(),
            sprites,
        }
    }
}
