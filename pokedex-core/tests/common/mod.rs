//! Shared fixtures for integration tests
//!
//! Entities are built from API-shaped JSON so every test also goes through
//! the real deserialization path.

#![allow(dead_code)]

use pokedex_core::catalog::{Entity, StaticCatalog};
use serde_json::json;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests (only once per test run)
pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// An entity with plausible API fields
pub fn entity(id: u32, name: &str) -> Entity {
    serde_json::from_value(entity_json(id, name)).expect("fixture entity must deserialize")
}

/// API-shaped JSON for [`entity`], as the detail endpoint returns it
pub fn entity_json(id: u32, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "sprites": {
            "front_default": format!("https://img.test/sprites/{id}.png"),
            "other": {
                "official-artwork": {
                    "front_default": format!("https://img.test/artwork/{id}.png")
                }
            }
        },
        "types": [{"slot": 1, "type": {"name": "normal", "url": "https://api.test/type/1/"}}],
        "stats": [
            {"base_stat": 45, "effort": 0, "stat": {"name": "hp", "url": "https://api.test/stat/1/"}},
            {"base_stat": 49, "effort": 0, "stat": {"name": "attack", "url": "https://api.test/stat/2/"}},
            {"base_stat": 49, "effort": 0, "stat": {"name": "defense", "url": "https://api.test/stat/3/"}},
            {"base_stat": 45, "effort": 0, "stat": {"name": "speed", "url": "https://api.test/stat/6/"}}
        ]
    })
}

/// The first generation's opening entries, in catalog order
pub fn kanto_starters() -> Vec<Entity> {
    [
        (1, "bulbasaur"),
        (2, "ivysaur"),
        (3, "venusaur"),
        (4, "charmander"),
        (5, "charmeleon"),
        (6, "charizard"),
        (7, "squirtle"),
        (8, "wartortle"),
        (9, "blastoise"),
        (10, "caterpie"),
        (11, "metapod"),
        (12, "butterfree"),
        (13, "weedle"),
        (14, "kakuna"),
        (15, "beedrill"),
        (16, "pidgey"),
        (17, "pidgeotto"),
        (18, "pidgeot"),
        (19, "rattata"),
        (20, "raticate"),
        (21, "spearow"),
        (22, "fearow"),
        (23, "ekans"),
        (24, "arbok"),
        (25, "pikachu"),
        (26, "raichu"),
    ]
    .into_iter()
    .map(|(id, name)| entity(id, name))
    .collect()
}

/// A catalog seeded with [`kanto_starters`]
pub fn starter_catalog() -> StaticCatalog {
    StaticCatalog::new(kanto_starters())
}

/// `count` entities whose names all contain `fragment`
pub fn entities_containing(fragment: &str, first_id: u32, count: u32) -> Vec<Entity> {
    (0..count)
        .map(|i| entity(first_id + i, &format!("{fragment}-{i:03}")))
        .collect()
}
