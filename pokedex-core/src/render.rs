//! Card rendering
//!
//! Pure transformation from entities to display cards. No I/O.

use serde::Serialize;
use std::fmt;

use crate::catalog::Entity;

/// Shown when an image is unavailable from every source
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/120?text=?";

/// Shown in place of the grid when there is nothing to render
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Statistics shown on a card, in display order
pub const STAT_ALLOW_LIST: [&str; 4] = ["hp", "attack", "defense", "speed"];

/// Image sources in precedence order; the first one present wins
const IMAGE_SOURCES: [fn(&Entity) -> Option<&str>; 2] = [
    |e| e.sprites.official_artwork.as_deref(),
    |e| e.sprites.front_default.as_deref(),
];

/// One rendered entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub name: String,
    pub image_url: String,
    pub image_alt: String,
    /// `#id • height m • weight kg`
    pub summary: String,
    pub types: Vec<String>,
    /// `name: value` lines for allow-listed statistics
    pub stats: Vec<String>,
}

/// What the card region shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedView {
    Placeholder { message: String },
    Cards { cards: Vec<Card> },
}

impl RenderedView {
    pub fn cards(&self) -> &[Card] {
        match self {
            RenderedView::Cards { cards } => cards,
            RenderedView::Placeholder { .. } => &[],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, RenderedView::Placeholder { .. })
    }
}

impl Default for RenderedView {
    fn default() -> Self {
        RenderedView::Cards { cards: Vec::new() }
    }
}

/// Render entities into cards, preserving order
pub fn render(entities: &[Entity]) -> RenderedView {
    if entities.is_empty() {
        return RenderedView::Placeholder {
            message: NO_RESULTS_MESSAGE.to_string(),
        };
    }

    RenderedView::Cards {
        cards: entities.iter().map(card_for).collect(),
    }
}

/// Build the card for a single entity
pub fn card_for(entity: &Entity) -> Card {
    Card {
        name: entity.name.clone(),
        image_url: image_url(entity).to_string(),
        image_alt: entity.name.clone(),
        summary: format!(
            "#{} • {}m • {}kg",
            entity.id,
            scaled(entity.height),
            scaled(entity.weight)
        ),
        types: entity.types.clone(),
        stats: stat_lines(entity),
    }
}

/// Resolve the image URL through [`IMAGE_SOURCES`], falling back to the placeholder
pub fn image_url(entity: &Entity) -> &str {
    IMAGE_SOURCES
        .iter()
        .find_map(|source| source(entity))
        .unwrap_or(PLACEHOLDER_IMAGE_URL)
}

// Source units are tenths; f64 Display drops a trailing ".0".
fn scaled(value: u32) -> f64 {
    f64::from(value) / 10.0
}

fn stat_lines(entity: &Entity) -> Vec<String> {
    STAT_ALLOW_LIST
        .iter()
        .filter_map(|key| entity.stats.iter().find(|s| s.name.contains(*key)))
        .map(|stat| format!("{}: {}", stat.name, stat.value))
        .collect()
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "  {}", self.summary)?;
        if !self.types.is_empty() {
            writeln!(f, "  [{}]", self.types.join("] ["))?;
        }
        for line in &self.stats {
            writeln!(f, "  {line}")?;
        }
        write!(f, "  {}", self.image_url)
    }
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderedView::Placeholder { message } => write!(f, "{message}"),
            RenderedView::Cards { cards } => {
                for (i, card) in cards.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                        writeln!(f)?;
                    }
                    write!(f, "{card}")?;
                }
                Ok(())
            }
        }
    }
}
