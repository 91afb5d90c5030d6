//! Terminal output for application state

use anyhow::Result;
use pokedex_core::app::{AppState, Surface};
use pokedex_core::prefs::Theme;
use pokedex_core::render::{Card, RenderedView};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One text block per card
    Text,
    /// The full application state as JSON
    Json,
    /// One table row per card
    Table,
}

/// Surface that reports progress on stderr; results are printed once at the end
pub struct TerminalSurface {
    show_progress: bool,
}

impl TerminalSurface {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            show_progress: format != OutputFormat::Json,
        }
    }
}

impl Surface for TerminalSurface {
    fn apply_theme(&mut self, theme: Theme) {
        tracing::debug!("Applying {} theme", theme);
    }

    fn show_loading(&mut self, loading: bool) {
        if loading && self.show_progress {
            eprintln!("Loading...");
        }
    }
}

/// Table row for a card
#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Details")]
    summary: String,
    #[tabled(rename = "Types")]
    types: String,
    #[tabled(rename = "Stats")]
    stats: String,
}

impl From<&Card> for CardRow {
    fn from(card: &Card) -> Self {
        Self {
            name: card.name.clone(),
            summary: card.summary.clone(),
            types: card.types.join(", "),
            stats: card.stats.join("\n"),
        }
    }
}

/// Print the final state. Returns whether an error message was shown.
pub fn print_state(state: &AppState, format: OutputFormat) -> Result<bool> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(state.error.is_some());
    }

    if let Some(error) = &state.error {
        eprintln!("Error: {error}");
        return Ok(true);
    }

    match (&state.view, format) {
        (RenderedView::Cards { cards }, OutputFormat::Table) if !cards.is_empty() => {
            println!("{}", card_table(cards, state.theme));
        }
        (view, _) => println!("{view}"),
    }

    Ok(false)
}

fn card_table(cards: &[Card], theme: Theme) -> String {
    let rows: Vec<CardRow> = cards.iter().map(CardRow::from).collect();
    let mut table = Table::new(&rows);

    match theme {
        Theme::Light => table.with(Style::rounded()),
        Theme::Dark => table.with(Style::modern()),
    };

    table
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}
