//! Pokedex - browse and search the creature catalog from a terminal

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pokedex_core::app::AppController;
use pokedex_core::catalog::{CatalogClient, HttpCatalogClient};
use pokedex_core::config::{self, AppConfig};
use pokedex_core::prefs::PreferenceStore;
use pokedex_core::search::SearchLimits;

mod output;

use output::{OutputFormat, TerminalSurface};

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "pokedex",
    about = "Browse and search the Pokedex catalog",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Emit logs as JSON
    #[clap(long, global = true)]
    log_json: bool,

    /// Override the catalog API base URL
    #[clap(long, global = true)]
    api_base: Option<String>,

    /// Configuration file (defaults to the platform config directory)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Preference file (defaults to the platform config directory)
    #[clap(long, global = true)]
    prefs_file: Option<PathBuf>,

    /// Output format
    #[clap(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Restore the last search, or show the default listing
    Start,

    /// Search by name or number; falls back to a substring match
    Search {
        /// Query text (an empty query shows the default listing)
        query: Vec<String>,
    },

    /// Forget the last search and show the default listing
    Reset,

    /// Show or switch the color theme
    Theme {
        #[clap(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
}

/// Initialize tracing with CLI flags
///
/// Logs always go to stderr so stdout carries only results.
fn initialize_tracing(log_level: &LogLevel, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn build_controller(cli: &Cli) -> Result<AppController> {
    let mut app_config = AppConfig::load(cli.config.as_deref())?;
    if let Some(api_base) = &cli.api_base {
        app_config = app_config.with_api_base(api_base.clone());
        app_config.validate()?;
    }
    debug!("Using catalog API at {}", app_config.api_base);

    let prefs_path = match &cli.prefs_file {
        Some(path) => path.clone(),
        None => config::default_preferences_path()
            .context("Could not determine preference file location")?,
    };
    debug!("Using preferences at {}", prefs_path.display());

    let client: Arc<dyn CatalogClient> = Arc::new(HttpCatalogClient::new(&app_config)?);

    Ok(AppController::new(
        client,
        PreferenceStore::file(prefs_path),
        SearchLimits::from(&app_config),
    )
    .with_surface(Box::new(TerminalSurface::new(cli.format))))
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    initialize_tracing(&cli.log_level, cli.log_json);

    let mut app = build_controller(&cli)?;

    let state = match cli.command.take().unwrap_or(Command::Start) {
        Command::Start => app.startup().await,
        Command::Search { query } => {
            app.apply_stored_theme();
            app.submit(&query.join(" ")).await
        }
        Command::Reset => app.reset().await,
        Command::Theme { action } => {
            app.apply_stored_theme();
            let theme = match action {
                Some(ThemeAction::Toggle) => app.toggle_theme(),
                Some(ThemeAction::Show) | None => app.state().theme,
            };
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "theme": theme }));
            } else {
                println!("Theme: {theme}");
            }
            return Ok(());
        }
    };

    if output::print_state(state, cli.format)? {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_start() {
        let cli = Cli::try_parse_from(["pokedex"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_search_joins_words() {
        let cli = Cli::try_parse_from(["pokedex", "search", "mr", "mime"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Search {
                query: vec!["mr".to_string(), "mime".to_string()]
            })
        );
    }

    #[test]
    fn test_search_without_query_is_allowed() {
        let cli = Cli::try_parse_from(["pokedex", "search"]).unwrap();
        assert_eq!(cli.command, Some(Command::Search { query: vec![] }));
    }

    #[test]
    fn test_theme_toggle_and_global_flags() {
        let cli = Cli::try_parse_from([
            "pokedex",
            "theme",
            "toggle",
            "--prefs-file",
            "/tmp/prefs.json",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Theme {
                action: Some(ThemeAction::Toggle)
            })
        );
        assert_eq!(cli.prefs_file, Some(PathBuf::from("/tmp/prefs.json")));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["pokedex", "--format", "xml"]).is_err());
    }
}
