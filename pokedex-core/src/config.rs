//! Application configuration
//!
//! ## Configuration Sources (in precedence order)
//!
//! 1. `--api-base` CLI flag (base URL only)
//! 2. `POKEDEX_API_BASE` environment variable (base URL only)
//! 3. `--config <path>` or `<config dir>/config.json`
//! 4. Built-in defaults
//!
//! ```json
//! {"api_base": "https://pokeapi.co/api/v2/pokemon", "default_count": 12}
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Public catalog endpoint
pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2/pokemon";

/// Size of the unfiltered listing shown when there is no query
pub const DEFAULT_COUNT: usize = 12;

/// How many listing entries the fallback phase scans
pub const DEFAULT_SEARCH_WINDOW: usize = 200;

/// How many fallback matches are hydrated and rendered
pub const DEFAULT_FALLBACK_CAP: usize = 24;

/// Environment variable overriding the API base URL
pub const API_BASE_ENV: &str = "POKEDEX_API_BASE";

const CONFIG_FILE: &str = "config.json";
const PREFERENCES_FILE: &str = "preferences.json";

/// Runtime settings for the catalog client and search resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the entity endpoint, without trailing slash
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Entries in the default listing
    #[serde(default = "default_count")]
    pub default_count: usize,

    /// Listing entries scanned by the fallback phase
    #[serde(default = "default_search_window")]
    pub search_window: usize,

    /// Fallback matches hydrated and rendered
    #[serde(default = "default_fallback_cap")]
    pub fallback_cap: usize,

    /// Per-request timeout. Unset means requests may hang indefinitely.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_count() -> usize {
    DEFAULT_COUNT
}

fn default_search_window() -> usize {
    DEFAULT_SEARCH_WINDOW
}

fn default_fallback_cap() -> usize {
    DEFAULT_FALLBACK_CAP
}

fn default_user_agent() -> String {
    concat!("pokedex/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            default_count: default_count(),
            search_window: default_search_window(),
            fallback_cap: default_fallback_cap(),
            request_timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the platform config file is
    /// used when present and built-in defaults otherwise. Environment
    /// overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file does not exist: {}", path.display());
                }
                Self::load_from_path(path)?
            }
            None => match config_dir() {
                Ok(dir) if dir.join(CONFIG_FILE).exists() => {
                    Self::load_from_path(&dir.join(CONFIG_FILE))?
                }
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific JSON file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `POKEDEX_API_BASE` if set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                debug!("Using {} override: {}", API_BASE_ENV, base);
                self.api_base = base;
            }
        }
        self
    }

    /// Override the API base URL (e.g., from the CLI)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<()> {
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            anyhow::bail!("API base URL must start with http:// or https://");
        }
        if self.default_count == 0 {
            anyhow::bail!("default_count must be at least 1");
        }
        if self.search_window == 0 {
            anyhow::bail!("search_window must be at least 1");
        }
        if self.fallback_cap == 0 {
            anyhow::bail!("fallback_cap must be at least 1");
        }
        Ok(())
    }
}

/// Platform config directory for the application, created on demand
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = directories::ProjectDirs::from("co", "pokeapi", "pokedex")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .or_else(|| dirs::config_dir().map(|d| d.join("pokedex")))
        .context("Could not determine config directory")?;

    std::fs::create_dir_all(&config_dir).with_context(|| {
        format!(
            "Failed to create config directory: {}",
            config_dir.display()
        )
    })?;

    Ok(config_dir)
}

/// Default location of the preference file
pub fn default_preferences_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(PREFERENCES_FILE))
}
