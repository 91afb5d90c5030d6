//! Application controller
//!
//! Owns the application state and is its only mutator. UI events (startup,
//! submit, reset, theme toggle) come in as method calls; every state change
//! is mirrored to a [`Surface`], the rendering collaborator.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::CatalogClient;
use crate::error::CatalogError;
use crate::prefs::{PreferenceStore, Theme};
use crate::render::{render, RenderedView};
use crate::search::{SearchLimits, SearchQuery, SearchResolver};

/// Everything a front-end needs to draw the current screen
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub theme: Theme,
    /// Contents of the search input
    pub input: String,
    pub loading: bool,
    /// Message for the error region, if any
    pub error: Option<String>,
    /// Contents of the card region
    pub view: RenderedView,
}

/// Whether a successful search should be remembered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// User-initiated: store the query as `lastSearch` on success
    Persist,
    /// Replaying a stored query at startup: leave preferences untouched
    Restore,
}

/// Rendering collaborator notified of every visible change
pub trait Surface: Send {
    fn apply_theme(&mut self, _theme: Theme) {}
    fn show_loading(&mut self, _loading: bool) {}
    fn show_error(&mut self, _message: Option<&str>) {}
    fn render(&mut self, _view: &RenderedView) {}
}

/// Surface that ignores everything; callers read [`AppState`] instead
pub struct NoopSurface;

impl Surface for NoopSurface {}

pub struct AppController {
    client: Arc<dyn CatalogClient>,
    prefs: PreferenceStore,
    limits: SearchLimits,
    surface: Box<dyn Surface>,
    state: AppState,
}

impl AppController {
    pub fn new(
        client: Arc<dyn CatalogClient>,
        prefs: PreferenceStore,
        limits: SearchLimits,
    ) -> Self {
        Self {
            client,
            prefs,
            limits,
            surface: Box::new(NoopSurface),
            state: AppState::default(),
        }
    }

    /// Replace the rendering collaborator
    pub fn with_surface(mut self, surface: Box<dyn Surface>) -> Self {
        self.surface = surface;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.prefs
    }

    /// Apply the stored theme, then restore the last search or show the default listing
    pub async fn startup(&mut self) -> &AppState {
        self.apply_stored_theme();

        let last_search = self.prefs.last_search();
        if last_search.is_empty() {
            debug!("No stored search, loading default listing");
            self.load_default_listing().await;
        } else {
            info!("Restoring last search '{}'", last_search);
            self.set_input(&last_search);
            self.search(&last_search, SearchMode::Restore).await;
        }

        &self.state
    }

    /// Handle a submitted search form
    pub async fn submit(&mut self, input: &str) -> &AppState {
        self.set_input(input);
        self.search(input, SearchMode::Persist).await;
        &self.state
    }

    /// Clear the input and the stored search, then show the default listing
    ///
    /// The default listing is shown even if the stored search could not be
    /// cleared.
    pub async fn reset(&mut self) -> &AppState {
        self.set_input("");
        if let Err(e) = self.prefs.set_last_search("") {
            warn!("Failed to clear stored search: {:#}", e);
        }
        self.apply_stored_theme();
        self.load_default_listing().await;
        &self.state
    }

    /// Flip the theme and persist it immediately
    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.state.theme.toggled();
        self.set_theme(theme);
        if let Err(e) = self.prefs.set_theme(theme) {
            warn!("Failed to persist theme: {:#}", e);
        }
        info!("Theme switched to {}", theme);
        theme
    }

    /// Apply the stored theme without touching the network
    pub fn apply_stored_theme(&mut self) -> Theme {
        let theme = self.prefs.theme();
        self.set_theme(theme);
        theme
    }

    /// Run one search
    ///
    /// An empty query shows the default listing and leaves the stored search
    /// alone. Failures end up in the error region; nothing is propagated.
    pub async fn search(&mut self, raw: &str, mode: SearchMode) {
        self.set_error(None);
        self.set_view(RenderedView::default());

        let client = Arc::clone(&self.client);
        let resolver = SearchResolver::new(client.as_ref(), self.limits);

        self.set_loading(true);
        let result = match resolver.resolve(raw).await.into_entities() {
            Some(result) => result,
            None => {
                debug!("Empty query, loading default listing");
                resolver.default_listing().await
            }
        };
        self.set_loading(false);

        match result {
            Ok(entities) => {
                self.set_view(render(&entities));
                if mode == SearchMode::Persist {
                    if let Some(query) = SearchQuery::parse(raw) {
                        self.persist_last_search(&query);
                    }
                }
            }
            Err(err) => self.show_failure(&err),
        }
    }

    async fn load_default_listing(&mut self) {
        self.set_error(None);
        self.set_loading(true);
        let result = SearchResolver::new(self.client.as_ref(), self.limits)
            .default_listing()
            .await;
        self.set_loading(false);

        match result {
            Ok(entities) => self.set_view(render(&entities)),
            Err(err) => self.show_failure(&err),
        }
    }

    fn persist_last_search(&mut self, query: &SearchQuery) {
        if let Err(e) = self.prefs.set_last_search(query.as_str()) {
            warn!("Failed to persist last search: {:#}", e);
        }
    }

    fn show_failure(&mut self, err: &CatalogError) {
        debug!("Showing error for: {}", err);
        self.set_error(Some(err.user_message().to_string()));
    }

    fn set_input(&mut self, input: &str) {
        self.state.input = input.to_string();
    }

    fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
        self.surface.apply_theme(theme);
    }

    fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
        self.surface.show_loading(loading);
    }

    fn set_error(&mut self, error: Option<String>) {
        self.surface.show_error(error.as_deref());
        self.state.error = error;
    }

    fn set_view(&mut self, view: RenderedView) {
        self.surface.render(&view);
        self.state.view = view;
    }
}
