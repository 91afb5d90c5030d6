//! Pokedex library exports

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod prefs;
pub mod render;
pub mod search;
