//! Command implementations.

pub mod browse;
pub mod countdown;
pub mod facets;

use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] giftgrid_storefront::config::ConfigError),

    /// The page source could not be built or a page failed to load.
    #[error("Load error: {0}")]
    Load(#[from] giftgrid_storefront::LoadError),

    /// The arguments do not name a valid gift path or category.
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] giftgrid_core::QueryKeyError),

    /// The loader gave up and showed its error panel.
    #[error("Loading stopped: {0}")]
    LoadFailed(String),

    /// Markup rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] giftgrid_storefront::render::RenderError),

    /// Invalid countdown target.
    #[error("Invalid countdown target: {0}")]
    InvalidTarget(#[from] chrono::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
