//! Headless browsing of gift and category listings.
//!
//! Drives a [`PaginatedLoader`] against the live site the way the infinite
//! scroll would, writing each view update to stdout.
//!
//! # Usage
//!
//! ```bash
//! # First three pages of a gift listing as JSON lines
//! gg-cli gifts birthday mom tea --pages 3
//!
//! # A category listing rendered as card markup
//! gg-cli category /shop/mugs/ --html
//! ```
//!
//! # Environment Variables
//!
//! - `GIFTGRID_SITE_URL` - Origin of the generated site (or pass `--site`)

use std::io::Write;

use giftgrid_core::QueryKey;
use giftgrid_storefront::render::html;
use giftgrid_storefront::{
    HttpPageSource, LoadOutcome, PaginatedLoader, StorefrontConfig, ViewUpdate,
};
use tracing::{debug, info};

use super::CliError;

/// How view updates are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One JSON object per update.
    Json,
    /// Card and status markup only.
    Html,
}

/// Load up to `pages` pages of `key`.
///
/// # Errors
///
/// Returns an error if configuration is missing or the loader ends on its
/// error panel.
pub async fn run(
    key: QueryKey,
    pages: u32,
    site: Option<&str>,
    format: Format,
) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env_with_site(site)?;
    let source = HttpPageSource::new(&config)?;
    let (loader, mut updates) = PaginatedLoader::new(source, config.loader.clone());

    info!(key = %key, pages, site = %config.site_url, "Browsing listing");
    let outcome = loader.load_page(&key, 1).await;
    debug!(?outcome, "First page requested");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut loaded = 0;
    let mut result = Ok(());

    while let Some(update) = updates.recv().await {
        write_update(&mut out, &update, format)?;
        match update {
            ViewUpdate::Replace { .. } | ViewUpdate::FillPlaceholders { .. } => {
                loaded += 1;
                if loaded >= pages {
                    break;
                }
                let outcome = loader.advance(&key).await;
                debug!(?outcome, "Advanced");
                if outcome == LoadOutcome::Skipped && !loader.snapshot().await.status.is_terminal() {
                    break;
                }
            }
            ViewUpdate::Error { message } => {
                result = Err(CliError::LoadFailed(message));
                break;
            }
            ViewUpdate::Empty
            | ViewUpdate::Exhausted
            | ViewUpdate::NoMoreResults
            | ViewUpdate::NavigateTo { .. }
            | ViewUpdate::Destroyed => break,
            _ => {}
        }
    }
    out.flush()?;

    let snapshot = loader.snapshot().await;
    info!(
        products = snapshot.products.len(),
        current_page = snapshot.current_page,
        total_pages = snapshot.total_pages,
        "Browsing finished"
    );
    loader.destroy().await;
    result
}

fn write_update(out: &mut impl Write, update: &ViewUpdate, format: Format) -> Result<(), CliError> {
    match format {
        Format::Json => writeln!(out, "{}", serde_json::to_string(update)?)?,
        Format::Html => {
            let markup = match update {
                ViewUpdate::Replace { cards, .. } | ViewUpdate::FillPlaceholders { cards, .. } => {
                    html::render_cards(cards).join("\n")
                }
                ViewUpdate::Empty => html::render_empty_state()?,
                ViewUpdate::Error { message } => html::render_error_panel(message)?,
                ViewUpdate::Exhausted | ViewUpdate::NoMoreResults => html::render_end_message()?,
                _ => return Ok(()),
            };
            writeln!(out, "{markup}")?;
        }
    }
    Ok(())
}
