//! HTML fragments rendered from view-models with Askama.
//!
//! Card batches are rendered card by card: a card whose template fails is
//! logged and left out, the rest of the batch still renders.

use askama::Template;
use thiserror::Error;

use super::card::ProductCard;
use crate::error::LoadError;

/// Cards per animation stagger cycle.
const STAGGER_CYCLE: usize = 12;

/// Delay between two staggered cards, in hundredths of a second.
const STAGGER_STEP_CENTIS: usize = 5;

/// Product card fragment.
#[derive(Template)]
#[template(path = "partials/product_card.html")]
struct ProductCardTemplate<'a> {
    card: &'a ProductCard,
    delay: String,
}

/// Skeleton cards shown while a page is in flight.
#[derive(Template)]
#[template(path = "partials/placeholders.html")]
struct PlaceholdersTemplate {
    count: usize,
}

/// Terminal "no results" state.
#[derive(Template)]
#[template(path = "partials/empty_state.html")]
struct EmptyStateTemplate<'a> {
    heading: &'a str,
    message: &'a str,
}

/// Blocking error panel with a reload button.
#[derive(Template)]
#[template(path = "partials/error_panel.html")]
struct ErrorPanelTemplate<'a> {
    message: &'a str,
}

/// End-of-results message.
#[derive(Template)]
#[template(path = "partials/end_message.html")]
struct EndMessageTemplate<'a> {
    message: &'a str,
}

/// Errors that can occur when rendering a fragment.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl From<RenderError> for LoadError {
    fn from(err: RenderError) -> Self {
        Self::TemplateMissing(err.to_string())
    }
}

/// CSS animation delay for a card position, e.g. `0.15s`.
#[must_use]
pub fn animation_delay(position: usize) -> String {
    let centis = (position % STAGGER_CYCLE) * STAGGER_STEP_CENTIS;
    format!("{}.{:02}s", centis / 100, centis % 100)
}

/// Render a single product card.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_card(card: &ProductCard) -> Result<String, RenderError> {
    Ok(ProductCardTemplate {
        card,
        delay: animation_delay(card.position),
    }
    .render()?)
}

/// Render a batch of cards, skipping any card that fails to render.
#[must_use]
pub fn render_cards(cards: &[ProductCard]) -> Vec<String> {
    cards
        .iter()
        .filter_map(|card| match render_card(card) {
            Ok(html) => Some(html),
            Err(e) => {
                let err = LoadError::from(e);
                tracing::error!(
                    error = %err,
                    position = card.position,
                    title = %card.title,
                    "Skipping product card"
                );
                None
            }
        })
        .collect()
}

/// Render `count` placeholder cards.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_placeholders(count: usize) -> Result<String, RenderError> {
    Ok(PlaceholdersTemplate { count }.render()?)
}

/// Render the empty state shown when a query has no results.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_empty_state() -> Result<String, RenderError> {
    Ok(EmptyStateTemplate {
        heading: "No gifts found for this combination",
        message: "Try adjusting your criteria or selecting different options",
    }
    .render()?)
}

/// Render the blocking error panel.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_error_panel(message: &str) -> Result<String, RenderError> {
    Ok(ErrorPanelTemplate { message }.render()?)
}

/// Render the end-of-results message.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_end_message() -> Result<String, RenderError> {
    Ok(EndMessageTemplate {
        message: "You've reached the end",
    }
    .render()?)
}
