//! What the loader tells its view, and what a load call returned.

use std::time::Duration;

use serde::Serialize;

use crate::render::ProductCard;

/// A change the view should apply.
///
/// Updates arrive in order on the loader's channel; a consumer that applies
/// them one after another reproduces the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewUpdate {
    /// State was cleared for a new result set; drop rendered content.
    Reset { key: String },
    /// Show the loading overlay (first page only).
    LoadingStarted,
    /// Hide the loading overlay.
    LoadingFinished,
    /// Append `count` skeleton cards.
    Placeholders { page: u32, count: usize },
    /// Replace the placeholders of `page` with cards; leftover placeholders are removed.
    FillPlaceholders { page: u32, cards: Vec<ProductCard> },
    /// Remove the placeholders of `page` without content.
    ClearPlaceholders { page: u32 },
    /// Replace the whole grid.
    Replace { page: u32, cards: Vec<ProductCard> },
    /// The first page failed transiently; another attempt is scheduled.
    Retrying {
        page: u32,
        attempt: u32,
        #[serde(with = "millis")]
        delay: Duration,
    },
    /// Terminal empty state: the query has no results.
    Empty,
    /// Blocking error with a manual reload affordance.
    Error { message: String },
    /// Pagination stopped on a failure past the first page.
    NoMoreResults,
    /// Every page has been loaded.
    Exhausted,
    /// Record a client-side navigation in history.
    HistoryPushed { path: String },
    /// Record the entry the page was loaded at.
    HistoryReplaced { path: String, page: u32 },
    /// Client-side navigation failed; fall back to a full page load.
    NavigateTo { path: String },
    /// The loader was torn down.
    Destroyed,
}

/// Result of a load, advance or preload call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// A page was fetched (or taken from the preload cache) and rendered.
    Loaded { page: u32, products: usize },
    /// A page was fetched ahead of need and cached.
    Preloaded { page: u32 },
    /// Another fetch is in flight; the call was dropped.
    Busy,
    /// Nothing to do (page loaded already, last page reached, terminal state, other key).
    Skipped,
    /// The state was reset while the fetch was in flight; the response was discarded.
    Stale,
    /// A retry was scheduled.
    RetryScheduled { page: u32, attempt: u32 },
    /// The query has no results.
    NoResults,
    /// Pagination ended on a failure.
    NoMoreResults,
    /// The first page could not be loaded.
    Failed,
}

impl LoadOutcome {
    /// Whether a page made it into the grid.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_serialization() {
        let json = serde_json::to_value(ViewUpdate::Retrying {
            page: 1,
            attempt: 2,
            delay: Duration::from_secs(2),
        })
        .unwrap();
        assert_eq!(json["type"], "retrying");
        assert_eq!(json["delay"], 2000);

        let json = serde_json::to_value(ViewUpdate::Empty).unwrap();
        assert_eq!(json["type"], "empty");
    }

    #[test]
    fn test_outcome_is_loaded() {
        assert!(LoadOutcome::Loaded { page: 1, products: 0 }.is_loaded());
        assert!(!LoadOutcome::Busy.is_loaded());
    }
}
