//! Gift finder controller.
//!
//! Wires the facet form to a [`PaginatedLoader`]: the initial selection is
//! resolved from the form, the URL and the catalog, and every change that
//! completes the selection navigates the loader to the new result set.

use giftgrid_core::QueryKey;
use tracing::{info, warn};

use crate::facets::{FacetCatalog, FacetChange, FormSnapshot, PartialSelection, resolve};
use crate::loader::{LoadOutcome, PaginatedLoader};
use crate::source::PageSource;

/// Gift finder page controller.
pub struct GiftFinder<S> {
    loader: PaginatedLoader<S>,
    catalog: FacetCatalog,
    selection: PartialSelection,
}

impl<S: PageSource> GiftFinder<S> {
    #[must_use]
    pub fn new(loader: PaginatedLoader<S>, catalog: FacetCatalog) -> Self {
        Self {
            loader,
            catalog,
            selection: PartialSelection::default(),
        }
    }

    #[must_use]
    pub const fn loader(&self) -> &PaginatedLoader<S> {
        &self.loader
    }

    #[must_use]
    pub const fn catalog(&self) -> &FacetCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn selection(&self) -> &PartialSelection {
        &self.selection
    }

    /// Resolve the initial selection for a page at `path`.
    ///
    /// Products are loaded right away only when the URL names a gift path
    /// and every facet resolved; otherwise the finder waits for the form.
    pub async fn start(&mut self, form: Option<&FormSnapshot>, path: &str) -> Option<LoadOutcome> {
        if !self.catalog.is_searchable() {
            warn!("Facet lists are incomplete, gift search unavailable");
        }

        let resolution = resolve(&self.catalog, form, path);
        self.selection = resolution.selection;

        if resolution.from_url {
            self.load_selection().await
        } else {
            None
        }
    }

    /// Apply a form change and load once the selection is complete.
    pub async fn on_change(&mut self, change: FacetChange) -> Option<LoadOutcome> {
        self.selection.apply(change);
        self.load_selection().await
    }

    /// Load the next page of the current selection.
    pub async fn load_more(&self) -> LoadOutcome {
        match self.current_key() {
            Some(key) => self.loader.advance(&key).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// Start the current selection over, e.g. from the error panel's retry button.
    pub async fn reload(&self) -> Option<LoadOutcome> {
        let key = self.current_key()?;
        Some(self.loader.navigate(&key).await)
    }

    /// Tear down the loader.
    pub async fn destroy(&self) {
        self.loader.destroy().await;
    }

    fn current_key(&self) -> Option<QueryKey> {
        let selection = self.selection.complete()?;
        match QueryKey::gifts(selection) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, "Ignoring invalid facet selection");
                None
            }
        }
    }

    async fn load_selection(&self) -> Option<LoadOutcome> {
        let key = self.current_key()?;
        info!(key = %key, "Loading gift selection");
        Some(self.loader.navigate(&key).await)
    }
}
