//! Category product grid controller.
//!
//! A category page arrives with one page already rendered by the site
//! generator. The grid adopts that page, continues pagination from it and
//! switches categories client-side. History back/forward falls back to a
//! full page load.

use giftgrid_core::{CategoryPath, QueryKey, QueryKeyError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::loader::{LoadOutcome, PaginatedLoader};
use crate::source::PageSource;

/// Pagination state rendered into the page (`data-*` attributes of the grid
/// container). Missing attributes are derived from the location path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSeed {
    /// `data-current-page`
    #[serde(default)]
    pub current_page: Option<u32>,
    /// `data-total-pages`
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// `data-base-url`
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Where a grid starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridStart {
    pub key: QueryKey,
    pub current_page: u32,
    pub total_pages: u32,
}

impl GridSeed {
    /// Resolve the starting point for a page served at `location`.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid category path can be derived.
    pub fn resolve(&self, location: &str) -> Result<GridStart, QueryKeyError> {
        let (path, location_page) = match self.base_url.as_deref().filter(|b| !b.is_empty()) {
            Some(base) => (CategoryPath::parse(base)?, None),
            None => {
                let (path, page) = CategoryPath::from_location(location)?;
                (path, Some(page))
            }
        };

        let current_page = self.current_page.or(location_page).unwrap_or(1).max(1);
        let total_pages = self.total_pages.unwrap_or(1).max(1);

        Ok(GridStart {
            key: QueryKey::Category(path),
            current_page,
            total_pages,
        })
    }
}

/// Category grid page controller.
pub struct ProductGrid<S> {
    loader: PaginatedLoader<S>,
}

impl<S: PageSource> ProductGrid<S> {
    #[must_use]
    pub const fn new(loader: PaginatedLoader<S>) -> Self {
        Self { loader }
    }

    #[must_use]
    pub const fn loader(&self) -> &PaginatedLoader<S> {
        &self.loader
    }

    /// Adopt the server-rendered page and record it as the current history entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed does not name a valid category.
    pub async fn start(&self, seed: &GridSeed, location: &str) -> Result<GridStart, QueryKeyError> {
        let start = seed.resolve(location)?;
        self.loader
            .adopt_rendered(&start.key, start.current_page, start.total_pages)
            .await;
        self.loader.replace_history(location, start.current_page);
        info!(
            key = %start.key,
            page = start.current_page,
            total = start.total_pages,
            "Product grid started"
        );
        Ok(start)
    }

    /// Load the next page of the active category.
    pub async fn load_more(&self) -> LoadOutcome {
        match self.loader.active_key().await {
            Some(key) => self.loader.advance(&key).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// Switch to another category without a page load.
    pub async fn select_category(&self, path: &str) -> LoadOutcome {
        self.loader.navigate_category(path).await
    }

    /// Handle a history back/forward to `path` by reloading it.
    pub async fn on_history_pop(&self, path: &str) {
        self.loader.leave_to(path).await;
    }

    /// Tear down the loader.
    pub async fn destroy(&self) {
        self.loader.destroy().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::loader::{LoaderStatus, ViewUpdate};
    use crate::testing::{MockSource, page_of};

    #[test]
    fn test_seed_from_data_attributes() {
        let seed = GridSeed {
            current_page: Some(2),
            total_pages: Some(5),
            base_url: Some("/shop/mugs".into()),
        };
        let start = seed.resolve("/whatever/").unwrap();
        assert_eq!(start.key, QueryKey::category("/shop/mugs/").unwrap());
        assert_eq!((start.current_page, start.total_pages), (2, 5));
    }

    #[test]
    fn test_seed_from_location() {
        let start = GridSeed::default().resolve("/shop/mugs/page/3/").unwrap();
        assert_eq!(start.key.base_path(), "/shop/mugs/");
        assert_eq!(start.current_page, 3);
        assert_eq!(start.total_pages, 1);
    }

    #[tokio::test]
    async fn test_start_and_load_more() {
        let source = MockSource::default();
        source.script("/shop/page/2/index.json", [page_of("p2", 12, 2)]);
        let config = LoaderConfig {
            preload_ahead: false,
            ..LoaderConfig::default()
        };
        let (loader, mut rx) = PaginatedLoader::new(source.clone(), config);
        let grid = ProductGrid::new(loader);

        let seed = GridSeed {
            current_page: Some(1),
            total_pages: Some(2),
            base_url: Some("/shop/".into()),
        };
        grid.start(&seed, "/shop/").await.unwrap();
        assert_eq!(source.total_calls(), 0);

        assert_eq!(
            grid.load_more().await,
            LoadOutcome::Loaded { page: 2, products: 12 }
        );
        assert_eq!(grid.loader().snapshot().await.status, LoaderStatus::Exhausted);
        assert_eq!(grid.load_more().await, LoadOutcome::Skipped);

        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        assert_eq!(updates.last(), Some(&ViewUpdate::Exhausted));
    }

    #[tokio::test]
    async fn test_select_category() {
        let source = MockSource::default();
        source.script("/shop/tea/index.json", [page_of("t", 4, 3)]);
        let (loader, _rx) = PaginatedLoader::new(source, LoaderConfig::default());
        let grid = ProductGrid::new(loader);

        grid.start(&GridSeed::default(), "/shop/").await.unwrap();
        let outcome = grid.select_category("/shop/tea/").await;
        assert!(outcome.is_loaded());

        let snapshot = grid.loader().snapshot().await;
        assert_eq!(snapshot.key, Some(QueryKey::category("/shop/tea/").unwrap()));
        assert_eq!(snapshot.products.len(), 4);
    }

    #[tokio::test]
    async fn test_start_records_initial_history_entry() {
        let (loader, mut rx) = PaginatedLoader::new(MockSource::default(), LoaderConfig::default());
        let grid = ProductGrid::new(loader);

        grid.start(&GridSeed::default(), "/shop/mugs/page/2/").await.unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            ViewUpdate::HistoryReplaced {
                path: "/shop/mugs/page/2/".to_owned(),
                page: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_start_without_history() {
        let config = LoaderConfig {
            enable_history: false,
            ..LoaderConfig::default()
        };
        let (loader, mut rx) = PaginatedLoader::new(MockSource::default(), config);
        let grid = ProductGrid::new(loader);

        grid.start(&GridSeed::default(), "/shop/").await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_history_pop_after_switch_reloads() {
        let source = MockSource::default();
        source.script("/shop/tea/index.json", [page_of("t", 4, 3)]);
        let config = LoaderConfig {
            preload_ahead: false,
            ..LoaderConfig::default()
        };
        let (loader, mut rx) = PaginatedLoader::new(source.clone(), config);
        let grid = ProductGrid::new(loader);

        grid.start(&GridSeed::default(), "/shop/mugs/").await.unwrap();
        assert!(grid.select_category("/shop/tea/").await.is_loaded());
        while rx.try_recv().is_ok() {}

        grid.on_history_pop("/shop/mugs/").await;
        assert_eq!(
            rx.try_recv().unwrap(),
            ViewUpdate::NavigateTo {
                path: "/shop/mugs/".to_owned()
            }
        );

        // The switched-to key no longer paginates.
        let snapshot = grid.loader().snapshot().await;
        assert_eq!(snapshot.key, None);
        assert_eq!(grid.load_more().await, LoadOutcome::Skipped);
        assert_eq!(source.calls_to("/shop/tea/page/2/index.json"), 0);
    }
}
