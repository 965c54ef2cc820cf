//! Per-key loader state.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use giftgrid_core::{Product, ProductPage, QueryKey};
use serde::Serialize;
use tokio::task::JoinHandle;

/// Where the loader is in its lifecycle for the active key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoaderStatus {
    /// Nothing requested yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Waiting for a scheduled retry.
    Retrying { page: u32, attempt: u32 },
    /// The page was loaded and more pages remain.
    Loaded { page: u32 },
    /// The query has no results. Terminal until reset.
    NoResults,
    /// Pagination ended on a failure; rendered content stays.
    NoMoreResults,
    /// Every page was loaded; rendered content stays.
    Exhausted,
    /// The first page could not be loaded. Terminal until reset.
    Error,
}

impl LoaderStatus {
    /// Whether forward pagination has stopped for good.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::NoResults | Self::NoMoreResults | Self::Exhausted | Self::Error
        )
    }
}

/// Mutable state of the active query key.
///
/// Lives behind the loader's mutex; every field is reset together.
#[derive(Debug)]
pub struct LoaderState {
    pub key: Option<QueryKey>,
    pub generation: u64,
    pub current_page: u32,
    pub total_pages: u32,
    pub is_loading: bool,
    pub loaded_pages: BTreeSet<u32>,
    pub failed_pages: BTreeMap<u32, u32>,
    pub preloaded_pages: HashMap<u32, ProductPage>,
    pub last_preloaded_page: u32,
    pub preloading: bool,
    pub products: Vec<Product>,
    pub status: LoaderStatus,
    pub pending: Vec<JoinHandle<()>>,
}

impl Default for LoaderState {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            current_page: 0,
            total_pages: 1,
            is_loading: false,
            loaded_pages: BTreeSet::new(),
            failed_pages: BTreeMap::new(),
            preloaded_pages: HashMap::new(),
            last_preloaded_page: 0,
            preloading: false,
            products: Vec::new(),
            status: LoaderStatus::Idle,
            pending: Vec::new(),
        }
    }
}

impl LoaderState {
    /// Clear everything for `key`, cancel scheduled tasks and start a new generation.
    pub fn reset(&mut self, key: Option<QueryKey>) {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            key,
            generation,
            ..Self::default()
        };
    }

    /// Whether `key` is the active key.
    pub fn is_active(&self, key: &QueryKey) -> bool {
        self.key.as_ref() == Some(key)
    }

    /// Release the loading gate with a final status.
    pub fn finish(&mut self, status: LoaderStatus) {
        debug_assert!(self.is_loading, "loading gate released twice");
        self.is_loading = false;
        self.status = status;
    }

    /// Keep a scheduled task so a reset can cancel it.
    pub fn track(&mut self, handle: JoinHandle<()>) {
        self.pending.retain(|pending| !pending.is_finished());
        self.pending.push(handle);
    }

    pub fn snapshot(&self) -> LoaderSnapshot {
        LoaderSnapshot {
            key: self.key.clone(),
            generation: self.generation,
            current_page: self.current_page,
            total_pages: self.total_pages,
            is_loading: self.is_loading,
            loaded_pages: self.loaded_pages.clone(),
            failed_pages: self.failed_pages.clone(),
            preloaded_pages: self.preloaded_pages.keys().copied().collect(),
            last_preloaded_page: self.last_preloaded_page,
            preloading: self.preloading,
            products: self.products.clone(),
            status: self.status,
        }
    }
}

/// Read-only copy of the loader state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoaderSnapshot {
    pub key: Option<QueryKey>,
    pub generation: u64,
    pub current_page: u32,
    pub total_pages: u32,
    pub is_loading: bool,
    pub loaded_pages: BTreeSet<u32>,
    pub failed_pages: BTreeMap<u32, u32>,
    /// Pages held in the preload cache.
    pub preloaded_pages: BTreeSet<u32>,
    pub last_preloaded_page: u32,
    /// A preload is in flight.
    pub preloading: bool,
    pub products: Vec<Product>,
    pub status: LoaderStatus,
}
