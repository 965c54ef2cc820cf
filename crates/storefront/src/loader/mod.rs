//! Paginated product loader.
//!
//! One loader serves both the gift finder and category grids. It owns the
//! state of a single active [`QueryKey`], fetches pages from a
//! [`PageSource`] and reports every visible change as a [`ViewUpdate`] on an
//! unbounded channel.
//!
//! # Recovery policy
//!
//! The first page of a key (and the pages it falls through to) form the
//! initial session:
//!
//! - 404 is a terminal empty state.
//! - Any other HTTP failure falls through to the next page, up to
//!   `max_cascade_attempts` pages in total, then shows the empty state.
//! - Network and parse failures are retried with linear backoff
//!   (`retry_interval × attempt`), then show a blocking error.
//!
//! Later pages never surface an error: network and parse failures are
//! retried silently a few times, everything else ends pagination with
//! "no more results".
//!
//! # Concurrency
//!
//! State lives behind a [`tokio::sync::Mutex`] that is never held across a
//! fetch. `is_loading` allows one page fetch at a time; a load of a later
//! page waits for a preload in flight and takes its payload. Every reset bumps a
//! generation counter; a response whose generation no longer matches is
//! dropped. Retry and preload timers are spawned tasks that are aborted on
//! reset.

mod state;
mod update;

use std::sync::Arc;
use std::time::Duration;

use giftgrid_core::{ProductPage, QueryKey};
use tokio::sync::{Mutex, MutexGuard, Notify, mpsc};
use tracing::{debug, error, info, instrument, warn};

use crate::config::LoaderConfig;
use crate::error::{FailureClass, LoadError};
use crate::render::product_cards;
use crate::source::PageSource;

pub use state::{LoaderSnapshot, LoaderStatus};
pub use update::{LoadOutcome, ViewUpdate};

use state::LoaderState;

/// Message of the blocking error panel.
const LOAD_FAILED_MESSAGE: &str =
    "We couldn't load products right now. Please check your connection and try again.";

/// How a request relates to the rendered grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Session {
    /// First page of a key; replaces the grid.
    Initial,
    /// First page of a client-side category switch.
    Navigation,
    /// A page appended after the first.
    Next,
}

impl Session {
    const fn replaces_grid(self) -> bool {
        matches!(self, Self::Initial | Self::Navigation)
    }
}

/// A page fetch tied to the generation it was issued in.
#[derive(Debug, Clone)]
struct Request {
    key: QueryKey,
    page: u32,
    generation: u64,
    session: Session,
    /// Transient failures already seen for this page.
    attempt: u32,
}

/// What to do after a failed fetch.
enum Step {
    Done(LoadOutcome),
    /// Fetch another page within the same session.
    FallThrough(u32),
}

/// Paginated loader for one active query key.
///
/// Cheaply cloneable; clones share state and the update channel.
pub struct PaginatedLoader<S> {
    inner: Arc<LoaderInner<S>>,
}

impl<S> Clone for PaginatedLoader<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct LoaderInner<S> {
    source: S,
    config: LoaderConfig,
    state: Mutex<LoaderState>,
    /// Signalled when a preload settles or the state is reset.
    preload_done: Notify,
    updates: mpsc::UnboundedSender<ViewUpdate>,
}

impl<S: PageSource> PaginatedLoader<S> {
    /// Create a loader and the receiving end of its view updates.
    #[must_use]
    pub fn new(source: S, config: LoaderConfig) -> (Self, mpsc::UnboundedReceiver<ViewUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let loader = Self {
            inner: Arc::new(LoaderInner {
                source,
                config,
                state: Mutex::new(LoaderState::default()),
                preload_done: Notify::new(),
                updates,
            }),
        };
        (loader, rx)
    }

    /// Loader policy.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    /// The page source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> LoaderSnapshot {
        self.inner.state.lock().await.snapshot()
    }

    /// The key currently being paginated.
    pub async fn active_key(&self) -> Option<QueryKey> {
        self.inner.state.lock().await.key.clone()
    }

    /// Load a page of `key`.
    ///
    /// A key other than the active one resets the state first. Page 1 starts
    /// a fresh initial session and replaces the grid; later pages append.
    /// Dropped with [`LoadOutcome::Busy`] while another fetch is in flight
    /// or, for a later page, while a retry is pending. A later page waits for
    /// a preload in flight.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn load_page(&self, key: &QueryKey, page: u32) -> LoadOutcome {
        let page = page.max(1);
        let mut state = self.inner.state.lock().await;

        if state.is_active(key) {
            if page > 1 {
                state = self.wait_for_preload(state).await;
            }
            if state.is_loading {
                debug!("Fetch already in flight, dropping load");
                return LoadOutcome::Busy;
            }
            if page > 1 && matches!(state.status, LoaderStatus::Retrying { .. }) {
                debug!("Retry pending, dropping load");
                return LoadOutcome::Busy;
            }
        }
        if page == 1 || !state.is_active(key) {
            self.reset_locked(&mut state, key);
        }

        let session = if page == 1 {
            Session::Initial
        } else {
            Session::Next
        };
        match self.begin(&mut state, key, page, session) {
            Ok(request) => self.dispatch(state, request).await,
            Err(outcome) => outcome,
        }
    }

    /// Load the page after the current one.
    ///
    /// No-op unless the last load succeeded and pages remain. Safe to call
    /// on every scroll event: concurrent calls collapse into one fetch. A
    /// preload in flight is awaited and its payload used.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn advance(&self, key: &QueryKey) -> LoadOutcome {
        let state = self.inner.state.lock().await;
        let mut state = self.wait_for_preload(state).await;

        if !state.is_active(key) {
            return LoadOutcome::Skipped;
        }
        if state.is_loading {
            return LoadOutcome::Busy;
        }
        if !matches!(state.status, LoaderStatus::Loaded { .. })
            || state.current_page >= state.total_pages
        {
            return LoadOutcome::Skipped;
        }

        let target = state.current_page + 1;
        match self.begin(&mut state, key, target, Session::Next) {
            Ok(request) => self.dispatch(state, request).await,
            Err(outcome) => outcome,
        }
    }

    /// Clear all state and make `key` the active key.
    ///
    /// Pending retries and preloads are cancelled and in-flight responses
    /// for the previous key will be discarded.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn reset_key(&self, key: &QueryKey) {
        let mut state = self.inner.state.lock().await;
        self.reset_locked(&mut state, key);
    }

    /// Reset to `key` and load its first page.
    pub async fn navigate(&self, key: &QueryKey) -> LoadOutcome {
        self.start_fresh(key, Session::Initial).await
    }

    /// Client-side switch to a category listing.
    ///
    /// On success a history entry is emitted (when enabled); on any failure
    /// a full-page navigation to `path` is requested instead.
    #[instrument(skip(self))]
    pub async fn navigate_category(&self, path: &str) -> LoadOutcome {
        match QueryKey::category(path) {
            Ok(key) => self.start_fresh(&key, Session::Navigation).await,
            Err(e) => {
                warn!(error = %e, "Invalid category path, falling back to navigation");
                self.emit(ViewUpdate::NavigateTo {
                    path: path.to_owned(),
                });
                LoadOutcome::Failed
            }
        }
    }

    /// Speculatively fetch the page after the current one into the preload cache.
    ///
    /// A page is preloaded at most once per key and never after it was loaded.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn preload(&self, key: &QueryKey) -> LoadOutcome {
        let (target, generation) = {
            let mut state = self.inner.state.lock().await;
            if !state.is_active(key) || state.current_page == 0 || state.status.is_terminal() {
                return LoadOutcome::Skipped;
            }
            if state.is_loading
                || state.preloading
                || matches!(state.status, LoaderStatus::Retrying { .. })
            {
                return LoadOutcome::Busy;
            }

            let target = state.current_page + 1;
            if target > state.total_pages
                || target <= state.last_preloaded_page
                || state.loaded_pages.contains(&target)
                || state.preloaded_pages.contains_key(&target)
            {
                return LoadOutcome::Skipped;
            }

            state.preloading = true;
            state.last_preloaded_page = target;
            (target, state.generation)
        };

        debug!(page = target, "Preloading page");
        let result = self.inner.source.fetch_page(&key.page_path(target)).await;

        let mut state = self.inner.state.lock().await;
        self.inner.preload_done.notify_waiters();
        if state.generation != generation {
            return LoadOutcome::Stale;
        }
        state.preloading = false;

        match result {
            Ok(payload) if !state.loaded_pages.contains(&target) => {
                state.preloaded_pages.insert(target, payload);
                LoadOutcome::Preloaded { page: target }
            }
            Ok(_) => LoadOutcome::Skipped,
            Err(e) => {
                debug!(page = target, error = %e, "Preload failed");
                LoadOutcome::Skipped
            }
        }
    }

    /// Seed the state from a server-rendered page.
    ///
    /// Page `current` counts as loaded without a fetch; `advance` continues
    /// from there.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn adopt_rendered(&self, key: &QueryKey, current: u32, total: u32) {
        let mut state = self.inner.state.lock().await;
        self.reset_state(&mut state, Some(key.clone()));

        let current = current.max(1);
        state.current_page = current;
        state.total_pages = total.max(current);
        state.loaded_pages.insert(current);
        state.status = if current >= state.total_pages {
            LoaderStatus::Exhausted
        } else {
            LoaderStatus::Loaded { page: current }
        };

        debug!(current, total = state.total_pages, "Adopted rendered page");
    }

    /// Cancel pending work and clear all state.
    pub async fn destroy(&self) {
        let mut state = self.inner.state.lock().await;
        self.reset_state(&mut state, None);
        self.emit(ViewUpdate::Destroyed);
        debug!("Loader destroyed");
    }

    /// Record the entry the page was loaded at, so that history holds the
    /// rendered page before any client-side navigation is pushed.
    pub fn replace_history(&self, path: &str, page: u32) {
        if self.inner.config.enable_history {
            self.emit(ViewUpdate::HistoryReplaced {
                path: path.to_owned(),
                page,
            });
        }
    }

    /// Leave the client-side state for a full page load of `path`.
    ///
    /// Used on history back/forward: the entry may belong to another key,
    /// so pending work is cancelled and the view reloads.
    #[instrument(skip(self))]
    pub async fn leave_to(&self, path: &str) {
        let mut state = self.inner.state.lock().await;
        self.reset_state(&mut state, None);
        info!("History navigation, reloading page");
        self.emit(ViewUpdate::NavigateTo {
            path: path.to_owned(),
        });
    }

    async fn start_fresh(&self, key: &QueryKey, session: Session) -> LoadOutcome {
        let mut state = self.inner.state.lock().await;
        self.reset_locked(&mut state, key);
        match self.begin(&mut state, key, 1, session) {
            Ok(request) => self.dispatch(state, request).await,
            Err(outcome) => outcome,
        }
    }

    fn reset_locked(&self, state: &mut LoaderState, key: &QueryKey) {
        self.reset_state(state, Some(key.clone()));
        self.emit(ViewUpdate::Reset {
            key: key.base_path(),
        });
    }

    fn reset_state(&self, state: &mut LoaderState, key: Option<QueryKey>) {
        state.reset(key);
        // An aborted preload never signals; release anyone waiting on it.
        self.inner.preload_done.notify_waiters();
    }

    /// Hold off until no preload is in flight.
    async fn wait_for_preload<'a>(
        &'a self,
        mut state: MutexGuard<'a, LoaderState>,
    ) -> MutexGuard<'a, LoaderState> {
        while state.preloading {
            let done = self.inner.preload_done.notified();
            drop(state);
            debug!("Waiting for preload in flight");
            done.await;
            state = self.inner.state.lock().await;
        }
        state
    }

    /// Take the loading gate for a new request.
    fn begin(
        &self,
        state: &mut LoaderState,
        key: &QueryKey,
        page: u32,
        session: Session,
    ) -> Result<Request, LoadOutcome> {
        if state.is_loading {
            return Err(LoadOutcome::Busy);
        }
        if state.loaded_pages.contains(&page) {
            return Err(LoadOutcome::Skipped);
        }

        state.is_loading = true;
        state.status = LoaderStatus::Loading;

        if session.replaces_grid() {
            self.emit(ViewUpdate::LoadingStarted);
        } else {
            self.emit(ViewUpdate::Placeholders {
                page,
                count: self.inner.config.page_size,
            });
        }

        Ok(Request {
            key: key.clone(),
            page,
            generation: state.generation,
            session,
            attempt: 0,
        })
    }

    /// Serve a request from the preload cache, or fetch it.
    async fn dispatch(&self, mut state: MutexGuard<'_, LoaderState>, request: Request) -> LoadOutcome {
        if let Some(payload) = state.preloaded_pages.remove(&request.page) {
            debug!(page = request.page, "Using preloaded page");
            return self.apply_page(&mut state, &request, payload);
        }
        drop(state);
        self.run(request).await
    }

    /// Continue a request after a retry delay.
    async fn resume(&self, request: Request) -> LoadOutcome {
        let mut state = self.inner.state.lock().await;
        if state.generation != request.generation {
            return LoadOutcome::Stale;
        }
        if state.is_loading {
            return LoadOutcome::Busy;
        }
        state.is_loading = true;
        state.status = LoaderStatus::Loading;
        self.dispatch(state, request).await
    }

    async fn run(&self, mut request: Request) -> LoadOutcome {
        loop {
            let path = request.key.page_path(request.page);
            info!(page = request.page, path = %path, "Loading page");
            let result = self.inner.source.fetch_page(&path).await;

            let mut state = self.inner.state.lock().await;
            if state.generation != request.generation {
                debug!(page = request.page, "Discarding stale response");
                return LoadOutcome::Stale;
            }

            match result {
                Ok(payload) => return self.apply_page(&mut state, &request, payload),
                Err(err) => match self.handle_failure(&mut state, &request, &err) {
                    Step::Done(outcome) => return outcome,
                    Step::FallThrough(page) => {
                        request.page = page;
                        request.attempt = 0;
                    }
                },
            }
        }
    }

    fn apply_page(&self, state: &mut LoaderState, request: &Request, payload: ProductPage) -> LoadOutcome {
        let page = request.page;
        let reported_total = payload.reported_total_pages();
        let products = payload.products;
        let count = products.len();

        state.is_loading = false;
        state.current_page = page;
        state.loaded_pages.insert(page);
        state.preloaded_pages.remove(&page);
        state.failed_pages.remove(&page);

        if request.session.replaces_grid() {
            state.total_pages = reported_total.unwrap_or(1);
            self.emit(ViewUpdate::LoadingFinished);
            if request.session == Session::Navigation && self.inner.config.enable_history {
                self.emit(ViewUpdate::HistoryPushed {
                    path: request.key.base_path(),
                });
            }

            if products.is_empty() {
                info!(page, "Query has no products");
                state.status = LoaderStatus::NoResults;
                self.emit(ViewUpdate::Empty);
                return LoadOutcome::NoResults;
            }

            let cards = product_cards(&products, 0);
            state.products = products;
            self.emit(ViewUpdate::Replace { page, cards });
        } else {
            if let Some(total) = reported_total {
                state.total_pages = total;
            }
            let cards = product_cards(&products, state.products.len());
            state.products.extend(products);
            self.emit(ViewUpdate::FillPlaceholders { page, cards });
        }

        info!(page, count, total_pages = state.total_pages, "Loaded page");

        if state.current_page >= state.total_pages {
            state.status = LoaderStatus::Exhausted;
            self.emit(ViewUpdate::Exhausted);
        } else {
            state.status = LoaderStatus::Loaded { page };
            if self.inner.config.preload_ahead {
                self.schedule_preload(state, &request.key);
            }
        }

        LoadOutcome::Loaded {
            page,
            products: count,
        }
    }

    fn handle_failure(&self, state: &mut LoaderState, request: &Request, err: &LoadError) -> Step {
        let page = request.page;
        let config = &self.inner.config;

        match (request.session, err.class()) {
            (Session::Navigation, _) => {
                warn!(page, error = %err, "Category load failed, falling back to navigation");
                state.finish(LoaderStatus::Error);
                self.emit(ViewUpdate::LoadingFinished);
                self.emit(ViewUpdate::NavigateTo {
                    path: request.key.base_path(),
                });
                Step::Done(LoadOutcome::Failed)
            }

            (Session::Initial, FailureClass::NotFound) => {
                info!(page, "No results for query");
                state.finish(LoaderStatus::NoResults);
                state.total_pages = 0;
                self.emit(ViewUpdate::LoadingFinished);
                self.emit(ViewUpdate::Empty);
                Step::Done(LoadOutcome::NoResults)
            }

            (Session::Initial, FailureClass::Server | FailureClass::Render) => {
                *state.failed_pages.entry(page).or_insert(0) += 1;
                let attempted = u32::try_from(state.failed_pages.len()).unwrap_or(u32::MAX);

                if attempted < config.max_cascade_attempts {
                    let next = (page + 1..)
                        .find(|p| !state.failed_pages.contains_key(p))
                        .unwrap_or(page + 1);
                    warn!(page, next, error = %err, "Page failed, trying next page");
                    Step::FallThrough(next)
                } else {
                    error!(page, attempted, error = %err, "No page of the query could be loaded");
                    state.finish(LoaderStatus::NoResults);
                    state.total_pages = 0;
                    self.emit(ViewUpdate::LoadingFinished);
                    self.emit(ViewUpdate::Empty);
                    Step::Done(LoadOutcome::NoResults)
                }
            }

            (Session::Initial, FailureClass::Transient) => {
                let attempt = request.attempt + 1;
                if attempt <= config.first_page_retries {
                    let delay = config.retry_interval * attempt;
                    warn!(page, attempt, ?delay, error = %err, "Retrying page");
                    state.finish(LoaderStatus::Retrying { page, attempt });
                    self.emit(ViewUpdate::Retrying {
                        page,
                        attempt,
                        delay,
                    });
                    self.schedule_retry(
                        state,
                        Request {
                            attempt,
                            ..request.clone()
                        },
                        delay,
                    );
                    Step::Done(LoadOutcome::RetryScheduled { page, attempt })
                } else {
                    error!(page, error = %err, "Giving up on first page");
                    state.finish(LoaderStatus::Error);
                    self.emit(ViewUpdate::LoadingFinished);
                    self.emit(ViewUpdate::Error {
                        message: LOAD_FAILED_MESSAGE.to_owned(),
                    });
                    Step::Done(LoadOutcome::Failed)
                }
            }

            (Session::Next, class) => {
                let failures = {
                    let count = state.failed_pages.entry(page).or_insert(0);
                    *count += 1;
                    *count
                };

                if class == FailureClass::Transient && failures <= config.page_retry_attempts {
                    let delay = config.page_retry_delay * failures;
                    debug!(page, attempt = failures, error = %err, "Retrying page silently");
                    state.finish(LoaderStatus::Retrying {
                        page,
                        attempt: failures,
                    });
                    self.schedule_retry(
                        state,
                        Request {
                            attempt: failures,
                            ..request.clone()
                        },
                        delay,
                    );
                    return Step::Done(LoadOutcome::RetryScheduled {
                        page,
                        attempt: failures,
                    });
                }

                warn!(page, error = %err, "Pagination stopped");
                state.finish(LoaderStatus::NoMoreResults);
                self.emit(ViewUpdate::ClearPlaceholders { page });
                self.emit(ViewUpdate::NoMoreResults);
                Step::Done(LoadOutcome::NoMoreResults)
            }
        }
    }

    fn schedule_retry(&self, state: &mut LoaderState, request: Request, delay: Duration) {
        let loader = self.clone();
        state.track(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            loader.resume(request).await;
        }));
    }

    fn schedule_preload(&self, state: &mut LoaderState, key: &QueryKey) {
        let loader = self.clone();
        let key = key.clone();
        state.track(tokio::spawn(async move {
            loader.preload(&key).await;
        }));
    }

    fn emit(&self, update: ViewUpdate) {
        // A dropped receiver only means nobody is rendering.
        let _ = self.inner.updates.send(update);
    }
}
