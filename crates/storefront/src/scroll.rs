//! Scroll-driven pagination triggers.
//!
//! [`ScrollTrigger`] turns scroll geometry into "advance" or "preload"
//! signals. [`ScrollDriver`] runs it as a task fed by a channel of
//! [`ScrollEvent`]s and forwards the signals to a [`PaginatedLoader`].
//! Duplicate signals are harmless: the loader drops an advance while a fetch
//! is in flight.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::config::ScrollConfig;
use crate::loader::PaginatedLoader;
use crate::source::PageSource;

/// Viewport and content geometry at a scroll event, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub viewport_height: f64,
    /// Offset of the product grid from the top of the document.
    pub content_top: f64,
    pub content_height: f64,
}

impl ScrollMetrics {
    /// Bottom edge of the viewport.
    #[must_use]
    pub fn viewport_bottom(&self) -> f64 {
        self.scroll_y + self.viewport_height
    }

    #[must_use]
    pub fn content_bottom(&self) -> f64 {
        self.content_top + self.content_height
    }
}

/// Input of the scroll trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScrollEvent {
    /// The page scrolled.
    Scrolled(ScrollMetrics),
    /// The end-of-grid sentinel became visible.
    SentinelVisible,
}

/// What a scroll event asks the loader to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Advance,
    Preload,
}

/// Decides when scrolling should load or preload.
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    config: ScrollConfig,
    last_preload_check: Option<Instant>,
}

impl ScrollTrigger {
    #[must_use]
    pub const fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            last_preload_check: None,
        }
    }

    /// Evaluate one event.
    ///
    /// Advance fires when the viewport is within `trigger_distance` of the
    /// end of the grid. Otherwise preload fires once the viewport passes
    /// `preload_ratio` of the grid, evaluated at most once per `throttle`.
    pub fn evaluate(&mut self, event: &ScrollEvent, now: Instant) -> Option<Trigger> {
        let metrics = match event {
            ScrollEvent::SentinelVisible => return Some(Trigger::Advance),
            ScrollEvent::Scrolled(metrics) => metrics,
        };

        if metrics.viewport_bottom() + self.config.trigger_distance >= metrics.content_bottom() {
            return Some(Trigger::Advance);
        }

        if self
            .last_preload_check
            .is_some_and(|last| now.duration_since(last) < self.config.throttle)
        {
            return None;
        }
        self.last_preload_check = Some(now);

        let midpoint = metrics.content_top + metrics.content_height * self.config.preload_ratio;
        (metrics.viewport_bottom() > midpoint).then_some(Trigger::Preload)
    }
}

/// Feeds scroll events into a loader.
pub struct ScrollDriver;

impl ScrollDriver {
    /// Spawn a task that evaluates events until the channel closes.
    ///
    /// Each signal targets whatever key is active on the loader at that time.
    pub fn spawn<S: PageSource>(
        loader: PaginatedLoader<S>,
        config: ScrollConfig,
        mut events: mpsc::Receiver<ScrollEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut trigger = ScrollTrigger::new(config);
            while let Some(event) = events.recv().await {
                let Some(signal) = trigger.evaluate(&event, Instant::now()) else {
                    continue;
                };
                let Some(key) = loader.active_key().await else {
                    continue;
                };

                let loader = loader.clone();
                tokio::spawn(async move {
                    let outcome = match signal {
                        Trigger::Advance => loader.advance(&key).await,
                        Trigger::Preload => loader.preload(&key).await,
                    };
                    debug!(?signal, ?outcome, "Scroll trigger handled");
                });
            }
            debug!("Scroll event channel closed");
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use giftgrid_core::QueryKey;

    use super::*;
    use crate::config::LoaderConfig;
    use crate::loader::ViewUpdate;
    use crate::testing::{MockSource, page_of};

    fn metrics(scroll_y: f64) -> ScrollEvent {
        ScrollEvent::Scrolled(ScrollMetrics {
            scroll_y,
            viewport_height: 800.0,
            content_top: 200.0,
            content_height: 3000.0,
        })
    }

    #[test]
    fn test_sentinel_always_advances() {
        let mut trigger = ScrollTrigger::new(ScrollConfig::default());
        assert_eq!(
            trigger.evaluate(&ScrollEvent::SentinelVisible, Instant::now()),
            Some(Trigger::Advance)
        );
    }

    #[test]
    fn test_advance_near_end() {
        let mut trigger = ScrollTrigger::new(ScrollConfig::default());
        // Content ends at 3200; viewport bottom 2800 + 400 reaches it.
        assert_eq!(
            trigger.evaluate(&metrics(2000.0), Instant::now()),
            Some(Trigger::Advance)
        );
        assert_ne!(
            trigger.evaluate(&metrics(1990.0), Instant::now()),
            Some(Trigger::Advance)
        );
    }

    #[test]
    fn test_preload_past_midpoint() {
        let now = Instant::now();
        let mut trigger = ScrollTrigger::new(ScrollConfig::default());
        // Midpoint is 200 + 1500 = 1700.
        assert_eq!(trigger.evaluate(&metrics(100.0), now), None);

        let later = now + Duration::from_millis(200);
        assert_eq!(trigger.evaluate(&metrics(1000.0), later), Some(Trigger::Preload));
    }

    #[test]
    fn test_preload_is_throttled() {
        let now = Instant::now();
        let mut trigger = ScrollTrigger::new(ScrollConfig::default());
        assert_eq!(trigger.evaluate(&metrics(1000.0), now), Some(Trigger::Preload));
        assert_eq!(
            trigger.evaluate(&metrics(1100.0), now + Duration::from_millis(100)),
            None
        );
        assert_eq!(
            trigger.evaluate(&metrics(1200.0), now + Duration::from_millis(160)),
            Some(Trigger::Preload)
        );
    }

    #[tokio::test]
    async fn test_driver_advances_active_key() {
        let source = MockSource::default();
        source.script("/shop/page/2/index.json", [page_of("p2", 4, 2)]);
        let config = LoaderConfig {
            preload_ahead: false,
            ..LoaderConfig::default()
        };
        let (loader, mut updates) = PaginatedLoader::new(source.clone(), config);
        let key = QueryKey::category("/shop/").unwrap();
        loader.adopt_rendered(&key, 1, 2).await;

        let (tx, rx) = mpsc::channel(8);
        let driver = ScrollDriver::spawn(loader.clone(), ScrollConfig::default(), rx);
        tx.send(ScrollEvent::SentinelVisible).await.unwrap();

        while let Some(update) = updates.recv().await {
            if matches!(update, ViewUpdate::FillPlaceholders { page: 2, .. }) {
                break;
            }
        }
        assert_eq!(source.calls_to("/shop/page/2/index.json"), 1);

        drop(tx);
        driver.await.unwrap();
    }

    #[tokio::test]
    async fn test_driver_ignores_idle_loader() {
        let source = MockSource::default();
        let (loader, _updates) = PaginatedLoader::new(source.clone(), LoaderConfig::default());

        let (tx, rx) = mpsc::channel(8);
        let driver = ScrollDriver::spawn(loader, ScrollConfig::default(), rx);
        tx.send(ScrollEvent::SentinelVisible).await.unwrap();
        drop(tx);
        driver.await.unwrap();

        assert_eq!(source.total_calls(), 0);
    }
}
