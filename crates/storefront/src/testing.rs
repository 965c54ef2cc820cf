//! Test doubles shared by unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use giftgrid_core::{Product, ProductPage};
use tokio::time::Instant;

use crate::error::LoadError;
use crate::source::PageSource;

// =============================================================================
// Scripted page source
// =============================================================================

#[derive(Debug, Clone)]
pub enum Reply {
    Page(ProductPage),
    NotFound,
    Status(u16),
    Network,
}

#[derive(Default)]
struct MockState {
    /// Replies per path; the last reply repeats.
    scripts: HashMap<String, VecDeque<Reply>>,
    calls: Vec<(String, Instant)>,
}

#[derive(Clone, Default)]
pub struct MockSource {
    state: Arc<StdMutex<MockState>>,
    latency: Duration,
}

impl MockSource {
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn script(&self, path: &str, replies: impl IntoIterator<Item = Reply>) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(path.to_owned(), replies.into_iter().collect());
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(p, _)| p == path)
            .count()
    }

    pub fn call_times(&self, path: &str) -> Vec<Instant> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, at)| *at)
            .collect()
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }
}

impl PageSource for MockSource {
    async fn fetch_page(&self, path: &str) -> Result<ProductPage, LoadError> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.calls.push((path.to_owned(), Instant::now()));
            match state.scripts.get_mut(path) {
                Some(replies) if replies.len() > 1 => replies.pop_front(),
                Some(replies) => replies.front().cloned(),
                None => None,
            }
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match reply {
            Some(Reply::Page(page)) => Ok(page),
            Some(Reply::NotFound) | None => Err(LoadError::NotFound(path.to_owned())),
            Some(Reply::Status(status)) => Err(LoadError::Http {
                status,
                path: path.to_owned(),
            }),
            Some(Reply::Network) => Err(LoadError::Network("connection reset".to_owned())),
        }
    }
}

pub fn page_of(prefix: &str, count: usize, total: u32) -> Reply {
    Reply::Page(ProductPage {
        products: (0..count)
            .map(|i| Product {
                id: None,
                title: format!("{prefix} {i}"),
                price: 10.0,
                discount: None,
                images: Vec::new(),
                rating: None,
                review_count: None,
                ecommerce: None,
                ecommerce_url: None,
                category: None,
            })
            .collect(),
        total_pages: Some(total),
    })
}

