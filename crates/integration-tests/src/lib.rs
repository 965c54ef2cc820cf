//! Integration tests for giftgrid.
//!
//! The tests run the storefront against a fixture site: an in-process
//! `axum` server that answers page paths with scripted JSON payloads or
//! status codes and counts the requests it receives.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p giftgrid-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use giftgrid_storefront::StorefrontConfig;
use giftgrid_storefront::config::ConfigError;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A scripted response.
#[derive(Debug, Clone)]
pub enum Fixture {
    /// 200 with a JSON body.
    Json(Value),
    /// 200 with a raw body.
    Raw(&'static str),
    /// Empty body with the given status.
    Status(u16),
}

#[derive(Default)]
struct SiteState {
    /// Responses per path; the last one repeats.
    routes: HashMap<String, VecDeque<Fixture>>,
    hits: HashMap<String, usize>,
}

type Shared = Arc<Mutex<SiteState>>;

fn lock(state: &Shared) -> MutexGuard<'_, SiteState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process fixture site.
pub struct FixtureSite {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl FixtureSite {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Shared::default();
        let app = Router::new().fallback(respond).with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("fixture site stopped: {e}");
            }
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// Origin of the site, with a trailing slash.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Configuration pointing at this site, with defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is invalid.
    pub fn config(&self, overrides: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let url = self.url();
        StorefrontConfig::from_lookup(|key| {
            if key == "GIFTGRID_SITE_URL" {
                return Some(url.clone());
            }
            overrides
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned())
        })
    }

    /// Answer `path` with `fixture` for every request.
    pub fn serve(&self, path: &str, fixture: Fixture) {
        self.serve_sequence(path, [fixture]);
    }

    /// Answer `path` with `fixtures` in order, repeating the last one.
    pub fn serve_sequence(&self, path: &str, fixtures: impl IntoIterator<Item = Fixture>) {
        lock(&self.state)
            .routes
            .insert(path.to_owned(), fixtures.into_iter().collect());
    }

    /// Requests received for `path`.
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        lock(&self.state).hits.get(path).copied().unwrap_or(0)
    }

    /// Requests received in total.
    #[must_use]
    pub fn total_hits(&self) -> usize {
        lock(&self.state).hits.values().sum()
    }
}

impl Drop for FixtureSite {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn respond(State(state): State<Shared>, uri: Uri) -> Response {
    let path = uri.path().to_owned();
    let fixture = {
        let mut state = lock(&state);
        *state.hits.entry(path.clone()).or_default() += 1;
        match state.routes.get_mut(&path) {
            Some(fixtures) if fixtures.len() > 1 => fixtures.pop_front(),
            Some(fixtures) => fixtures.front().cloned(),
            None => None,
        }
    };

    match fixture {
        Some(Fixture::Json(body)) => axum::Json(body).into_response(),
        Some(Fixture::Raw(body)) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Some(Fixture::Status(code)) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A `{ products, totalPages }` payload of `count` products titled
/// `"{prefix} {i}"`.
#[must_use]
pub fn page_json(prefix: &str, count: usize, total_pages: u32) -> Value {
    let products: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("{prefix}-{i}"),
                "title": format!("{prefix} {i}"),
                "price": 25.0,
                "discount": if i == 0 { json!(20) } else { Value::Null },
                "images": [format!("/img/{prefix}-{i}.jpg")],
                "rating": 4.5,
                "review_count": 1200,
                "ecommerce": "Amazon",
                "ecommerce_url": format!("https://amazon.example/{prefix}-{i}"),
            })
        })
        .collect();
    json!({ "products": products, "totalPages": total_pages })
}

/// A `Fixture::Json` page payload.
#[must_use]
pub fn page(prefix: &str, count: usize, total_pages: u32) -> Fixture {
    Fixture::Json(page_json(prefix, count, total_pages))
}
