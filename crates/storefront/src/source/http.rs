//! HTTP page source for a generated static site.
//!
//! Uses `reqwest` for HTTP and caches successful payloads using `moka`
//! (5-minute TTL by default). Failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use giftgrid_core::ProductPage;
use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use tracing::{debug, instrument};
use url::Url;

use super::PageSource;
use crate::config::{CacheConfig, StorefrontConfig};
use crate::error::LoadError;

/// Fetches page payloads from the site over HTTP.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct HttpPageSource {
    inner: Arc<HttpPageSourceInner>,
}

struct HttpPageSourceInner {
    client: reqwest::Client,
    site_url: Url,
    cache: Option<Cache<String, ProductPage>>,
}

impl HttpPageSource {
    /// Create a source from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.site_url.clone(), config.cache))
    }

    /// Create a source around an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, site_url: Url, cache: CacheConfig) -> Self {
        let cache = (cache.ttl > Duration::ZERO).then(|| {
            Cache::builder()
                .max_capacity(cache.capacity)
                .time_to_live(cache.ttl)
                .build()
        });

        Self {
            inner: Arc::new(HttpPageSourceInner {
                client,
                site_url,
                cache,
            }),
        }
    }

    /// Origin page paths are resolved against.
    #[must_use]
    pub fn site_url(&self) -> &Url {
        &self.inner.site_url
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn fetch(&self, path: &str) -> Result<ProductPage, LoadError> {
        if let Some(cache) = &self.inner.cache
            && let Some(page) = cache.get(path).await
        {
            debug!("Cache hit for page");
            return Ok(page);
        }

        let url = self.inner.site_url.join(path)?;
        let response = self
            .inner
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LoadError::NotFound(path.to_owned()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Site returned non-success status"
            );
            return Err(LoadError::Http {
                status: status.as_u16(),
                path: path.to_owned(),
            });
        }

        let page: ProductPage = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse page payload"
            );
            LoadError::Parse(e)
        })?;

        if let Some(cache) = &self.inner.cache {
            cache.insert(path.to_owned(), page.clone()).await;
        }

        Ok(page)
    }
}

impl PageSource for HttpPageSource {
    async fn fetch_page(&self, path: &str) -> Result<ProductPage, LoadError> {
        self.fetch(path).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ttl_disables_cache() {
        let source = HttpPageSource::with_client(
            reqwest::Client::new(),
            Url::parse("http://localhost:1313/").unwrap(),
            CacheConfig {
                ttl: Duration::ZERO,
                capacity: 10,
            },
        );
        assert!(source.inner.cache.is_none());
    }

    #[test]
    fn test_default_cache_enabled() {
        let source = HttpPageSource::with_client(
            reqwest::Client::new(),
            Url::parse("http://localhost:1313/").unwrap(),
            CacheConfig::default(),
        );
        assert!(source.inner.cache.is_some());
        assert_eq!(source.site_url().as_str(), "http://localhost:1313/");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let source = HttpPageSource::with_client(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:9/").unwrap(),
            CacheConfig::default(),
        );
        let err = source.fetch_page("/index.json").await.unwrap_err();
        assert!(matches!(err, LoadError::Network(_)));
    }
}
