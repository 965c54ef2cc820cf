//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GIFTGRID_SITE_URL` - Origin of the generated site (e.g., <https://gifts.example.com/>)
//!
//! ## Optional
//! - `GIFTGRID_REQUEST_TIMEOUT_SECS` - HTTP timeout (default: 30)
//! - `GIFTGRID_CACHE_TTL_SECS` - Page payload cache TTL, 0 disables (default: 300)
//! - `GIFTGRID_CACHE_CAPACITY` - Page payload cache size (default: 1000)
//! - `GIFTGRID_PAGE_SIZE` - Placeholder cards per page (default: 12)
//! - `GIFTGRID_FIRST_PAGE_RETRIES` - Page 1 network retries (default: 3)
//! - `GIFTGRID_RETRY_INTERVAL_MS` - Page 1 backoff base interval (default: 1000)
//! - `GIFTGRID_MAX_CASCADE_ATTEMPTS` - Page 1 HTTP-failure fallthrough attempts (default: 5)
//! - `GIFTGRID_PAGE_RETRY_ATTEMPTS` - Silent retries for later pages (default: 2)
//! - `GIFTGRID_PAGE_RETRY_DELAY_MS` - Backoff base for later pages (default: 200)
//! - `GIFTGRID_PRELOAD_AHEAD` - Preload the next page after each load (default: true)
//! - `GIFTGRID_ENABLE_HISTORY` - Emit history updates on category navigation (default: true)
//! - `GIFTGRID_TRIGGER_DISTANCE_PX` - Advance trigger distance from content end (default: 400)
//! - `GIFTGRID_PRELOAD_RATIO` - Preload trigger position within content (default: 0.5)
//! - `GIFTGRID_SCROLL_THROTTLE_MS` - Preload trigger throttle (default: 150)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const SITE_URL_VAR: &str = "GIFTGRID_SITE_URL";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Origin all page paths are resolved against
    pub site_url: Url,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Page payload cache settings
    pub cache: CacheConfig,
    /// Paginated loader policy
    pub loader: LoaderConfig,
    /// Scroll trigger geometry
    pub scroll: ScrollConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Page payload cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time to live; zero disables caching
    pub ttl: Duration,
    /// Maximum number of cached pages
    pub capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            capacity: 1000,
        }
    }
}

/// Retry, fallback and preload policy of the paginated loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Placeholder cards shown while a page is in flight
    pub page_size: usize,
    /// Network/parse retries for the first page
    pub first_page_retries: u32,
    /// Base interval of the first-page linear backoff
    pub retry_interval: Duration,
    /// Total pages tried when the first page answers with an HTTP error
    pub max_cascade_attempts: u32,
    /// Silent network/parse retries for pages after the first
    pub page_retry_attempts: u32,
    /// Base interval of the later-page linear backoff
    pub page_retry_delay: Duration,
    /// Preload the following page after every successful load
    pub preload_ahead: bool,
    /// Emit history updates on category navigation
    pub enable_history: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            first_page_retries: 3,
            retry_interval: Duration::from_secs(1),
            max_cascade_attempts: 5,
            page_retry_attempts: 2,
            page_retry_delay: Duration::from_millis(200),
            preload_ahead: true,
            enable_history: true,
        }
    }
}

/// Scroll trigger geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    /// Distance from the end of content at which `advance` fires (px)
    pub trigger_distance: f64,
    /// Fraction of rendered content past which `preload` fires
    pub preload_ratio: f64,
    /// Minimum interval between preload evaluations
    pub throttle: Duration,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            trigger_distance: 400.0,
            preload_ratio: 0.5,
            throttle: Duration::from_millis(150),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_site(None)
    }

    /// Load configuration from the environment, with an explicit site URL
    /// taking precedence over `GIFTGRID_SITE_URL`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env_with_site(site_url: Option<&str>) -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| {
            if key == SITE_URL_VAR
                && let Some(site) = site_url
            {
                return Some(site.to_owned());
            }
            std::env::var(key).ok()
        })
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let site_url = lookup(SITE_URL_VAR)
            .ok_or_else(|| ConfigError::MissingEnvVar(SITE_URL_VAR.to_string()))?;
        let site_url = Url::parse(&site_url)
            .map_err(|e| ConfigError::InvalidEnvVar(SITE_URL_VAR.to_string(), e.to_string()))?;

        let loader_defaults = LoaderConfig::default();
        let scroll_defaults = ScrollConfig::default();

        let loader = LoaderConfig {
            page_size: parse_or(&lookup, "GIFTGRID_PAGE_SIZE", loader_defaults.page_size)?,
            first_page_retries: parse_or(
                &lookup,
                "GIFTGRID_FIRST_PAGE_RETRIES",
                loader_defaults.first_page_retries,
            )?,
            retry_interval: millis_or(
                &lookup,
                "GIFTGRID_RETRY_INTERVAL_MS",
                loader_defaults.retry_interval,
            )?,
            max_cascade_attempts: parse_or(
                &lookup,
                "GIFTGRID_MAX_CASCADE_ATTEMPTS",
                loader_defaults.max_cascade_attempts,
            )?,
            page_retry_attempts: parse_or(
                &lookup,
                "GIFTGRID_PAGE_RETRY_ATTEMPTS",
                loader_defaults.page_retry_attempts,
            )?,
            page_retry_delay: millis_or(
                &lookup,
                "GIFTGRID_PAGE_RETRY_DELAY_MS",
                loader_defaults.page_retry_delay,
            )?,
            preload_ahead: parse_or(&lookup, "GIFTGRID_PRELOAD_AHEAD", loader_defaults.preload_ahead)?,
            enable_history: parse_or(
                &lookup,
                "GIFTGRID_ENABLE_HISTORY",
                loader_defaults.enable_history,
            )?,
        };

        let preload_ratio: f64 =
            parse_or(&lookup, "GIFTGRID_PRELOAD_RATIO", scroll_defaults.preload_ratio)?;
        if !(0.0..=1.0).contains(&preload_ratio) {
            return Err(ConfigError::InvalidEnvVar(
                "GIFTGRID_PRELOAD_RATIO".to_string(),
                format!("must be between 0 and 1 (got {preload_ratio})"),
            ));
        }

        let scroll = ScrollConfig {
            trigger_distance: parse_or(
                &lookup,
                "GIFTGRID_TRIGGER_DISTANCE_PX",
                scroll_defaults.trigger_distance,
            )?,
            preload_ratio,
            throttle: millis_or(&lookup, "GIFTGRID_SCROLL_THROTTLE_MS", scroll_defaults.throttle)?,
        };

        Ok(Self {
            site_url,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "GIFTGRID_REQUEST_TIMEOUT_SECS",
                30,
            )?),
            cache: CacheConfig {
                ttl: Duration::from_secs(parse_or(&lookup, "GIFTGRID_CACHE_TTL_SECS", 300)?),
                capacity: parse_or(&lookup, "GIFTGRID_CACHE_CAPACITY", 1000)?,
            },
            loader,
            scroll,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, falling back to a default when unset.
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

/// Parse an optional millisecond duration.
fn millis_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
