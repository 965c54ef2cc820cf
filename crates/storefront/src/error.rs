//! Load error taxonomy.
//!
//! Every failure of the fetch layer is translated into a [`LoadError`] at the
//! source boundary; the loader then decides from the kind (and the page
//! number) whether it is an empty state, a fallback, a retry or a silent end
//! of pagination. Nothing propagates past the loader.

use thiserror::Error;

/// Failure of a page fetch or of rendering a card.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The page does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success HTTP status.
    #[error("HTTP {status} for {path}")]
    Http {
        /// Response status code.
        status: u16,
        /// Requested path.
        path: String,
    },

    /// Transport failure (connection, timeout, TLS, body read).
    #[error("Network error: {0}")]
    Network(String),

    /// The page path could not be resolved against the site URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The body was not a valid page payload.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A card template could not be rendered.
    #[error("Template missing: {0}")]
    TemplateMissing(String),
}

/// How the loader reacts to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Terminal empty state.
    NotFound,
    /// HTTP failure: page fallthrough on the first page, end of results after.
    Server,
    /// Network or parse failure: backoff on the first page, silent after.
    Transient,
    /// Renderer failure, scoped to a single card.
    Render,
}

impl LoadError {
    /// Classify for the loader's recovery policy.
    #[must_use]
    pub const fn class(&self) -> FailureClass {
        match self {
            Self::NotFound(_) => FailureClass::NotFound,
            Self::Http { .. } | Self::InvalidUrl(_) => FailureClass::Server,
            Self::Network(_) | Self::Parse(_) => FailureClass::Transient,
            Self::TemplateMissing(_) => FailureClass::Render,
        }
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Result type alias for `LoadError`.
pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::NotFound("/gifts/a/b/c/index.json".to_string());
        assert_eq!(err.to_string(), "Not found: /gifts/a/b/c/index.json");

        let err = LoadError::Http {
            status: 503,
            path: "/shop/index.json".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 for /shop/index.json");
    }

    #[test]
    fn test_load_error_classes() {
        assert_eq!(
            LoadError::NotFound(String::new()).class(),
            FailureClass::NotFound
        );
        assert_eq!(
            LoadError::Http {
                status: 500,
                path: String::new()
            }
            .class(),
            FailureClass::Server
        );
        assert_eq!(
            LoadError::Network("reset".to_string()).class(),
            FailureClass::Transient
        );

        let parse = serde_json::from_str::<serde_json::Value>("{").map_err(LoadError::from);
        assert!(matches!(parse.map_err(|e| e.class()), Err(FailureClass::Transient)));

        assert_eq!(
            LoadError::TemplateMissing("card".to_string()).class(),
            FailureClass::Render
        );
    }
}
