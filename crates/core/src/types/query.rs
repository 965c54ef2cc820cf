//! Query keys and endpoint path derivation.
//!
//! A query key identifies one distinct result set: either a gift-finder
//! facet selection or a category listing. Every page of a result set lives
//! under the key's base path:
//!
//! - page 1: `{base}index.json`
//! - page n: `{base}page/{n}/index.json`

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::facet::FacetSelection;

/// Scope segment for gift-finder result paths.
const GIFTS_SCOPE: &str = "gifts";

/// Regex for `/gifts/{occasion}/{person}/{interest}` anywhere in a path.
static GIFT_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/gifts/([^/]+)/([^/]+)/([^/]+)").expect("Invalid regex"));

/// Regex for a trailing `/page/{n}/` pagination suffix.
static PAGE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/page/(\d+)/?$").expect("Invalid regex"));

/// Errors that can occur when building a [`QueryKey`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryKeyError {
    /// A facet value is empty.
    #[error("facet {0} cannot be empty")]
    EmptyFacet(&'static str),
    /// A facet value would break the path layout.
    #[error("facet {facet} contains an invalid character: {value}")]
    InvalidFacet {
        /// Facet name.
        facet: &'static str,
        /// Offending value.
        value: String,
    },
    /// The category path is empty.
    #[error("category path cannot be empty")]
    EmptyCategory,
    /// The category path carries a query string or fragment.
    #[error("category path must be a plain path: {0}")]
    InvalidCategory(String),
}

/// Site-relative base path of a category listing, always `/`-terminated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryPath(String);

impl CategoryPath {
    /// Normalize a category path (leading and trailing `/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty or contains `?` or `#`.
    pub fn parse(path: &str) -> Result<Self, QueryKeyError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(QueryKeyError::EmptyCategory);
        }
        if trimmed.contains(['?', '#']) {
            return Err(QueryKeyError::InvalidCategory(trimmed.to_owned()));
        }

        let mut normalized = String::with_capacity(trimmed.len() + 2);
        if !trimmed.starts_with('/') {
            normalized.push('/');
        }
        normalized.push_str(trimmed);
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        Ok(Self(normalized))
    }

    /// Split a location path into its category base and current page.
    ///
    /// `/shop/mugs/page/3/` yields (`/shop/mugs/`, 3); a path without a page
    /// suffix is page 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the remaining base path is invalid.
    pub fn from_location(path: &str) -> Result<(Self, u32), QueryKeyError> {
        let trimmed = path.trim();
        let page = PAGE_SUFFIX_RE
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|page| *page > 0)
            .unwrap_or(1);
        let base = PAGE_SUFFIX_RE.replace(trimmed, "");
        let base = if base.is_empty() { "/" } else { base.as_ref() };
        Ok((Self::parse(base)?, page))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a distinct result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QueryKey {
    /// Gift-finder facet selection.
    Gifts(FacetSelection),
    /// Category listing.
    Category(CategoryPath),
}

impl QueryKey {
    /// Build a gift-finder key, validating that each facet is a single path segment.
    ///
    /// # Errors
    ///
    /// Returns an error if a facet is empty or contains `/`, `?` or `#`.
    pub fn gifts(selection: FacetSelection) -> Result<Self, QueryKeyError> {
        for (facet, value) in [
            ("occasion", &selection.occasion),
            ("person", &selection.person),
            ("interest", &selection.interest),
        ] {
            if value.is_empty() {
                return Err(QueryKeyError::EmptyFacet(facet));
            }
            if value.contains(['/', '?', '#']) {
                return Err(QueryKeyError::InvalidFacet {
                    facet,
                    value: value.clone(),
                });
            }
        }
        Ok(Self::Gifts(selection))
    }

    /// Build a category key.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid (see [`CategoryPath::parse`]).
    pub fn category(path: &str) -> Result<Self, QueryKeyError> {
        CategoryPath::parse(path).map(Self::Category)
    }

    /// Base path all pages of this result set live under.
    #[must_use]
    pub fn base_path(&self) -> String {
        match self {
            Self::Gifts(selection) => format!(
                "/{GIFTS_SCOPE}/{}/{}/{}/",
                selection.occasion, selection.person, selection.interest
            ),
            Self::Category(path) => path.as_str().to_owned(),
        }
    }

    /// JSON endpoint for a page (1-based).
    #[must_use]
    pub fn page_path(&self, page: u32) -> String {
        let base = self.base_path();
        if page <= 1 {
            format!("{base}index.json")
        } else {
            format!("{base}page/{page}/index.json")
        }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base_path())
    }
}

/// Extract `(occasion, person, interest)` from a `/gifts/{o}/{p}/{i}/` path.
#[must_use]
pub fn gift_path_segments(path: &str) -> Option<(String, String, String)> {
    let caps = GIFT_PATH_RE.captures(path)?;
    Some((
        caps.get(1)?.as_str().to_owned(),
        caps.get(2)?.as_str().to_owned(),
        caps.get(3)?.as_str().to_owned(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gift_key() -> QueryKey {
        QueryKey::gifts(FacetSelection::new("birthday", "mom", "gardening")).unwrap()
    }

    #[test]
    fn test_gift_page_paths() {
        let key = gift_key();
        assert_eq!(key.page_path(1), "/gifts/birthday/mom/gardening/index.json");
        assert_eq!(
            key.page_path(3),
            "/gifts/birthday/mom/gardening/page/3/index.json"
        );
    }

    #[test]
    fn test_gift_key_rejects_bad_segments() {
        assert_eq!(
            QueryKey::gifts(FacetSelection::new("", "mom", "tea")),
            Err(QueryKeyError::EmptyFacet("occasion"))
        );
        assert!(matches!(
            QueryKey::gifts(FacetSelection::new("a", "b/c", "tea")),
            Err(QueryKeyError::InvalidFacet { facet: "person", .. })
        ));
    }

    #[test]
    fn test_category_normalization() {
        let key = QueryKey::category("shop/mugs").unwrap();
        assert_eq!(key.base_path(), "/shop/mugs/");
        assert_eq!(key.page_path(2), "/shop/mugs/page/2/index.json");
        assert_eq!(QueryKey::category("  "), Err(QueryKeyError::EmptyCategory));
        assert!(QueryKey::category("/shop?x=1").is_err());
    }

    #[test]
    fn test_category_from_location() {
        let (path, page) = CategoryPath::from_location("/shop/mugs/page/3/").unwrap();
        assert_eq!(path.as_str(), "/shop/mugs/");
        assert_eq!(page, 3);

        let (path, page) = CategoryPath::from_location("/shop/mugs").unwrap();
        assert_eq!(path.as_str(), "/shop/mugs/");
        assert_eq!(page, 1);

        let (path, page) = CategoryPath::from_location("/page/2").unwrap();
        assert_eq!(path.as_str(), "/");
        assert_eq!(page, 2);
    }

    #[test]
    fn test_gift_path_segments() {
        assert_eq!(
            gift_path_segments("/gifts/birthday/dad/golf/"),
            Some(("birthday".into(), "dad".into(), "golf".into()))
        );
        assert_eq!(gift_path_segments("/gifts/birthday/dad/"), None);
        assert_eq!(gift_path_segments("/shop/mugs/"), None);
    }
}
