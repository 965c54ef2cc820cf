//! Product records and page payloads published by the static site.
//!
//! Both shapes are producer-controlled JSON, so every field that the site
//! may omit is defaulted rather than rejected.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::platform::Ecommerce;
use super::price::{CurrencyCode, Price};

/// Product identifier.
///
/// Generated sites emit either numeric or string IDs depending on the data
/// source, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// A product as listed in a page payload.
///
/// Treated as immutable once fetched; display values are derived from it,
/// never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub title: String,
    /// List price in dollars.
    #[serde(default)]
    pub price: f64,
    /// Discount percentage (0-100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    /// Image URLs, first is the primary image.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    /// Average rating on a 0-5 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecommerce: Option<Ecommerce>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecommerce_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    /// List price, if the JSON number is representable.
    #[must_use]
    pub fn list_price(&self) -> Option<Price> {
        Price::from_f64(self.price, CurrencyCode::USD)
    }

    /// Discount percentage when one applies (strictly positive).
    #[must_use]
    pub fn discount_percent(&self) -> Option<Decimal> {
        self.discount
            .filter(|d| *d > 0.0)
            .and_then(|d| Decimal::try_from(d).ok())
    }

    /// Price after discount, or the list price when no discount applies.
    #[must_use]
    pub fn final_price(&self) -> Option<Price> {
        let price = self.list_price()?;
        Some(
            self.discount_percent()
                .map_or(price, |percent| price.discounted(percent)),
        )
    }

    /// Marketplace, ignoring empty names.
    #[must_use]
    pub fn platform(&self) -> Option<&Ecommerce> {
        self.ecommerce
            .as_ref()
            .filter(|platform| !platform.as_str().is_empty())
    }

    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Second image, used for the hover swap.
    #[must_use]
    pub fn secondary_image(&self) -> Option<&str> {
        self.images.get(1).map(String::as_str)
    }
}

/// Body of `index.json` / `page/{n}/index.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub products: Vec<Product>,
    #[serde(rename = "totalPages", default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

impl ProductPage {
    /// Total page count when the payload reports a usable (non-zero) value.
    #[must_use]
    pub fn reported_total_pages(&self) -> Option<u32> {
        self.total_pages.filter(|total| *total > 0)
    }
}

/// Deserialize `null` as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
