//! Core types for giftgrid.
//!
//! This module provides type-safe wrappers for the catalog concepts the
//! static site publishes as JSON.

pub mod facet;
pub mod platform;
pub mod price;
pub mod product;
pub mod query;

pub use facet::{FacetOption, FacetSelection, GiftsData};
pub use platform::Ecommerce;
pub use price::{CurrencyCode, Price};
pub use product::{Product, ProductId, ProductPage};
pub use query::{CategoryPath, QueryKey, QueryKeyError, gift_path_segments};
