//! Giftgrid storefront library.
//!
//! Client-side behavior of a giftgrid site: the paginated product loader,
//! product card rendering and the page controllers built on top of them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod facets;
pub mod finder;
pub mod grid;
pub mod loader;
pub mod render;
pub mod scroll;
pub mod source;
pub mod widgets;

#[cfg(test)]
mod testing;

pub use config::StorefrontConfig;
pub use error::{LoadError, Result};
pub use finder::GiftFinder;
pub use grid::ProductGrid;
pub use loader::{LoadOutcome, PaginatedLoader, ViewUpdate};
pub use source::{HttpPageSource, PageSource};
