//! Where page payloads come from.
//!
//! The loader only needs "give me the payload at this site-relative path".
//! [`HttpPageSource`] answers that over HTTP against the generated site;
//! tests plug in in-memory sources.

mod http;

use std::future::Future;

use giftgrid_core::ProductPage;

use crate::error::LoadError;

pub use http::HttpPageSource;

/// A source of `{ products, totalPages }` page payloads.
///
/// Implementations must translate every failure into a [`LoadError`]:
/// 404 as [`LoadError::NotFound`], other non-success statuses as
/// [`LoadError::Http`], transport failures as [`LoadError::Network`] and
/// undecodable bodies as [`LoadError::Parse`].
pub trait PageSource: Send + Sync + 'static {
    /// Fetch the payload at a site-relative path such as
    /// `/gifts/birthday/mom/tea/page/2/index.json`.
    fn fetch_page(&self, path: &str) -> impl Future<Output = Result<ProductPage, LoadError>> + Send;
}
