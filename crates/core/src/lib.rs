//! Giftgrid Core - Shared catalog types.
//!
//! This crate provides the types shared by the giftgrid components:
//! - `storefront` - Paginated loader, card renderer and page controllers
//! - `cli` - Command-line driver for browsing a generated site
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no timers. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, prices, platforms, facets and query keys

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
