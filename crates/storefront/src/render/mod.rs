//! Product card rendering.
//!
//! [`card`] maps products to view-models, [`stars`] builds rating glyphs and
//! [`html`] turns view-models into markup fragments.

pub mod card;
pub mod html;
pub mod stars;

pub use card::{BadgeStyle, ProductCard, product_cards};
pub use html::RenderError;
pub use stars::StarRating;
