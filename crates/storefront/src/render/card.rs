//! Product card view-models.
//!
//! A [`ProductCard`] holds every display value a product card needs,
//! derived from a [`Product`] without touching it. Turning cards into markup
//! is the job of [`super::html`].

use giftgrid_core::{Ecommerce, Product};
use serde::Serialize;

use super::stars::StarRating;

/// Link target used when a product has no marketplace URL.
const FALLBACK_LINK: &str = "#";

/// Badge styling per marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeStyle {
    Amazon,
    Etsy,
    RedBubble,
    Default,
}

impl BadgeStyle {
    #[must_use]
    pub const fn for_platform(platform: &Ecommerce) -> Self {
        match platform {
            Ecommerce::Amazon => Self::Amazon,
            Ecommerce::Etsy => Self::Etsy,
            Ecommerce::RedBubble => Self::RedBubble,
            Ecommerce::Other(_) => Self::Default,
        }
    }

    /// CSS classes of the badge label.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::RedBubble => "bg-danger text-white",
            Self::Etsy => "bg-etsy text-white",
            Self::Amazon | Self::Default => "bg-warning",
        }
    }
}

/// Marketplace badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformBadge {
    pub name: String,
    pub style: BadgeStyle,
    pub amazon_icon: bool,
}

/// Price display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceView {
    /// Price to pay, e.g. `$40.00`.
    pub current: String,
    /// List price, only when discounted.
    pub original: Option<String>,
    /// Discount badge, e.g. `-20%`.
    pub discount_badge: Option<String>,
}

/// Rating display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingView {
    pub stars: StarRating,
    /// Rating to one decimal, e.g. `4.5`.
    pub text: String,
    /// Review count, e.g. `(1,234)`.
    pub reviews: Option<String>,
}

/// Image display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

/// Everything needed to display one product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    /// Position in the result list (drives animation staggering).
    pub position: usize,
    pub id: Option<String>,
    pub title: String,
    pub link: String,
    pub aria_label: String,
    pub image: Option<ImageView>,
    /// Shown on hover; only present for products with two or more images.
    pub hover_image: Option<ImageView>,
    pub price: Option<PriceView>,
    pub rating: Option<RatingView>,
    pub badge: Option<PlatformBadge>,
}

impl ProductCard {
    /// Derive the card for a product at a list position.
    #[must_use]
    pub fn new(product: &Product, position: usize) -> Self {
        let alt = match product.category.as_deref().filter(|c| !c.is_empty()) {
            Some(category) => format!("{} {category}", product.title),
            None => product.title.clone(),
        };
        let platform_name = product.platform().map_or("", Ecommerce::as_str);

        let image = product.primary_image().map(|url| ImageView {
            url: url.to_owned(),
            alt: alt.clone(),
        });
        let hover_image = image
            .as_ref()
            .and(product.secondary_image())
            .map(|url| ImageView {
                url: url.to_owned(),
                alt,
            });

        Self {
            position,
            id: product.id.as_ref().map(ToString::to_string),
            title: product.title.clone(),
            link: product
                .ecommerce_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| FALLBACK_LINK.to_owned()),
            aria_label: format!("Buy {} on {platform_name}", product.title),
            image,
            hover_image,
            price: price_view(product),
            rating: rating_view(product),
            badge: product.platform().map(|platform| PlatformBadge {
                name: platform.to_string(),
                style: BadgeStyle::for_platform(platform),
                amazon_icon: matches!(platform, Ecommerce::Amazon),
            }),
        }
    }

    /// Whether the discount badge should be shown.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.price
            .as_ref()
            .is_some_and(|price| price.discount_badge.is_some())
    }
}

/// Cards for a batch of products, numbered from `start`.
#[must_use]
pub fn product_cards(products: &[Product], start: usize) -> Vec<ProductCard> {
    products
        .iter()
        .enumerate()
        .map(|(offset, product)| ProductCard::new(product, start + offset))
        .collect()
}

fn price_view(product: &Product) -> Option<PriceView> {
    let list = product.list_price().filter(|price| price.is_positive())?;
    let current = product.final_price()?;

    Some(match product.discount_percent() {
        Some(percent) => PriceView {
            current: current.display(),
            original: Some(list.display()),
            discount_badge: Some(format!("-{}%", percent.normalize())),
        },
        None => PriceView {
            current: current.display(),
            original: None,
            discount_badge: None,
        },
    })
}

fn rating_view(product: &Product) -> Option<RatingView> {
    let rating = product.rating.filter(|r| *r > 0.0)?;
    Some(RatingView {
        stars: StarRating::from_rating(rating),
        text: format!("{rating:.1}"),
        reviews: product
            .review_count
            .filter(|count| *count > 0)
            .map(|count| format!("({})", group_thousands(count))),
    })
}

/// `1234567` -> `1,234,567`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
