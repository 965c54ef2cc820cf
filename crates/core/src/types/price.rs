//! Type-safe price representation using decimal arithmetic.
//!
//! Product JSON carries prices as plain numbers. They are converted to
//! [`Decimal`] once at the edge so discount math never goes through floats.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places shown for a price.
const DISPLAY_SCALE: u32 = 2;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Convert a JSON number into a price.
    ///
    /// Returns `None` for values that have no decimal representation
    /// (NaN, infinities, out of range).
    #[must_use]
    pub fn from_f64(amount: f64, currency_code: CurrencyCode) -> Option<Self> {
        Decimal::try_from(amount)
            .ok()
            .map(|amount| Self::new(amount, currency_code))
    }

    /// Apply a percentage discount (`amount × (1 − percent/100)`).
    ///
    /// The result is rounded to two decimal places, midpoint away from zero.
    #[must_use]
    pub fn discounted(&self, percent: Decimal) -> Self {
        let factor = Decimal::ONE - percent / Decimal::ONE_HUNDRED;
        let amount = (self.amount * factor)
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        Self::new(amount, self.currency_code)
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        let mut amount = self
            .amount
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(DISPLAY_SCALE);
        format!("{}{amount}", self.currency_code.symbol())
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Symbol printed in front of the amount.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(amount: f64) -> Price {
        Price::from_f64(amount, CurrencyCode::USD).unwrap()
    }

    #[test]
    fn test_display_pads_to_two_places() {
        assert_eq!(usd(50.0).display(), "$50.00");
        assert_eq!(usd(7.5).display(), "$7.50");
    }

    #[test]
    fn test_discount_twenty_percent() {
        let price = usd(50.0).discounted(Decimal::from(20));
        assert_eq!(price.display(), "$40.00");
    }

    #[test]
    fn test_discount_rounds_to_cents() {
        // 19.99 * 0.85 = 16.9915
        let price = usd(19.99).discounted(Decimal::from(15));
        assert_eq!(price.amount, Decimal::new(1699, 2));
    }

    #[test]
    fn test_discount_midpoint_rounds_away_from_zero() {
        // 0.25 * 0.5 = 0.125
        let price = usd(0.25).discounted(Decimal::from(50));
        assert_eq!(price.display(), "$0.13");
    }

    #[test]
    fn test_from_f64_rejects_nan() {
        assert!(Price::from_f64(f64::NAN, CurrencyCode::USD).is_none());
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(CurrencyCode::EUR.symbol(), "€");
        assert_eq!(CurrencyCode::GBP.symbol(), "£");
        assert_eq!(CurrencyCode::CAD.symbol(), "$");
    }
}
