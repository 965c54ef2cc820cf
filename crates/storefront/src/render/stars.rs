//! Five-glyph star rating.

use std::fmt;

use serde::Serialize;

/// Number of glyphs in every rating.
pub const STAR_COUNT: u8 = 5;

const FULL_STAR: char = '★';
const HALF_STAR: char = '⯨';
const EMPTY_STAR: char = '☆';

/// Star breakdown of a 0-5 rating.
///
/// `full + half + empty` is always [`STAR_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRating {
    /// Break a fractional rating into glyphs.
    ///
    /// The integer part gives full stars; a remainder of at least one half
    /// adds a half star. Out-of-range and non-finite ratings are clamped.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_rating(rating: f64) -> Self {
        let rating = if rating.is_finite() {
            rating.clamp(0.0, f64::from(STAR_COUNT))
        } else {
            0.0
        };

        // Clamped to 0..=5 above, so the cast cannot truncate.
        let full = rating.floor() as u8;
        let half = full < STAR_COUNT && rating.fract() >= 0.5;
        let empty = STAR_COUNT - full - u8::from(half);

        Self { full, half, empty }
    }

    /// Glyph string, e.g. `★★★⯨☆`.
    #[must_use]
    pub fn glyphs(&self) -> String {
        let mut out = String::with_capacity(usize::from(STAR_COUNT) * 3);
        out.extend(std::iter::repeat_n(FULL_STAR, usize::from(self.full)));
        if self.half {
            out.push(HALF_STAR);
        }
        out.extend(std::iter::repeat_n(EMPTY_STAR, usize::from(self.empty)));
        out
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glyphs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_point_seven() {
        let stars = StarRating::from_rating(3.7);
        assert_eq!(stars.full, 3);
        assert!(stars.half);
        assert_eq!(stars.empty, 1);
        assert_eq!(stars.glyphs(), "★★★⯨☆");
    }

    #[test]
    fn test_remainder_below_half() {
        let stars = StarRating::from_rating(4.4);
        assert_eq!((stars.full, stars.half, stars.empty), (4, false, 1));
    }

    #[test]
    fn test_exact_half() {
        let stars = StarRating::from_rating(2.5);
        assert_eq!((stars.full, stars.half, stars.empty), (2, true, 2));
    }

    #[test]
    fn test_bounds() {
        assert_eq!(StarRating::from_rating(5.0).glyphs(), "★★★★★");
        assert_eq!(StarRating::from_rating(0.0).glyphs(), "☆☆☆☆☆");
        assert_eq!(StarRating::from_rating(7.2).glyphs(), "★★★★★");
        assert_eq!(StarRating::from_rating(-1.0).glyphs(), "☆☆☆☆☆");
        assert_eq!(StarRating::from_rating(f64::NAN).glyphs(), "☆☆☆☆☆");
    }

    #[test]
    fn test_always_five_glyphs() {
        for tenths in 0..=50 {
            let stars = StarRating::from_rating(f64::from(tenths) / 10.0);
            assert_eq!(
                stars.full + u8::from(stars.half) + stars.empty,
                STAR_COUNT,
                "rating {tenths}/10"
            );
            assert_eq!(stars.glyphs().chars().count(), 5);
        }
    }
}
