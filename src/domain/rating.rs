//! Rating normalization between the 0-10 scale and 5-star displays.
//!
//! Every star is worth two rating points. Display code asks for the
//! full/half/empty split of a rating; input code turns a tapped star or
//! a typed value back into a rating.

use thiserror::Error;

/// Lowest accepted rating.
pub const MIN_RATING: f64 = 0.0;

/// Highest accepted rating.
pub const MAX_RATING: f64 = 10.0;

/// Number of stars in a display row.
pub const STAR_COUNT: u8 = 5;

const POINTS_PER_STAR: f64 = MAX_RATING / STAR_COUNT as f64;

/// Full/half/empty split of a rating. `full + half + empty == 5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl std::fmt::Display for StarRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.full {
            f.write_str("★")?;
        }
        if self.half {
            f.write_str("⯪")?;
        }
        for _ in 0..self.empty {
            f.write_str("☆")?;
        }
        Ok(())
    }
}

/// Why a typed rating was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatingInputError {
    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("rating must be within [0, 10], got {0}")]
    OutOfRange(f64),
}

/// Split a rating into full, half and empty stars.
///
/// Input is clamped to `[0, 10]` first; NaN counts as zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn stars_for(rating: f64) -> StarRating {
    let rating = clamp_rating(rating);
    let units = rating / POINTS_PER_STAR;
    let full = units.floor();
    let half = units - full >= 0.5 && full < f64::from(STAR_COUNT);

    let full = full as u8;
    let empty = STAR_COUNT - full - u8::from(half);

    StarRating { full, half, empty }
}

/// Rating represented by tapping star `index` (1-based).
///
/// Returns `None` outside `1..=5`.
#[must_use]
pub fn rating_for_star(index: u8) -> Option<f64> {
    (1..=STAR_COUNT)
        .contains(&index)
        .then(|| f64::from(index) * POINTS_PER_STAR)
}

/// Parse a typed rating, accepting any decimal in `[0, 10]`.
///
/// The accepted value is rounded to one decimal place.
pub fn parse_rating_input(text: &str) -> Result<f64, RatingInputError> {
    let trimmed = text.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| RatingInputError::NotANumber(trimmed.to_string()))?;

    if !value.is_finite() {
        return Err(RatingInputError::NotANumber(trimmed.to_string()));
    }
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(RatingInputError::OutOfRange(value));
    }

    Ok(round_to_tenth(value))
}

/// Round to one decimal place (half away from zero).
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Clamp into `[0, 10]`; NaN maps to `0`.
#[must_use]
pub fn clamp_rating(rating: f64) -> f64 {
    if rating.is_nan() {
        return MIN_RATING;
    }
    rating.clamp(MIN_RATING, MAX_RATING)
}

/// Render as `"7.5/10"`.
#[must_use]
pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}/10")
}
