//! Map raw metric values onto the unit interval.
//!
//! All functions are pure and allocation-free. Non-finite inputs are treated
//! as `0.0` before any arithmetic so NaN can never reach a composite.

use trueplace_core::{Direction, NormalizationRange};

/// Clamp `(value - min) / (max - min)` into `0.0..=1.0`.
///
/// # Examples
/// ```
/// use trueplace_core::DIVERSITY_RANGE;
/// use trueplace_scorer::normalize;
///
/// assert_eq!(normalize(0.25, &DIVERSITY_RANGE), 0.25);
/// assert_eq!(normalize(4.0, &DIVERSITY_RANGE), 1.0);
/// assert_eq!(normalize(f64::NAN, &DIVERSITY_RANGE), 0.0);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "normalisation is a shift and a divide"
)]
#[must_use]
pub fn normalize(value: f64, range: &NormalizationRange) -> f64 {
    let finite = if value.is_finite() { value } else { 0.0 };
    ((finite - range.min()) / range.span()).clamp(0.0, 1.0)
}

/// Return `1 - normalize(value, range)` for metrics where lower is better.
///
/// # Examples
/// ```
/// use trueplace_core::HOUSING_COST_RANGE;
/// use trueplace_scorer::normalize_inverse;
///
/// assert_eq!(normalize_inverse(500.0, &HOUSING_COST_RANGE), 1.0);
/// assert_eq!(normalize_inverse(9000.0, &HOUSING_COST_RANGE), 0.0);
/// ```
#[expect(clippy::float_arithmetic, reason = "inversion is a subtraction")]
#[must_use]
pub fn normalize_inverse(value: f64, range: &NormalizationRange) -> f64 {
    1.0 - normalize(value, range)
}

/// Normalise `value` honouring the range's [`Direction`].
#[must_use]
pub fn normalize_directed(value: f64, range: &NormalizationRange) -> f64 {
    match range.direction() {
        Direction::HigherIsBetter => normalize(value, range),
        Direction::LowerIsBetter => normalize_inverse(value, range),
    }
}
