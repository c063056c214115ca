//! Score one dimension of a location for a weight profile.
//!
//! The `DimensionScorer` trait turns a [`RawLocationMetrics`] record into a
//! quality value for a single [`Dimension`]. The composite engine owns a
//! collection of these and blends their outputs.

use crate::{Dimension, RawLocationMetrics, WeightProfile};

/// Calculate the quality of one dimension for a location.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so an engine can be
/// shared across request handlers. The method is infallible; records have
/// already been validated and missing fields resolve to neutral defaults.
///
/// Implementations must:
/// - Produce finite scores.
/// - Normalise results to the range `0.0..=1.0`, where `1.0` is best.
///
/// Use [`DimensionScorer::sanitise`] to apply these guards.
///
/// # Examples
///
/// ```rust
/// use trueplace_core::{Dimension, DimensionScorer, RawLocationMetrics, WeightProfile};
///
/// struct HealthOnly;
///
/// impl DimensionScorer for HealthOnly {
///     fn dimension(&self) -> Dimension {
///         Dimension::CostQuality
///     }
///
///     fn score(&self, metrics: &RawLocationMetrics, _profile: &WeightProfile) -> f64 {
///         Self::sanitise(metrics.health_index() / 100.0)
///     }
/// }
///
/// let metrics = RawLocationMetrics::new("Boise", "ID").with_health_index(80.0);
/// assert_eq!(HealthOnly.score(&metrics, &WeightProfile::new()), 0.8);
/// ```
pub trait DimensionScorer: Send + Sync {
    /// Dimension this scorer contributes to.
    fn dimension(&self) -> Dimension;

    /// Return the quality of `metrics` under `profile`.
    fn score(&self, metrics: &RawLocationMetrics, profile: &WeightProfile) -> f64;

    /// Clamp and validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }
}
