//! Per-metric calibration constants.
//!
//! A [`Calibration`] is fixed process-wide configuration: build it once at
//! start-up and share it. Changing any range changes every future score, so
//! each calibration carries a version string that callers fold into cache
//! keys.

use crate::ConfigurationError;

/// Which end of a range is preferable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Larger raw values score better (diversity, health).
    HigherIsBetter,
    /// Smaller raw values score better (crime rates, housing cost).
    LowerIsBetter,
}

/// Calibration for a single metric: bounds plus directionality.
///
/// Construction guarantees `max > min` and finite bounds.
///
/// # Examples
/// ```
/// use trueplace_core::{Direction, NormalizationRange};
///
/// let range = NormalizationRange::new("rent", 500.0, 5000.0, Direction::LowerIsBetter)
///     .expect("valid range");
/// assert_eq!(range.span(), 4500.0);
/// assert!(NormalizationRange::new("rent", 10.0, 10.0, Direction::LowerIsBetter).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationRange {
    metric: &'static str,
    min: f64,
    max: f64,
    direction: Direction,
}

impl NormalizationRange {
    /// Validate and construct a range.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidRange`] when either bound is not
    /// finite or `max <= min`.
    pub fn new(
        metric: &'static str,
        min: f64,
        max: f64,
        direction: Direction,
    ) -> Result<Self, ConfigurationError> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(ConfigurationError::InvalidRange { metric, min, max });
        }
        Ok(Self {
            metric,
            min,
            max,
            direction,
        })
    }

    // Only for the shipped constants below, which satisfy `max > min`.
    const fn shipped(metric: &'static str, min: f64, max: f64, direction: Direction) -> Self {
        Self {
            metric,
            min,
            max,
            direction,
        }
    }

    /// Metric label the range calibrates.
    #[must_use]
    pub const fn metric(&self) -> &'static str {
        self.metric
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Preferred end of the range.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Width of the range; always positive.
    #[expect(
        clippy::float_arithmetic,
        reason = "range width is a single subtraction"
    )]
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Shipped range for hate crimes per 100k residents.
pub const HATE_CRIME_RANGE: NormalizationRange =
    NormalizationRange::shipped("hateCrimeRatePer100k", 0.0, 50.0, Direction::LowerIsBetter);
/// Shipped range for violent crimes per 100k residents.
pub const VIOLENT_CRIME_RANGE: NormalizationRange = NormalizationRange::shipped(
    "violentCrimeRatePer100k",
    0.0,
    2000.0,
    Direction::LowerIsBetter,
);
/// Shipped range for median monthly housing cost.
pub const HOUSING_COST_RANGE: NormalizationRange = NormalizationRange::shipped(
    "medianMonthlyHousingCost",
    500.0,
    5000.0,
    Direction::LowerIsBetter,
);
/// Shipped range for the diversity index.
pub const DIVERSITY_RANGE: NormalizationRange =
    NormalizationRange::shipped("diversityIndex", 0.0, 1.0, Direction::HigherIsBetter);
/// Shipped range for the health index.
pub const HEALTH_RANGE: NormalizationRange =
    NormalizationRange::shipped("healthIndex", 0.0, 100.0, Direction::HigherIsBetter);

const SHIPPED_VERSION: &str = "v0";

/// The full set of ranges the dimension scorers draw on.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    version: String,
    hate_crime: NormalizationRange,
    violent_crime: NormalizationRange,
    housing_cost: NormalizationRange,
    diversity: NormalizationRange,
    health: NormalizationRange,
}

impl Calibration {
    /// Start a builder seeded with the shipped ranges.
    #[must_use]
    pub fn builder() -> CalibrationBuilder {
        CalibrationBuilder {
            calibration: Self::default(),
        }
    }

    /// Version label folded into cache keys.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Range for hate crimes per 100k residents.
    #[must_use]
    pub const fn hate_crime(&self) -> &NormalizationRange {
        &self.hate_crime
    }

    /// Range for violent crimes per 100k residents.
    #[must_use]
    pub const fn violent_crime(&self) -> &NormalizationRange {
        &self.violent_crime
    }

    /// Range for monthly housing cost.
    #[must_use]
    pub const fn housing_cost(&self) -> &NormalizationRange {
        &self.housing_cost
    }

    /// Range for the diversity index.
    #[must_use]
    pub const fn diversity(&self) -> &NormalizationRange {
        &self.diversity
    }

    /// Range for the health index.
    #[must_use]
    pub const fn health(&self) -> &NormalizationRange {
        &self.health
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            version: SHIPPED_VERSION.to_owned(),
            hate_crime: HATE_CRIME_RANGE,
            violent_crime: VIOLENT_CRIME_RANGE,
            housing_cost: HOUSING_COST_RANGE,
            diversity: DIVERSITY_RANGE,
            health: HEALTH_RANGE,
        }
    }
}

/// Builder for custom calibrations.
///
/// Every range passed in has already been validated by
/// [`NormalizationRange::new`], so building cannot fail.
///
/// # Examples
/// ```
/// use trueplace_core::{Calibration, Direction, NormalizationRange};
///
/// # fn main() -> Result<(), trueplace_core::ConfigurationError> {
/// let calibration = Calibration::builder()
///     .version("coastal-2024")
///     .housing_cost(NormalizationRange::new(
///         "medianMonthlyHousingCost",
///         800.0,
///         8000.0,
///         Direction::LowerIsBetter,
///     )?)
///     .build();
/// assert_eq!(calibration.version(), "coastal-2024");
/// assert_eq!(calibration.housing_cost().max(), 8000.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CalibrationBuilder {
    calibration: Calibration,
}

impl CalibrationBuilder {
    /// Set the version label.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.calibration.version = version.into();
        self
    }

    /// Replace the hate-crime range.
    #[must_use]
    pub fn hate_crime(mut self, range: NormalizationRange) -> Self {
        self.calibration.hate_crime = range;
        self
    }

    /// Replace the violent-crime range.
    #[must_use]
    pub fn violent_crime(mut self, range: NormalizationRange) -> Self {
        self.calibration.violent_crime = range;
        self
    }

    /// Replace the housing-cost range.
    #[must_use]
    pub fn housing_cost(mut self, range: NormalizationRange) -> Self {
        self.calibration.housing_cost = range;
        self
    }

    /// Replace the diversity range.
    #[must_use]
    pub fn diversity(mut self, range: NormalizationRange) -> Self {
        self.calibration.diversity = range;
        self
    }

    /// Replace the health range.
    #[must_use]
    pub fn health(mut self, range: NormalizationRange) -> Self {
        self.calibration.health = range;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Calibration {
        self.calibration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10.0, 10.0)]
    #[case(10.0, 5.0)]
    #[case(f64::NAN, 5.0)]
    #[case(0.0, f64::INFINITY)]
    fn invalid_ranges_are_configuration_errors(#[case] min: f64, #[case] max: f64) {
        let err = NormalizationRange::new("metric", min, max, Direction::HigherIsBetter)
            .expect_err("range should be rejected");
        assert!(matches!(
            err,
            ConfigurationError::InvalidRange {
                metric: "metric",
                ..
            }
        ));
    }

    #[rstest]
    fn shipped_ranges_are_valid() {
        let calibration = Calibration::default();
        for range in [
            calibration.hate_crime(),
            calibration.violent_crime(),
            calibration.housing_cost(),
            calibration.diversity(),
            calibration.health(),
        ] {
            let rebuilt = NormalizationRange::new(
                range.metric(),
                range.min(),
                range.max(),
                range.direction(),
            );
            assert_eq!(rebuilt.as_ref(), Ok(range));
        }
        assert_eq!(calibration.version(), "v0");
    }

    #[rstest]
    fn crime_and_cost_prefer_lower_values() {
        let calibration = Calibration::default();
        assert_eq!(calibration.hate_crime().direction(), Direction::LowerIsBetter);
        assert_eq!(calibration.housing_cost().direction(), Direction::LowerIsBetter);
        assert_eq!(calibration.health().direction(), Direction::HigherIsBetter);
    }
}
