//! Raw, already-ingested facts about a place.
//!
//! Records arrive from an external ETL process and are never mutated by the
//! scorer. Optional fields resolve to documented neutral defaults through the
//! accessor methods, so a sparse record still scores.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MalformedMetricsError;

/// Hate crimes per 100k residents assumed when the field is absent.
pub const DEFAULT_HATE_CRIME_RATE: f64 = 0.0;
/// Violent crimes per 100k residents assumed when the field is absent.
pub const DEFAULT_VIOLENT_CRIME_RATE: f64 = 0.0;
/// Diversity index assumed when the field is absent.
pub const DEFAULT_DIVERSITY_INDEX: f64 = 0.0;
/// Monthly housing cost assumed when the field is absent.
pub const DEFAULT_HOUSING_COST: f64 = 2000.0;
/// Health index assumed when the field is absent ("average").
pub const DEFAULT_HEALTH_INDEX: f64 = 50.0;

/// Measured facts about a single location.
///
/// # Examples
/// ```
/// use trueplace_core::RawLocationMetrics;
///
/// let metrics = RawLocationMetrics::new("Portland", "OR")
///     .with_hate_crime_rate(3.2)
///     .with_housing_cost(1850.0);
/// assert_eq!(metrics.health_index(), 50.0);
/// assert!(metrics.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RawLocationMetrics {
    /// Display name of the place.
    pub name: String,
    /// State or region code.
    #[cfg_attr(feature = "serde", serde(alias = "state", default))]
    pub region: String,
    /// Hate crimes per 100k residents.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hate_crime_rate_per_100k: Option<f64>,
    /// Violent crimes per 100k residents.
    #[cfg_attr(feature = "serde", serde(default))]
    pub violent_crime_rate_per_100k: Option<f64>,
    /// Simpson-style heterogeneity probability in `0.0..=1.0`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub diversity_index: Option<f64>,
    /// Median monthly housing cost in dollars.
    #[cfg_attr(feature = "serde", serde(default))]
    pub median_monthly_housing_cost: Option<f64>,
    /// Health index in `0.0..=100.0`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub health_index: Option<f64>,
    /// Incident counts keyed by bias category label.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    pub bias_incidents: BTreeMap<String, u64>,
    /// Legacy mobility flag.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub mobility: Option<bool>,
    /// Legacy inclusion flag.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub inclusion: Option<bool>,
}

impl RawLocationMetrics {
    /// Construct a record carrying only its identity.
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            ..Self::default()
        }
    }

    /// Set the hate-crime rate while returning `self` for chaining.
    #[must_use]
    pub fn with_hate_crime_rate(mut self, rate: f64) -> Self {
        self.hate_crime_rate_per_100k = Some(rate);
        self
    }

    /// Set the violent-crime rate while returning `self` for chaining.
    #[must_use]
    pub fn with_violent_crime_rate(mut self, rate: f64) -> Self {
        self.violent_crime_rate_per_100k = Some(rate);
        self
    }

    /// Set the diversity index while returning `self` for chaining.
    #[must_use]
    pub fn with_diversity_index(mut self, index: f64) -> Self {
        self.diversity_index = Some(index);
        self
    }

    /// Set the monthly housing cost while returning `self` for chaining.
    #[must_use]
    pub fn with_housing_cost(mut self, cost: f64) -> Self {
        self.median_monthly_housing_cost = Some(cost);
        self
    }

    /// Set the health index while returning `self` for chaining.
    #[must_use]
    pub fn with_health_index(mut self, index: f64) -> Self {
        self.health_index = Some(index);
        self
    }

    /// Record incidents for a bias category while returning `self`.
    #[must_use]
    pub fn with_bias_incidents(mut self, category: impl Into<String>, incidents: u64) -> Self {
        self.bias_incidents.insert(category.into(), incidents);
        self
    }

    /// Set the legacy mobility and inclusion flags.
    #[must_use]
    pub fn with_legacy_flags(mut self, mobility: bool, inclusion: bool) -> Self {
        self.mobility = Some(mobility);
        self.inclusion = Some(inclusion);
        self
    }

    /// Hate-crime rate, or [`DEFAULT_HATE_CRIME_RATE`] when absent or NaN.
    #[must_use]
    pub fn hate_crime_rate(&self) -> f64 {
        or_default(self.hate_crime_rate_per_100k, DEFAULT_HATE_CRIME_RATE)
    }

    /// Violent-crime rate, or [`DEFAULT_VIOLENT_CRIME_RATE`] when absent or NaN.
    #[must_use]
    pub fn violent_crime_rate(&self) -> f64 {
        or_default(self.violent_crime_rate_per_100k, DEFAULT_VIOLENT_CRIME_RATE)
    }

    /// Diversity index, or [`DEFAULT_DIVERSITY_INDEX`] when absent or NaN.
    #[must_use]
    pub fn diversity(&self) -> f64 {
        or_default(self.diversity_index, DEFAULT_DIVERSITY_INDEX)
    }

    /// Housing cost, or [`DEFAULT_HOUSING_COST`] when absent or NaN.
    #[must_use]
    pub fn housing_cost(&self) -> f64 {
        or_default(self.median_monthly_housing_cost, DEFAULT_HOUSING_COST)
    }

    /// Housing cost only when the record actually reports one.
    #[must_use]
    pub fn reported_housing_cost(&self) -> Option<f64> {
        self.median_monthly_housing_cost.filter(|cost| !cost.is_nan())
    }

    /// Health index, or [`DEFAULT_HEALTH_INDEX`] when absent or NaN.
    #[must_use]
    pub fn health_index(&self) -> f64 {
        or_default(self.health_index, DEFAULT_HEALTH_INDEX)
    }

    /// Sum incidents across the requested bias categories.
    ///
    /// Returns `None` when the record has no data for any requested
    /// category, or when no categories were requested.
    ///
    /// # Examples
    /// ```
    /// use trueplace_core::RawLocationMetrics;
    ///
    /// let metrics = RawLocationMetrics::new("Austin", "TX")
    ///     .with_bias_incidents("race", 4)
    ///     .with_bias_incidents("religion", 2);
    /// let requested = ["race".to_owned(), "religion".to_owned()];
    /// assert_eq!(metrics.bias_incidents_for(&requested), Some(6));
    /// assert_eq!(metrics.bias_incidents_for(&["disability".to_owned()]), None);
    /// ```
    #[must_use]
    pub fn bias_incidents_for(&self, categories: &[String]) -> Option<u64> {
        categories
            .iter()
            .filter_map(|category| self.bias_incidents.get(category))
            .fold(None, |total, &count| {
                Some(total.unwrap_or(0_u64).saturating_add(count))
            })
    }

    /// Check the record's invariants.
    ///
    /// # Errors
    /// Returns [`MalformedMetricsError`] when the name is blank, a present
    /// value is infinite or negative, the diversity index leaves
    /// `0.0..=1.0`, the health index leaves `0.0..=100.0`, or the housing
    /// cost is not positive. NaN counts as absent and is never an error.
    pub fn validate(&self) -> Result<(), MalformedMetricsError> {
        if self.name.trim().is_empty() {
            return Err(MalformedMetricsError::MissingName);
        }
        check_non_negative("hateCrimeRatePer100k", self.hate_crime_rate_per_100k)?;
        check_non_negative(
            "violentCrimeRatePer100k",
            self.violent_crime_rate_per_100k,
        )?;
        check_bounded("diversityIndex", self.diversity_index, 0.0, 1.0)?;
        check_bounded("healthIndex", self.health_index, 0.0, 100.0)?;
        check_non_negative("medianMonthlyHousingCost", self.median_monthly_housing_cost)?;
        if let Some(cost) = self.reported_housing_cost()
            && cost <= 0.0
        {
            return Err(MalformedMetricsError::NonPositiveHousingCost { value: cost });
        }
        Ok(())
    }
}

fn or_default(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(default)
}

fn check_non_negative(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), MalformedMetricsError> {
    let Some(present) = value.filter(|v| !v.is_nan()) else {
        return Ok(());
    };
    if !present.is_finite() {
        return Err(MalformedMetricsError::NonFinite { field });
    }
    if present < 0.0 {
        return Err(MalformedMetricsError::Negative {
            field,
            value: present,
        });
    }
    Ok(())
}

fn check_bounded(
    field: &'static str,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> Result<(), MalformedMetricsError> {
    check_non_negative(field, value)?;
    match value.filter(|v| !v.is_nan()) {
        Some(present) if !(min..=max).contains(&present) => {
            Err(MalformedMetricsError::OutOfRange {
                field,
                value: present,
                min,
                max,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn absent_fields_fall_back_to_neutral_defaults() {
        let metrics = RawLocationMetrics::new("Nowhere", "NA");
        assert_eq!(metrics.hate_crime_rate(), DEFAULT_HATE_CRIME_RATE);
        assert_eq!(metrics.violent_crime_rate(), DEFAULT_VIOLENT_CRIME_RATE);
        assert_eq!(metrics.diversity(), DEFAULT_DIVERSITY_INDEX);
        assert_eq!(metrics.housing_cost(), DEFAULT_HOUSING_COST);
        assert_eq!(metrics.health_index(), DEFAULT_HEALTH_INDEX);
        assert!(metrics.reported_housing_cost().is_none());
    }

    #[rstest]
    fn nan_counts_as_absent() {
        let metrics = RawLocationMetrics::new("Nowhere", "NA")
            .with_health_index(f64::NAN)
            .with_housing_cost(f64::NAN);
        assert_eq!(metrics.health_index(), DEFAULT_HEALTH_INDEX);
        assert!(metrics.reported_housing_cost().is_none());
        assert!(metrics.validate().is_ok());
    }

    #[rstest]
    fn blank_name_is_malformed() {
        let metrics = RawLocationMetrics::new("   ", "TX");
        assert_eq!(metrics.validate(), Err(MalformedMetricsError::MissingName));
    }

    #[rstest]
    #[case(RawLocationMetrics::new("A", "B").with_hate_crime_rate(-1.0), "hateCrimeRatePer100k")]
    #[case(
        RawLocationMetrics::new("A", "B").with_violent_crime_rate(-0.5),
        "violentCrimeRatePer100k"
    )]
    #[case(RawLocationMetrics::new("A", "B").with_housing_cost(-10.0), "medianMonthlyHousingCost")]
    fn negative_values_are_malformed(
        #[case] metrics: RawLocationMetrics,
        #[case] expected: &'static str,
    ) {
        match metrics.validate() {
            Err(MalformedMetricsError::Negative { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected Negative, found {other:?}"),
        }
    }

    #[rstest]
    fn infinite_values_are_malformed() {
        let metrics = RawLocationMetrics::new("A", "B").with_violent_crime_rate(f64::INFINITY);
        assert_eq!(
            metrics.validate(),
            Err(MalformedMetricsError::NonFinite {
                field: "violentCrimeRatePer100k"
            })
        );
    }

    #[rstest]
    #[case(RawLocationMetrics::new("A", "B").with_diversity_index(1.2))]
    #[case(RawLocationMetrics::new("A", "B").with_health_index(101.0))]
    fn bounded_indices_are_checked(#[case] metrics: RawLocationMetrics) {
        assert!(matches!(
            metrics.validate(),
            Err(MalformedMetricsError::OutOfRange { .. })
        ));
    }

    #[rstest]
    fn zero_housing_cost_is_malformed() {
        let metrics = RawLocationMetrics::new("A", "B").with_housing_cost(0.0);
        assert_eq!(
            metrics.validate(),
            Err(MalformedMetricsError::NonPositiveHousingCost { value: 0.0 })
        );
    }

    #[rstest]
    fn bias_incidents_ignore_unrequested_categories() {
        let metrics = RawLocationMetrics::new("A", "B")
            .with_bias_incidents("race", 3)
            .with_bias_incidents("religion", 5);
        assert_eq!(metrics.bias_incidents_for(&["race".to_owned()]), Some(3));
        assert_eq!(metrics.bias_incidents_for(&[]), None);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn deserialises_camel_case_and_state_alias() {
        let json = r#"{
            "name": "Denver",
            "state": "CO",
            "hateCrimeRatePer100k": 2.5,
            "medianMonthlyHousingCost": 1900,
            "biasIncidents": {"race": 7}
        }"#;
        let metrics: RawLocationMetrics = serde_json::from_str(json).expect("valid record");
        assert_eq!(metrics.region, "CO");
        assert_eq!(metrics.hate_crime_rate_per_100k, Some(2.5));
        assert_eq!(metrics.housing_cost(), 1900.0);
        assert_eq!(metrics.bias_incidents.get("race"), Some(&7));
        assert!(metrics.diversity_index.is_none());
    }
}
