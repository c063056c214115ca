//! Dimension scorers shipped with the engine.
//!
//! Each scorer reads the fields it needs from [`RawLocationMetrics`] through
//! the default-applying accessors, normalises them against the calibration it
//! was built with, and blends the terms with fixed sub-weights.

use trueplace_core::{
    Calibration, Dimension, DimensionScorer, NormalizationRange, RawLocationMetrics,
    WeightProfile,
};

use crate::normalizer::normalize_directed;

/// Function estimating how well a location represents a user, in `0.0..=1.0`.
pub type RepresentationProxy = fn(&RawLocationMetrics) -> f64;

/// Crime exposure, dominated by the hate-crime rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyScorer {
    hate_crime: NormalizationRange,
    violent_crime: NormalizationRange,
}

impl SafetyScorer {
    /// Share of the safety score driven by the hate-crime rate.
    pub const HATE_CRIME_WEIGHT: f64 = 0.7;
    /// Share of the safety score driven by the violent-crime rate.
    pub const VIOLENT_CRIME_WEIGHT: f64 = 0.3;

    /// Build a scorer from the calibration's crime ranges.
    #[must_use]
    pub const fn new(calibration: &Calibration) -> Self {
        Self {
            hate_crime: *calibration.hate_crime(),
            violent_crime: *calibration.violent_crime(),
        }
    }
}

impl Default for SafetyScorer {
    fn default() -> Self {
        Self::new(&Calibration::default())
    }
}

impl DimensionScorer for SafetyScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Safety
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "safety blends two normalised crime terms"
    )]
    fn score(&self, metrics: &RawLocationMetrics, _profile: &WeightProfile) -> f64 {
        let hate = normalize_directed(metrics.hate_crime_rate(), &self.hate_crime);
        let violent = normalize_directed(metrics.violent_crime_rate(), &self.violent_crime);
        Self::sanitise(hate * Self::HATE_CRIME_WEIGHT + violent * Self::VIOLENT_CRIME_WEIGHT)
    }
}

/// Community make-up.
///
/// The score is the normalised diversity index. A representation proxy can
/// be blended in with [`CommunityScorer::with_representation_proxy`]; without
/// one the proxy term contributes nothing.
///
/// # Examples
/// ```
/// use trueplace_core::{DimensionScorer, RawLocationMetrics, WeightProfile};
/// use trueplace_scorer::CommunityScorer;
///
/// let metrics = RawLocationMetrics::new("Oakland", "CA").with_diversity_index(0.8);
/// let plain = CommunityScorer::default();
/// assert_eq!(plain.score(&metrics, &WeightProfile::new()), 0.8);
///
/// let blended = CommunityScorer::default().with_representation_proxy(0.5, |_| 0.0);
/// assert_eq!(blended.score(&metrics, &WeightProfile::new()), 0.4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CommunityScorer {
    diversity: NormalizationRange,
    representation_weight: f64,
    representation: Option<RepresentationProxy>,
}

impl CommunityScorer {
    /// Build a scorer from the calibration's diversity range.
    #[must_use]
    pub const fn new(calibration: &Calibration) -> Self {
        Self {
            diversity: *calibration.diversity(),
            representation_weight: 0.0,
            representation: None,
        }
    }

    /// Blend a representation proxy into the score.
    ///
    /// `weight` is the proxy's share of the community score and is clamped to
    /// `0.0..=1.0`; the diversity term keeps the remainder.
    #[must_use]
    pub fn with_representation_proxy(mut self, weight: f64, proxy: RepresentationProxy) -> Self {
        self.representation_weight = if weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.representation = Some(proxy);
        self
    }

    fn representation(&self, metrics: &RawLocationMetrics) -> f64 {
        self.representation
            .map_or(0.0, |proxy| Self::sanitise(proxy(metrics)))
    }
}

impl Default for CommunityScorer {
    fn default() -> Self {
        Self::new(&Calibration::default())
    }
}

impl DimensionScorer for CommunityScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Community
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "community blends diversity with the representation proxy"
    )]
    fn score(&self, metrics: &RawLocationMetrics, _profile: &WeightProfile) -> f64 {
        let diversity = normalize_directed(metrics.diversity(), &self.diversity);
        let proxy_weight = self.representation_weight;
        Self::sanitise(
            diversity * (1.0 - proxy_weight) + self.representation(metrics) * proxy_weight,
        )
    }
}

/// Housing affordability blended with health, penalised above budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostQualityScorer {
    housing_cost: NormalizationRange,
    health: NormalizationRange,
}

impl CostQualityScorer {
    /// Share of the score driven by housing affordability.
    pub const AFFORDABILITY_WEIGHT: f64 = 0.6;
    /// Share of the score driven by the health index.
    pub const HEALTH_WEIGHT: f64 = 0.4;
    /// Penalty applied per unit of relative overspend.
    pub const BUDGET_PENALTY_RATE: f64 = 0.3;
    /// Largest penalty that can be applied.
    pub const MAX_BUDGET_PENALTY: f64 = 0.5;

    /// Build a scorer from the calibration's housing and health ranges.
    #[must_use]
    pub const fn new(calibration: &Calibration) -> Self {
        Self {
            housing_cost: *calibration.housing_cost(),
            health: *calibration.health(),
        }
    }

    /// Fraction removed from the score when `cost` exceeds `budget_max`.
    ///
    /// Zero at or under budget; otherwise `0.3` per unit of relative
    /// overspend, capped at `0.5`.
    ///
    /// # Examples
    /// ```
    /// use trueplace_scorer::CostQualityScorer;
    ///
    /// assert_eq!(CostQualityScorer::budget_penalty(1500.0, 1500.0), 0.0);
    /// assert_eq!(CostQualityScorer::budget_penalty(3000.0, 1500.0), 0.3);
    /// assert_eq!(CostQualityScorer::budget_penalty(9000.0, 1500.0), 0.5);
    /// ```
    #[expect(
        clippy::float_arithmetic,
        reason = "penalty scales with relative overspend"
    )]
    #[must_use]
    pub fn budget_penalty(cost: f64, budget_max: f64) -> f64 {
        if !cost.is_finite() || !budget_max.is_finite() || budget_max <= 0.0 || cost <= budget_max
        {
            return 0.0;
        }
        let over_budget = (cost - budget_max) / budget_max;
        (over_budget * Self::BUDGET_PENALTY_RATE).min(Self::MAX_BUDGET_PENALTY)
    }
}

impl Default for CostQualityScorer {
    fn default() -> Self {
        Self::new(&Calibration::default())
    }
}

impl DimensionScorer for CostQualityScorer {
    fn dimension(&self) -> Dimension {
        Dimension::CostQuality
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "cost quality blends affordability and health then applies the penalty"
    )]
    fn score(&self, metrics: &RawLocationMetrics, profile: &WeightProfile) -> f64 {
        let affordability = normalize_directed(metrics.housing_cost(), &self.housing_cost);
        let health = normalize_directed(metrics.health_index(), &self.health);
        let base = affordability * Self::AFFORDABILITY_WEIGHT + health * Self::HEALTH_WEIGHT;
        let penalty = match (metrics.reported_housing_cost(), profile.budget_max()) {
            (Some(cost), Some(budget)) => Self::budget_penalty(cost, budget),
            _ => 0.0,
        };
        Self::sanitise(base * (1.0 - penalty))
    }
}

/// Legacy scorer returning `1.0` when a boolean location flag is set.
#[derive(Debug, Clone, Copy)]
pub struct BinaryFlagScorer {
    dimension: Dimension,
    flag: fn(&RawLocationMetrics) -> Option<bool>,
}

impl BinaryFlagScorer {
    /// Score the legacy mobility flag.
    #[must_use]
    pub const fn mobility() -> Self {
        Self {
            dimension: Dimension::Mobility,
            flag: mobility_flag,
        }
    }

    /// Score the legacy inclusion flag.
    #[must_use]
    pub const fn inclusion() -> Self {
        Self {
            dimension: Dimension::Inclusion,
            flag: inclusion_flag,
        }
    }
}

const fn mobility_flag(metrics: &RawLocationMetrics) -> Option<bool> {
    metrics.mobility
}

const fn inclusion_flag(metrics: &RawLocationMetrics) -> Option<bool> {
    metrics.inclusion
}

impl DimensionScorer for BinaryFlagScorer {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn score(&self, metrics: &RawLocationMetrics, _profile: &WeightProfile) -> f64 {
        if (self.flag)(metrics).unwrap_or(false) {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use trueplace_core::{Direction, HATE_CRIME_RANGE};

    const TOLERANCE: f64 = 1e-12;

    #[expect(clippy::float_arithmetic, reason = "tests compare floating point values")]
    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[rstest]
    #[case(0.0, 0.0, 1.0)]
    #[case(50.0, 0.0, 0.3)]
    #[case(0.0, 2000.0, 0.7)]
    #[case(50.0, 2000.0, 0.0)]
    #[case(25.0, 1000.0, 0.5)]
    fn safety_weights_hate_crimes_heavily(
        #[case] hate: f64,
        #[case] violent: f64,
        #[case] expected: f64,
    ) {
        let metrics = RawLocationMetrics::new("A", "B")
            .with_hate_crime_rate(hate)
            .with_violent_crime_rate(violent);
        assert_close(
            SafetyScorer::default().score(&metrics, &WeightProfile::new()),
            expected,
        );
    }

    #[rstest]
    fn missing_crime_data_scores_as_safe() {
        let metrics = RawLocationMetrics::new("A", "B");
        assert_close(
            SafetyScorer::default().score(&metrics, &WeightProfile::new()),
            1.0,
        );
    }

    #[rstest]
    fn custom_calibration_changes_safety() {
        let calibration = Calibration::builder()
            .hate_crime(
                NormalizationRange::new(
                    HATE_CRIME_RANGE.metric(),
                    0.0,
                    10.0,
                    Direction::LowerIsBetter,
                )
                .expect("valid range"),
            )
            .build();
        let metrics = RawLocationMetrics::new("A", "B").with_hate_crime_rate(10.0);
        assert_close(
            SafetyScorer::new(&calibration).score(&metrics, &WeightProfile::new()),
            0.3,
        );
    }

    #[rstest]
    #[case(None, 0.0)]
    #[case(Some(0.45), 0.45)]
    #[case(Some(1.0), 1.0)]
    fn community_tracks_diversity(#[case] diversity: Option<f64>, #[case] expected: f64) {
        let mut metrics = RawLocationMetrics::new("A", "B");
        metrics.diversity_index = diversity;
        assert_close(
            CommunityScorer::default().score(&metrics, &WeightProfile::new()),
            expected,
        );
    }

    #[rstest]
    fn representation_proxy_is_sanitised() {
        let scorer = CommunityScorer::default().with_representation_proxy(1.0, |_| f64::NAN);
        let metrics = RawLocationMetrics::new("A", "B").with_diversity_index(1.0);
        assert_close(scorer.score(&metrics, &WeightProfile::new()), 0.0);
    }

    #[rstest]
    fn cost_quality_uses_neutral_defaults() {
        // Default cost 2000 and health 50.
        let metrics = RawLocationMetrics::new("A", "B");
        let expected = (1.0 - 1500.0 / 4500.0) * 0.6 + 0.5 * 0.4;
        assert_close(
            CostQualityScorer::default().score(&metrics, &WeightProfile::new()),
            expected,
        );
    }

    #[rstest]
    #[case(1000.0, 0.0)]
    #[case(1500.0, 0.0)]
    #[case(2250.0, 0.15)]
    #[case(3000.0, 0.3)]
    #[case(4000.0, 0.5)]
    #[case(1_000_000.0, 0.5)]
    fn budget_penalty_is_capped(#[case] cost: f64, #[case] expected: f64) {
        assert_close(CostQualityScorer::budget_penalty(cost, 1500.0), expected);
    }

    #[rstest]
    fn penalty_needs_a_reported_cost() {
        let profile = WeightProfile::new().with_budget_max(1000.0);
        let metrics = RawLocationMetrics::new("A", "B");
        let scorer = CostQualityScorer::default();
        assert_close(
            scorer.score(&metrics, &profile),
            scorer.score(&metrics, &WeightProfile::new()),
        );
    }

    #[rstest]
    #[case(Some(true), 1.0)]
    #[case(Some(false), 0.0)]
    #[case(None, 0.0)]
    fn flags_score_as_binary(#[case] flag: Option<bool>, #[case] expected: f64) {
        let mut metrics = RawLocationMetrics::new("A", "B");
        metrics.mobility = flag;
        metrics.inclusion = flag;
        let profile = WeightProfile::new();
        assert_eq!(BinaryFlagScorer::mobility().score(&metrics, &profile), expected);
        assert_eq!(BinaryFlagScorer::inclusion().score(&metrics, &profile), expected);
        assert_eq!(BinaryFlagScorer::mobility().dimension(), Dimension::Mobility);
    }
}
