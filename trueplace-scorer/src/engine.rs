//! Composite scoring across a configurable set of dimensions.
//!
//! A [`ScoringEngine`] owns one [`DimensionScorer`] per dimension it scores.
//! Profile weights are normalised over those dimensions only, so a weight on
//! a dimension the engine does not score is ignored rather than diluting the
//! composite.

use std::fmt;

use log::{debug, warn};
use trueplace_core::{
    Calibration, ConfigurationError, Dimension, DimensionScorer, DimensionScores,
    RawLocationMetrics, ScoreResult, WeightProfile,
};

use crate::{
    BinaryFlagScorer, CommunityScorer, CostQualityScorer, SafetyScorer, ScoreError,
    get_citations, rationale,
};

/// Calibration version reported by engines without standard dimensions.
pub const UNCALIBRATED: &str = "uncalibrated";

/// Weighted blend of dimension scorers.
///
/// The engine is immutable once built and is `Send + Sync`, so one instance
/// can serve every request in a process.
///
/// # Examples
/// ```
/// use trueplace_core::{Dimension, DimensionWeights, RawLocationMetrics, WeightProfile};
/// use trueplace_scorer::ScoringEngine;
///
/// # fn main() -> Result<(), trueplace_scorer::ScoreError> {
/// let metrics = RawLocationMetrics::new("Ideal", "ZZ")
///     .with_hate_crime_rate(0.0)
///     .with_violent_crime_rate(0.0)
///     .with_diversity_index(1.0)
///     .with_housing_cost(500.0)
///     .with_health_index(100.0);
/// let profile = WeightProfile::from_weights(DimensionWeights::new(1.0, 1.0, 1.0));
/// let result = ScoringEngine::standard().score(&metrics, &profile)?;
/// assert_eq!(result.composite, 100);
/// assert_eq!(result.dims.get(Dimension::Safety), Some(100));
/// # Ok(())
/// # }
/// ```
pub struct ScoringEngine {
    scorers: Vec<Box<dyn DimensionScorer>>,
    calibration_version: String,
}

impl fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("dimensions", &self.dimensions())
            .field("calibration_version", &self.calibration_version)
            .finish()
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringEngine {
    /// Safety, community and cost-quality with the shipped calibration.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_calibration(&Calibration::default())
    }

    /// Safety, community and cost-quality with a custom calibration.
    #[must_use]
    pub fn with_calibration(calibration: &Calibration) -> Self {
        Self::builder()
            .with_standard_dimensions(calibration)
            .build()
    }

    /// The standard dimensions plus binary mobility and inclusion flags.
    #[deprecated(note = "build the legacy flags explicitly with `ScoringEngine::builder()`")]
    #[must_use]
    pub fn legacy() -> Self {
        Self::builder()
            .with_standard_dimensions(&Calibration::default())
            .with_scorer(BinaryFlagScorer::mobility())
            .with_scorer(BinaryFlagScorer::inclusion())
            .build()
    }

    /// Start an empty builder.
    #[must_use]
    pub fn builder() -> ScoringEngineBuilder {
        ScoringEngineBuilder::default()
    }

    /// Dimensions the engine scores, in scorer order.
    #[must_use]
    pub fn dimensions(&self) -> Vec<Dimension> {
        self.scorers.iter().map(|scorer| scorer.dimension()).collect()
    }

    /// Version of the calibration behind the standard dimensions.
    ///
    /// Engines built without [`ScoringEngineBuilder::with_standard_dimensions`]
    /// report [`UNCALIBRATED`].
    #[must_use]
    pub fn calibration_version(&self) -> &str {
        &self.calibration_version
    }

    /// Report whether the engine carries a scorer for `dimension`.
    #[must_use]
    pub fn scores(&self, dimension: Dimension) -> bool {
        self.scorers
            .iter()
            .any(|scorer| scorer.dimension() == dimension)
    }

    /// Check that `profile` can produce a composite on this engine.
    ///
    /// # Errors
    /// Returns the [`ConfigurationError`] that [`ScoringEngine::score`]
    /// would report for `profile`.
    pub fn check_profile(&self, profile: &WeightProfile) -> Result<(), ConfigurationError> {
        self.effective_weights(profile).map(|_| ())
    }

    /// Score a single location.
    ///
    /// # Errors
    /// Returns [`ScoreError::Configuration`] when the profile is invalid or
    /// its weights over the scored dimensions sum to zero, and
    /// [`ScoreError::MalformedMetrics`] when the record breaks its
    /// invariants.
    pub fn score(
        &self,
        metrics: &RawLocationMetrics,
        profile: &WeightProfile,
    ) -> Result<ScoreResult, ScoreError> {
        let weights = self.effective_weights(profile)?;
        metrics
            .validate()
            .map_err(|source| ScoreError::MalformedMetrics {
                name: metrics.name.clone(),
                source,
            })?;
        Ok(self.score_valid(metrics, profile, &weights))
    }

    /// Score a batch, preserving input order.
    ///
    /// Malformed records are skipped with a logged warning; the rest of the
    /// batch still scores.
    ///
    /// # Errors
    /// Returns [`ConfigurationError`] when the profile cannot produce a
    /// composite. No record is scored in that case.
    pub fn score_all(
        &self,
        records: &[RawLocationMetrics],
        profile: &WeightProfile,
    ) -> Result<Vec<ScoreResult>, ConfigurationError> {
        let weights = self.effective_weights(profile)?;
        Ok(records
            .iter()
            .filter_map(|metrics| match metrics.validate() {
                Ok(()) => Some(self.score_valid(metrics, profile, &weights)),
                Err(err) => {
                    warn!("Skipping malformed location '{}': {err}", metrics.name);
                    None
                }
            })
            .collect())
    }

    /// Validate `profile` and return one weight per scorer, summing to one.
    #[expect(
        clippy::float_arithmetic,
        reason = "weights are rescaled by their largest value and total"
    )]
    fn effective_weights(&self, profile: &WeightProfile) -> Result<Vec<f64>, ConfigurationError> {
        let profile = profile.validate()?;
        for dimension in Dimension::ALL {
            let weight = profile.weight(dimension);
            if weight > 0.0 && !self.scores(dimension) {
                debug!("Ignoring weight {weight} for unscored dimension {dimension}");
            }
        }

        let raw: Vec<f64> = self
            .scorers
            .iter()
            .map(|scorer| profile.weight(scorer.dimension()))
            .collect();
        // Rescale by the largest weight first so huge finite weights cannot
        // overflow the total.
        let largest = raw.iter().copied().fold(0.0_f64, f64::max);
        if largest <= 0.0 {
            return Err(ConfigurationError::ZeroWeightSum);
        }
        let scaled: Vec<f64> = raw.iter().map(|weight| weight / largest).collect();
        let total: f64 = scaled.iter().sum();
        Ok(scaled.iter().map(|weight| weight / total).collect())
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "the composite is a weighted sum of unit scores"
    )]
    fn score_valid(
        &self,
        metrics: &RawLocationMetrics,
        profile: &WeightProfile,
        weights: &[f64],
    ) -> ScoreResult {
        let raw: Vec<(Dimension, f64)> = self
            .scorers
            .iter()
            .map(|scorer| (scorer.dimension(), unit(scorer.score(metrics, profile))))
            .collect();

        let composite: f64 = raw
            .iter()
            .zip(weights)
            .map(|((_, score), weight)| score * weight)
            .sum();

        let mut dims = DimensionScores::default();
        for (dimension, score) in &raw {
            dims.insert(*dimension, to_percent(*score));
        }

        let bullets = rationale(metrics, profile, |dimension| {
            raw.iter()
                .find(|(scored, _)| *scored == dimension)
                .map(|(_, score)| *score)
        });

        ScoreResult {
            name: metrics.name.clone(),
            region: metrics.region.clone(),
            composite: to_percent(composite),
            dims,
            rationale: bullets,
            citations: get_citations().to_vec(),
        }
    }
}

/// Builder for engines with a custom dimension set.
///
/// Adding a scorer for a dimension that already has one replaces it.
///
/// # Examples
/// ```
/// use trueplace_core::{Calibration, Dimension};
/// use trueplace_scorer::{BinaryFlagScorer, ScoringEngine};
///
/// let engine = ScoringEngine::builder()
///     .with_standard_dimensions(&Calibration::default())
///     .with_scorer(BinaryFlagScorer::mobility())
///     .build();
/// assert!(engine.scores(Dimension::Mobility));
/// assert!(!engine.scores(Dimension::Climate));
/// ```
#[derive(Default)]
pub struct ScoringEngineBuilder {
    scorers: Vec<Box<dyn DimensionScorer>>,
    calibration_version: Option<String>,
}

impl fmt::Debug for ScoringEngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringEngineBuilder")
            .field("scorers", &self.scorers.len())
            .field("calibration_version", &self.calibration_version)
            .finish()
    }
}

impl ScoringEngineBuilder {
    /// Add safety, community and cost-quality scorers.
    #[must_use]
    pub fn with_standard_dimensions(mut self, calibration: &Calibration) -> Self {
        self.calibration_version = Some(calibration.version().to_owned());
        self.with_scorer(SafetyScorer::new(calibration))
            .with_scorer(CommunityScorer::new(calibration))
            .with_scorer(CostQualityScorer::new(calibration))
    }

    /// Add a scorer, replacing any existing scorer for its dimension.
    #[must_use]
    pub fn with_scorer(mut self, scorer: impl DimensionScorer + 'static) -> Self {
        let dimension = scorer.dimension();
        self.scorers
            .retain(|existing| existing.dimension() != dimension);
        self.scorers.push(Box::new(scorer));
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ScoringEngine {
        ScoringEngine {
            scorers: self.scorers,
            calibration_version: self
                .calibration_version
                .unwrap_or_else(|| UNCALIBRATED.to_owned()),
        }
    }
}

fn unit(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "percentages are rounded and clamped to 0..=100 before narrowing"
)]
fn to_percent(score: f64) -> u8 {
    (unit(score) * 100.0).round().clamp(0.0, 100.0) as u8
}
