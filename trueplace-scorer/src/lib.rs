//! Deterministic, explainable location scoring.
//!
//! The crate turns a [`RawLocationMetrics`] record and a [`WeightProfile`]
//! into a [`ScoreResult`]:
//! - **Normalisation** maps each raw metric onto `0.0..=1.0` using the
//!   calibrated range and its direction.
//! - **Dimension scorers** blend normalised metrics into safety, community
//!   and cost-quality scores; cost-quality is penalised above the profile's
//!   budget.
//! - **The composite** weights the dimension scores by the profile,
//!   normalised over the dimensions the engine scores, and rounds to
//!   `0..=100`. Per-dimension outputs stay unweighted.
//! - **Rationale and citations** explain the result in at most three
//!   bullets and name the data sources behind each metric category.
//!
//! Every function is pure: identical inputs always produce identical
//! results, and engines can be shared freely across threads.
//!
//! # Examples
//!
//! ```
//! use trueplace_core::{Dimension, RawLocationMetrics, WeightProfile};
//! use trueplace_scorer::compute_score;
//!
//! # fn main() -> Result<(), trueplace_scorer::ScoreError> {
//! let metrics = RawLocationMetrics::new("Tacoma", "WA")
//!     .with_housing_cost(3000.0)
//!     .with_diversity_index(0.7);
//! let profile = WeightProfile::with_diversity_emphasis(true).with_budget_max(1500.0);
//! let result = compute_score(&metrics, &profile)?;
//! assert!(result.composite <= 100);
//! assert!(result.rationale.iter().any(|b| b.contains("$3,000")));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use std::sync::LazyLock;

use trueplace_core::{ConfigurationError, RawLocationMetrics, ScoreResult, WeightProfile};

mod citations;
mod dimensions;
mod engine;
mod error;
mod normalizer;
mod rationale;

pub use citations::get_citations;
pub use dimensions::{
    BinaryFlagScorer, CommunityScorer, CostQualityScorer, RepresentationProxy, SafetyScorer,
};
pub use engine::{ScoringEngine, ScoringEngineBuilder, UNCALIBRATED};
pub use error::ScoreError;
pub use normalizer::{normalize, normalize_directed, normalize_inverse};
pub use rationale::{
    DIVERSE_THRESHOLD, MAX_BULLETS, SAFE_THRESHOLD, UNSAFE_THRESHOLD, format_dollars, rationale,
};

static STANDARD_ENGINE: LazyLock<ScoringEngine> = LazyLock::new(ScoringEngine::standard);

/// Score one location with the standard engine.
///
/// # Errors
/// Returns [`ScoreError::Configuration`] for an unusable profile and
/// [`ScoreError::MalformedMetrics`] for a record that breaks its invariants.
pub fn compute_score(
    metrics: &RawLocationMetrics,
    weights: &WeightProfile,
) -> Result<ScoreResult, ScoreError> {
    STANDARD_ENGINE.score(metrics, weights)
}

/// Score a batch with the standard engine, preserving order.
///
/// Malformed records are logged and skipped.
///
/// # Errors
/// Returns [`ConfigurationError`] when the profile cannot produce a
/// composite.
pub fn compute_scores(
    metrics_list: &[RawLocationMetrics],
    weights: &WeightProfile,
) -> Result<Vec<ScoreResult>, ConfigurationError> {
    STANDARD_ENGINE.score_all(metrics_list, weights)
}
