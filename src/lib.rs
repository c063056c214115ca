//! Facade crate for the `TruePlace` location-scoring engine.
//!
//! This crate re-exports the core domain types, the scoring engine, and the
//! cached ranking service. Dataset fingerprinting and the SQLite dataset sit
//! behind the `serde` and `store-sqlite` feature flags.
//!
//! # Examples
//! ```
//! use trueplace_engine::{RawLocationMetrics, ScoringEngine, WeightProfile};
//!
//! # fn main() -> Result<(), trueplace_engine::ScoreError> {
//! let metrics = RawLocationMetrics::new("Portland", "OR")
//!     .with_hate_crime_rate(0.0)
//!     .with_violent_crime_rate(0.0)
//!     .with_diversity_index(1.0)
//!     .with_housing_cost(500.0)
//!     .with_health_index(100.0);
//! let weights = trueplace_engine::DimensionWeights::new(1.0, 1.0, 1.0);
//! let profile = WeightProfile::from_weights(weights);
//! let result = ScoringEngine::standard().score(&metrics, &profile)?;
//! assert_eq!(result.composite, 100);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub use trueplace_core::{
    Calibration, Citation, ConfigurationError, Dimension, DimensionScorer, DimensionScores,
    DimensionWeights, MalformedMetricsError, NormalizationRange, RawLocationMetrics, ScoreResult,
    WeightProfile,
};

#[cfg(feature = "serde")]
pub use trueplace_core::{
    DatasetError, DatasetFingerprint, DatasetSource, DatasetSummary, MemoryDataset,
};

#[cfg(feature = "store-sqlite")]
pub use trueplace_core::SqliteDataset;

pub use trueplace_scorer::{ScoreError, ScoringEngine, compute_score, compute_scores};

pub use trueplace_ranking::{
    CacheMode, CacheStatus, RankedLocation, RankingError, RankingPage, RankingQuery,
    RankingService, ResultCache,
};
