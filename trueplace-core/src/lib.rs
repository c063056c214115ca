//! Core domain types for the TruePlace scoring engine.
//!
//! These models describe what is known about a place
//! ([`RawLocationMetrics`]), what a user cares about ([`WeightProfile`]),
//! how raw metrics map onto a common scale ([`Calibration`]) and what the
//! engine hands back ([`ScoreResult`]). Validation lives beside each type so
//! invalid input surfaces before any arithmetic runs.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod calibration;
#[cfg(feature = "serde")]
mod dataset;
mod dimension;
mod error;
mod metrics;
mod profile;
mod score;
mod scorer;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use calibration::{
    Calibration, CalibrationBuilder, DIVERSITY_RANGE, Direction, HATE_CRIME_RANGE, HEALTH_RANGE,
    HOUSING_COST_RANGE, NormalizationRange, VIOLENT_CRIME_RANGE,
};
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub use dataset::{
    DatasetError, DatasetFingerprint, DatasetSource, DatasetSummary, FINGERPRINT_LEN,
    MemoryDataset,
};
#[cfg(feature = "store-sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
pub use dataset::{SCHEMA, SqliteDataset};
pub use dimension::Dimension;
pub use error::{ConfigurationError, MalformedMetricsError};
pub use metrics::{
    DEFAULT_DIVERSITY_INDEX, DEFAULT_HATE_CRIME_RATE, DEFAULT_HEALTH_INDEX, DEFAULT_HOUSING_COST,
    DEFAULT_VIOLENT_CRIME_RATE, RawLocationMetrics,
};
pub use profile::{DimensionWeights, WeightProfile};
pub use score::{Citation, DimensionScores, ScoreResult};
pub use scorer::DimensionScorer;
