//! Error type raised while scoring a single location.

use thiserror::Error;
use trueplace_core::{ConfigurationError, MalformedMetricsError};

/// Errors returned by [`compute_score`](crate::compute_score) and
/// [`ScoringEngine::score`](crate::ScoringEngine::score).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// The weight profile or calibration cannot produce a composite.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The location record breaks its invariants.
    #[error("location '{name}' is malformed: {source}")]
    MalformedMetrics {
        /// Name of the rejected record.
        name: String,
        /// Invariant that failed.
        #[source]
        source: MalformedMetricsError,
    },
}
