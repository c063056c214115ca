//! Error types shared by every scoring component.

use thiserror::Error;

use crate::Dimension;

/// Invalid process or request configuration.
///
/// These errors are fatal to the call that raised them; callers must never
/// substitute a default composite.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// A normalization range was empty, inverted or non-finite.
    #[error("normalization range for {metric} requires max > min (got {min}..{max})")]
    InvalidRange {
        /// Metric the range calibrates.
        metric: &'static str,
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },
    /// Every scored dimension carries zero weight.
    #[error("weights for scored dimensions sum to zero; no composite can be produced")]
    ZeroWeightSum,
    /// A dimension weight was negative or non-finite.
    #[error("weight {weight} for {dimension} must be finite and non-negative")]
    InvalidWeight {
        /// Dimension carrying the bad weight.
        dimension: Dimension,
        /// Weight supplied by the caller.
        weight: f64,
    },
    /// The monthly budget ceiling was non-finite or not positive.
    #[error("budget ceiling {budget} must be finite and positive")]
    InvalidBudget {
        /// Budget supplied by the caller.
        budget: f64,
    },
}

/// A location record that cannot be scored.
///
/// Missing optional fields never raise this error; they fall back to neutral
/// defaults. Only values that break the record's invariants do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedMetricsError {
    /// The record has no usable name.
    #[error("location record has an empty name")]
    MissingName,
    /// A numeric field was infinite.
    #[error("{field} must be a finite number")]
    NonFinite {
        /// Offending field.
        field: &'static str,
    },
    /// A rate or index field was negative.
    #[error("{field} must be non-negative (got {value})")]
    Negative {
        /// Offending field.
        field: &'static str,
        /// Value found in the record.
        value: f64,
    },
    /// A bounded index fell outside its domain.
    #[error("{field} must lie within {min}..={max} (got {value})")]
    OutOfRange {
        /// Offending field.
        field: &'static str,
        /// Value found in the record.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Housing cost must be strictly positive.
    #[error("medianMonthlyHousingCost must be positive (got {value})")]
    NonPositiveHousingCost {
        /// Value found in the record.
        value: f64,
    },
}
