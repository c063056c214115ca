//! Error type for ranking requests.

use thiserror::Error;
use trueplace_core::{ConfigurationError, DatasetError};

use crate::QueryError;

/// Errors returned by [`RankingService`](crate::RankingService).
#[derive(Debug, Error)]
pub enum RankingError {
    /// The dataset could not be read or fingerprinted.
    #[error("failed to read dataset: {0}")]
    Dataset(#[from] DatasetError),
    /// The weight profile cannot produce a composite.
    #[error("invalid scoring configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    /// The request parameters are malformed.
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),
    /// The cache key could not be serialised.
    #[error("failed to build cache key: {0}")]
    CacheKey(#[from] serde_json::Error),
}
