//! Dataset sources and their content fingerprints.
//!
//! A [`DatasetSource`] hands the scorer its location records and a compact
//! [`DatasetSummary`] of what it holds: record counts and a few aggregate
//! sums per collection. Hashing the summary yields a [`DatasetFingerprint`]
//! that changes whenever the underlying data does, which lets downstream
//! caches key on data identity without hashing every record.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::RawLocationMetrics;

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
pub use sqlite::{SCHEMA, SqliteDataset};

/// Number of hex characters kept from the SHA-256 digest.
pub const FINGERPRINT_LEN: usize = 12;

/// Errors raised while reading a dataset or computing its fingerprint.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Opening the SQLite database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: std::path::PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Generic SQLite error when reading rows or aggregates.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
    /// The summary could not be serialised for hashing.
    #[error("failed to serialise dataset summary: {source}")]
    Summary {
        /// Encoder failure from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}

/// Record counts and aggregate sums describing a dataset's contents.
///
/// Both maps are ordered, so the canonical JSON form is stable.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DatasetSummary {
    /// Record count per collection.
    pub counts: BTreeMap<String, u64>,
    /// Aggregate sums keyed by `collection.field`-style labels.
    pub sums: BTreeMap<String, f64>,
}

impl DatasetSummary {
    /// Record a collection's count while returning `self` for chaining.
    #[must_use]
    pub fn with_count(mut self, collection: impl Into<String>, count: u64) -> Self {
        self.counts.insert(collection.into(), count);
        self
    }

    /// Record an aggregate sum while returning `self` for chaining.
    #[must_use]
    pub fn with_sum(mut self, label: impl Into<String>, sum: f64) -> Self {
        self.sums.insert(label.into(), sum);
        self
    }
}

/// Short content hash of a [`DatasetSummary`].
///
/// # Examples
/// ```
/// use trueplace_core::{DatasetFingerprint, DatasetSummary};
///
/// # fn main() -> Result<(), trueplace_core::DatasetError> {
/// let summary = DatasetSummary::default().with_count("locations", 3);
/// let fingerprint = DatasetFingerprint::of(&summary)?;
/// assert_eq!(fingerprint.as_str().len(), 12);
/// assert_eq!(fingerprint, DatasetFingerprint::of(&summary)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetFingerprint(String);

impl DatasetFingerprint {
    /// Hash the canonical JSON form of `summary`.
    ///
    /// # Errors
    /// Returns [`DatasetError::Summary`] if the summary cannot be encoded.
    pub fn of(summary: &DatasetSummary) -> Result<Self, DatasetError> {
        let canonical =
            serde_json::to_vec(summary).map_err(|source| DatasetError::Summary { source })?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        let digest = format!("{:x}", hasher.finalize());
        Ok(Self(digest.chars().take(FINGERPRINT_LEN).collect()))
    }

    /// Borrow the hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only access to a collection of location records.
///
/// Implementations must be thread-safe so a ranking service can share them
/// between requests.
pub trait DatasetSource: Send + Sync {
    /// Summarise the dataset's current contents.
    ///
    /// # Errors
    /// Returns [`DatasetError`] when the backing store cannot be read.
    fn summary(&self) -> Result<DatasetSummary, DatasetError>;

    /// Load every location record in dataset order.
    ///
    /// # Errors
    /// Returns [`DatasetError`] when the backing store cannot be read.
    fn locations(&self) -> Result<Vec<RawLocationMetrics>, DatasetError>;

    /// Fingerprint of the current contents.
    ///
    /// # Errors
    /// Propagates failures from [`DatasetSource::summary`] and
    /// [`DatasetFingerprint::of`].
    fn fingerprint(&self) -> Result<DatasetFingerprint, DatasetError> {
        DatasetFingerprint::of(&self.summary()?)
    }
}

impl<T: DatasetSource + ?Sized> DatasetSource for Arc<T> {
    fn summary(&self) -> Result<DatasetSummary, DatasetError> {
        (**self).summary()
    }

    fn locations(&self) -> Result<Vec<RawLocationMetrics>, DatasetError> {
        (**self).locations()
    }
}

impl<T: DatasetSource + ?Sized> DatasetSource for Box<T> {
    fn summary(&self) -> Result<DatasetSummary, DatasetError> {
        (**self).summary()
    }

    fn locations(&self) -> Result<Vec<RawLocationMetrics>, DatasetError> {
        (**self).locations()
    }
}

/// Dataset held entirely in memory, in insertion order.
///
/// # Examples
/// ```
/// use trueplace_core::{DatasetSource, MemoryDataset, RawLocationMetrics};
///
/// # fn main() -> Result<(), trueplace_core::DatasetError> {
/// let dataset = MemoryDataset::new(vec![
///     RawLocationMetrics::new("Austin", "TX").with_bias_incidents("race", 4),
/// ]);
/// let summary = dataset.summary()?;
/// assert_eq!(summary.counts.get("locations"), Some(&1));
/// assert_eq!(summary.counts.get("biasIncidents"), Some(&4));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDataset {
    records: Vec<RawLocationMetrics>,
}

impl MemoryDataset {
    /// Wrap a vector of records.
    #[must_use]
    pub const fn new(records: Vec<RawLocationMetrics>) -> Self {
        Self { records }
    }

    /// Borrow the records.
    #[must_use]
    pub fn records(&self) -> &[RawLocationMetrics] {
        &self.records
    }
}

impl FromIterator<RawLocationMetrics> for MemoryDataset {
    fn from_iter<I: IntoIterator<Item = RawLocationMetrics>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl DatasetSource for MemoryDataset {
    fn summary(&self) -> Result<DatasetSummary, DatasetError> {
        let records = &self.records;
        let incidents = records
            .iter()
            .flat_map(|record| record.bias_incidents.values())
            .fold(0_u64, |total, count| total.saturating_add(*count));
        let location_count = u64::try_from(records.len()).unwrap_or(u64::MAX);

        Ok(DatasetSummary::default()
            .with_count("locations", location_count)
            .with_count("biasIncidents", incidents)
            .with_sum(
                "hateCrimeRatePer100k",
                reported_sum(records, |r| r.hate_crime_rate_per_100k),
            )
            .with_sum(
                "violentCrimeRatePer100k",
                reported_sum(records, |r| r.violent_crime_rate_per_100k),
            )
            .with_sum(
                "diversityIndex",
                reported_sum(records, |r| r.diversity_index),
            )
            .with_sum(
                "medianMonthlyHousingCost",
                reported_sum(records, |r| r.median_monthly_housing_cost),
            )
            .with_sum("healthIndex", reported_sum(records, |r| r.health_index)))
    }

    fn locations(&self) -> Result<Vec<RawLocationMetrics>, DatasetError> {
        Ok(self.records.clone())
    }
}

fn reported_sum(
    records: &[RawLocationMetrics],
    field: impl Fn(&RawLocationMetrics) -> Option<f64>,
) -> f64 {
    records
        .iter()
        .filter_map(field)
        .filter(|value| value.is_finite())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dataset() -> MemoryDataset {
        MemoryDataset::new(vec![
            RawLocationMetrics::new("Portland", "OR")
                .with_hate_crime_rate(4.0)
                .with_housing_cost(1800.0)
                .with_bias_incidents("race", 2),
            RawLocationMetrics::new("Boise", "ID").with_housing_cost(1200.0),
        ])
    }

    #[rstest]
    fn summary_counts_records_and_incidents(dataset: MemoryDataset) {
        let summary = dataset.summary().expect("memory summary");
        assert_eq!(summary.counts.get("locations"), Some(&2));
        assert_eq!(summary.counts.get("biasIncidents"), Some(&2));
        assert_eq!(summary.sums.get("medianMonthlyHousingCost"), Some(&3000.0));
        assert_eq!(summary.sums.get("diversityIndex"), Some(&0.0));
    }

    #[rstest]
    fn fingerprint_is_twelve_lowercase_hex_chars(dataset: MemoryDataset) {
        let fingerprint = dataset.fingerprint().expect("fingerprint");
        assert_eq!(fingerprint.as_str().len(), FINGERPRINT_LEN);
        assert!(
            fingerprint
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[rstest]
    fn fingerprint_tracks_content_changes(dataset: MemoryDataset) {
        let before = dataset.fingerprint().expect("fingerprint");
        let mut records = dataset.records().to_vec();
        records.push(RawLocationMetrics::new("Denver", "CO"));
        let after = MemoryDataset::new(records)
            .fingerprint()
            .expect("fingerprint");
        assert_ne!(before, after);
    }

    #[rstest]
    fn fingerprint_matches_known_digest() {
        let fingerprint = DatasetFingerprint::of(&DatasetSummary::default()).expect("fingerprint");
        let mut hasher = Sha256::new();
        hasher.update(br#"{"counts":{},"sums":{}}"#);
        let expected = format!("{:x}", hasher.finalize());
        assert!(expected.starts_with(fingerprint.as_str()));
    }
}
