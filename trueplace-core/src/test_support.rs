//! Test-only fixtures shared by unit and behaviour tests across the
//! workspace.

#[cfg(feature = "store-sqlite")]
use std::path::Path;

use crate::{Dimension, DimensionScorer, RawLocationMetrics, WeightProfile};

/// Three locations mirroring [`write_sqlite_dataset`].
///
/// Portland is diverse and moderately priced, Boise reports only housing
/// and health data, and Austin reports religion-motivated incidents.
#[must_use]
pub fn sample_locations() -> Vec<RawLocationMetrics> {
    vec![
        RawLocationMetrics::new("Portland", "OR")
            .with_hate_crime_rate(6.5)
            .with_violent_crime_rate(410.0)
            .with_diversity_index(0.62)
            .with_housing_cost(1800.0)
            .with_health_index(71.0)
            .with_bias_incidents("race", 7),
        RawLocationMetrics::new("Boise", "ID")
            .with_diversity_index(0.31)
            .with_housing_cost(1350.0)
            .with_health_index(78.0),
        RawLocationMetrics::new("Austin", "TX")
            .with_hate_crime_rate(3.1)
            .with_violent_crime_rate(520.0)
            .with_diversity_index(0.71)
            .with_housing_cost(2100.0)
            .with_health_index(74.0)
            .with_bias_incidents("religion", 5),
    ]
}

/// Write a SQLite dataset holding the [`sample_locations`] records.
///
/// # Errors
/// Returns any error raised by SQLite while creating or filling tables.
#[cfg(feature = "store-sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
pub fn write_sqlite_dataset(path: &Path) -> rusqlite::Result<()> {
    let connection = rusqlite::Connection::open(path)?;
    connection.execute_batch(crate::SCHEMA)?;
    connection.execute_batch(
        "
        INSERT INTO locations
            (id, name, state, diversity_index, median_monthly_housing_cost, health_index)
        VALUES (1, 'Portland', 'OR', 0.62, 1800.0, 71.0),
               (2, 'Boise', 'ID', 0.31, 1350.0, 78.0),
               (3, 'Austin', 'TX', 0.71, 2100.0, 74.0);
        INSERT INTO crime_stats (location_id, violent_rate, hate_crime_rate)
        VALUES (1, 410.0, 6.5),
               (3, 520.0, 3.1);
        INSERT INTO hate_crimes (location_id, bias_type, incidents)
        VALUES (1, 'race', 5),
               (1, 'race', 2),
               (3, 'religion', 5);
        ",
    )?;
    Ok(())
}

/// Scorer returning the same quality for every location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantScorer {
    /// Dimension reported by the scorer.
    pub dimension: Dimension,
    /// Quality returned for every record.
    pub value: f64,
}

impl DimensionScorer for ConstantScorer {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn score(&self, _metrics: &RawLocationMetrics, _profile: &WeightProfile) -> f64 {
        Self::sanitise(self.value)
    }
}
