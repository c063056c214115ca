//! SQLite-backed dataset of locations, crime statistics and hate crimes.

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use rusqlite::{Connection, OpenFlags};

use crate::RawLocationMetrics;

use super::{DatasetError, DatasetSource, DatasetSummary};

/// Tables and columns the dataset reads.
///
/// `crime_stats` holds at most one row per location; `hate_crimes` holds one
/// row per reporting period and bias category.
pub const SCHEMA: &str = "
CREATE TABLE locations (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    state TEXT NOT NULL,
    diversity_index REAL,
    median_monthly_housing_cost REAL,
    health_index REAL,
    mobility INTEGER,
    inclusion INTEGER
);
CREATE TABLE crime_stats (
    location_id INTEGER PRIMARY KEY REFERENCES locations(id),
    violent_rate REAL,
    hate_crime_rate REAL
);
CREATE TABLE hate_crimes (
    id INTEGER PRIMARY KEY,
    location_id INTEGER NOT NULL REFERENCES locations(id),
    bias_type TEXT NOT NULL,
    incidents INTEGER NOT NULL
);
";

const LOCATIONS_QUERY: &str = "
SELECT l.id, l.name, l.state, c.hate_crime_rate, c.violent_rate,
       l.diversity_index, l.median_monthly_housing_cost, l.health_index,
       l.mobility, l.inclusion
FROM locations l
LEFT JOIN crime_stats c ON c.location_id = l.id
ORDER BY l.id";

const BIAS_QUERY: &str = "
SELECT location_id, bias_type, SUM(incidents)
FROM hate_crimes
GROUP BY location_id, bias_type";

// (summary label, table)
const COUNTED_TABLES: [(&str, &str); 3] = [
    ("locations", "locations"),
    ("crimeStats", "crime_stats"),
    ("hateCrimes", "hate_crimes"),
];

// (summary label, table, column)
const SUMMED_COLUMNS: [(&str, &str, &str); 8] = [
    ("locations.diversityIndex", "locations", "diversity_index"),
    (
        "locations.medianMonthlyHousingCost",
        "locations",
        "median_monthly_housing_cost",
    ),
    ("locations.healthIndex", "locations", "health_index"),
    ("locations.mobility", "locations", "mobility"),
    ("locations.inclusion", "locations", "inclusion"),
    ("hateCrimes.incidents", "hate_crimes", "incidents"),
    ("crimeStats.violentRate", "crime_stats", "violent_rate"),
    ("crimeStats.hateCrimeRate", "crime_stats", "hate_crime_rate"),
];

/// Read-only dataset backed by a SQLite database following [`SCHEMA`].
pub struct SqliteDataset {
    path: PathBuf,
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqliteDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDataset")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteDataset {
    /// Open the database at `path` read-only.
    ///
    /// # Errors
    /// Returns [`DatasetError::OpenDatabase`] when SQLite cannot open the file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| DatasetError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            connection: Mutex::new(connection),
        })
    }

    /// Location of the database on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connection(&self) -> MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl DatasetSource for SqliteDataset {
    fn summary(&self) -> Result<DatasetSummary, DatasetError> {
        let connection = self.connection();
        let mut summary = DatasetSummary::default();
        for (label, table) in COUNTED_TABLES {
            let count: i64 =
                connection.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?;
            summary = summary.with_count(label, u64::try_from(count).unwrap_or(0));
        }
        for (label, table, column) in SUMMED_COLUMNS {
            let sum: f64 = connection.query_row(
                &format!("SELECT CAST(COALESCE(SUM({column}), 0) AS REAL) FROM {table}"),
                [],
                |row| row.get(0),
            )?;
            summary = summary.with_sum(label, sum);
        }
        Ok(summary)
    }

    fn locations(&self) -> Result<Vec<RawLocationMetrics>, DatasetError> {
        let connection = self.connection();
        let mut incidents = load_bias_incidents(&connection)?;

        let mut statement = connection.prepare(LOCATIONS_QUERY)?;
        let mut rows = statement.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let id: i64 = row.get(0)?;
            records.push(RawLocationMetrics {
                name: row.get(1)?,
                region: row.get(2)?,
                hate_crime_rate_per_100k: row.get(3)?,
                violent_crime_rate_per_100k: row.get(4)?,
                diversity_index: row.get(5)?,
                median_monthly_housing_cost: row.get(6)?,
                health_index: row.get(7)?,
                mobility: row.get(8)?,
                inclusion: row.get(9)?,
                bias_incidents: incidents.remove(&id).unwrap_or_default(),
            });
        }
        Ok(records)
    }
}

fn load_bias_incidents(
    connection: &Connection,
) -> Result<BTreeMap<i64, BTreeMap<String, u64>>, DatasetError> {
    let mut statement = connection.prepare(BIAS_QUERY)?;
    let mut rows = statement.query([])?;
    let mut by_location: BTreeMap<i64, BTreeMap<String, u64>> = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let location_id: i64 = row.get(0)?;
        let bias_type: String = row.get(1)?;
        let total: i64 = row.get(2)?;
        by_location
            .entry(location_id)
            .or_default()
            .insert(bias_type, u64::try_from(total).unwrap_or(0));
    }
    Ok(by_location)
}
