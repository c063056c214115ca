//! Dataset selection shared by every subcommand.

use std::io::{BufReader, ErrorKind};

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use trueplace_core::{DatasetSource, MemoryDataset, RawLocationMetrics};

use crate::fs::{file_is_file, open_utf8_file};
use crate::{ARG_DATASET_DB, ARG_LOCATIONS, CliError};

/// Where location records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DatasetLocation {
    /// A JSON array of location records.
    Json(Utf8PathBuf),
    /// A SQLite database following the `trueplace_core` schema.
    Sqlite(Utf8PathBuf),
}

impl DatasetLocation {
    /// Pick exactly one of the two dataset options.
    pub(crate) fn select(
        locations: Option<Utf8PathBuf>,
        dataset_db: Option<Utf8PathBuf>,
        env: &'static str,
    ) -> Result<Self, CliError> {
        match (locations, dataset_db) {
            (Some(_), Some(_)) => Err(CliError::ConflictingArguments {
                first: ARG_LOCATIONS,
                second: ARG_DATASET_DB,
            }),
            (Some(path), None) => Ok(Self::Json(path)),
            (None, Some(path)) => Ok(Self::Sqlite(path)),
            (None, None) => Err(CliError::MissingArgument {
                field: ARG_LOCATIONS,
                env,
            }),
        }
    }

    pub(crate) fn path(&self) -> &Utf8Path {
        match self {
            Self::Json(path) | Self::Sqlite(path) => path,
        }
    }

    const fn field(&self) -> &'static str {
        match self {
            Self::Json(_) => ARG_LOCATIONS,
            Self::Sqlite(_) => ARG_DATASET_DB,
        }
    }

    pub(crate) fn validate_source(&self) -> Result<(), CliError> {
        let field = self.field();
        let path = self.path();
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Open the selected dataset.
    pub(crate) fn open(&self) -> Result<Box<dyn DatasetSource>, CliError> {
        match self {
            Self::Json(path) => {
                let records = load_locations(path)?;
                debug!("Loaded {} location records from {path}", records.len());
                Ok(Box::new(MemoryDataset::new(records)))
            }
            Self::Sqlite(path) => open_sqlite(path),
        }
    }
}

#[cfg(feature = "store-sqlite")]
fn open_sqlite(path: &Utf8Path) -> Result<Box<dyn DatasetSource>, CliError> {
    debug!("Opening SQLite dataset at {path}");
    let dataset = trueplace_core::SqliteDataset::open(path.as_std_path())?;
    Ok(Box::new(dataset))
}

#[cfg(not(feature = "store-sqlite"))]
fn open_sqlite(_path: &Utf8Path) -> Result<Box<dyn DatasetSource>, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "reading a SQLite dataset",
    })
}

/// Load a JSON array of [`RawLocationMetrics`] from disk.
///
/// Records that fail to decode are logged and skipped; the file as a whole
/// must still be a JSON array.
pub(crate) fn load_locations(path: &Utf8Path) -> Result<Vec<RawLocationMetrics>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenLocations {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let values: Vec<serde_json::Value> =
        serde_json::from_reader(reader).map_err(|source| CliError::ParseLocations {
            path: path.to_path_buf(),
            source,
        })?;
    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<RawLocationMetrics>(value) {
            Ok(record) => records.push(record),
            Err(err) => warn!("Skipping location record {index} in {path}: {err}"),
        }
    }
    Ok(records)
}
