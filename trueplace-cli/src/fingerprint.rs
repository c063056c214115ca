//! Fingerprint command implementation for the `TruePlace` CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use trueplace_core::{DatasetFingerprint, DatasetSummary};

use crate::dataset::DatasetLocation;
use crate::{ARG_DATASET_DB, ARG_LOCATIONS, CliError, ENV_FINGERPRINT_LOCATIONS, write_json};

/// CLI arguments for the `fingerprint` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Summarise a dataset and print the short digest used to \
                 invalidate cached rankings when the data changes.",
    about = "Print a dataset's fingerprint"
)]
#[ortho_config(prefix = "TRUEPLACE")]
pub(crate) struct FingerprintArgs {
    /// Path to a JSON array of location records.
    #[arg(long = ARG_LOCATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) locations: Option<Utf8PathBuf>,
    /// Path to a SQLite dataset.
    #[arg(long = ARG_DATASET_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) dataset_db: Option<Utf8PathBuf>,
}

impl FingerprintArgs {
    fn into_config(self) -> Result<DatasetLocation, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DatasetLocation::try_from(merged)
    }
}

impl TryFrom<FingerprintArgs> for DatasetLocation {
    type Error = CliError;

    fn try_from(args: FingerprintArgs) -> Result<Self, Self::Error> {
        Self::select(args.locations, args.dataset_db, ENV_FINGERPRINT_LOCATIONS)
    }
}

/// Output of the `fingerprint` subcommand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct FingerprintReport {
    pub(crate) fingerprint: String,
    pub(crate) summary: DatasetSummary,
}

pub(crate) fn run_fingerprint(args: FingerprintArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_fingerprint_with(args, &mut stdout)
}

pub(crate) fn run_fingerprint_with(
    args: FingerprintArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let dataset = args.into_config()?;
    let report = execute_fingerprint(&dataset)?;
    write_json(writer, &report)
}

pub(crate) fn execute_fingerprint(
    dataset: &DatasetLocation,
) -> Result<FingerprintReport, CliError> {
    dataset.validate_source()?;
    let summary = dataset.open()?.summary()?;
    let fingerprint = DatasetFingerprint::of(&summary)?;
    Ok(FingerprintReport {
        fingerprint: fingerprint.as_str().to_owned(),
        summary,
    })
}
