//! Command-line interface for ranking `TruePlace` location datasets.
//!
//! `trueplace rank` scores a dataset against a weight profile and prints
//! one page of the ranking as JSON; `trueplace fingerprint` prints the
//! digest that keys cached rankings. Options layer CLI flags over
//! `TRUEPLACE_`-prefixed environment variables over configuration files.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod dataset;
mod error;
mod fingerprint;
mod fs;
mod rank;

pub use error::CliError;

use fingerprint::{FingerprintArgs, run_fingerprint};
use rank::{RankArgs, run_rank};

pub(crate) const ARG_LOCATIONS: &str = "locations";
pub(crate) const ARG_DATASET_DB: &str = "dataset-db";
pub(crate) const ARG_SAFETY_WEIGHT: &str = "safety-weight";
pub(crate) const ARG_COMMUNITY_WEIGHT: &str = "community-weight";
pub(crate) const ARG_COST_QUALITY_WEIGHT: &str = "cost-quality-weight";
pub(crate) const ARG_BUDGET_MAX: &str = "budget-max";
pub(crate) const ARG_DIVERSITY_EMPHASIS: &str = "diversity-emphasis";
pub(crate) const ARG_MIN_SAFETY: &str = "min-safety";
pub(crate) const ARG_MIN_COMMUNITY: &str = "min-community";
pub(crate) const ARG_SORT_BY: &str = "sort-by";
pub(crate) const ARG_SORT_DIR: &str = "sort-dir";
pub(crate) const ARG_BIAS_TYPE: &str = "bias-type";
pub(crate) const ARG_STATE: &str = "state";
pub(crate) const ARG_QUERY: &str = "query";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ARG_OFFSET: &str = "offset";
pub(crate) const ARG_CACHE_TTL_SECS: &str = "cache-ttl-secs";
pub(crate) const ENV_RANK_LOCATIONS: &str = "TRUEPLACE_CMDS_RANK_LOCATIONS";
pub(crate) const ENV_FINGERPRINT_LOCATIONS: &str = "TRUEPLACE_CMDS_FINGERPRINT_LOCATIONS";

/// Run the `TruePlace` CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, the
/// dataset cannot be read, or the output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Rank(args) => run_rank(args),
        Command::Fingerprint(args) => run_fingerprint(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "trueplace",
    about = "Rank locations by safety, community and cost of living",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score, filter and sort a dataset, printing one page as JSON.
    Rank(RankArgs),
    /// Print the fingerprint and summary of a dataset.
    Fingerprint(FingerprintArgs),
}

fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
