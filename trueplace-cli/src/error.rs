//! Error types emitted by the `TruePlace` CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use trueplace_core::DatasetError;
use trueplace_ranking::{QueryError, RankingError};

/// Errors emitted by the `TruePlace` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Long flag name of the option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// Two options that select the same input were both given.
    #[error("--{first} and --{second} cannot be used together")]
    ConflictingArguments {
        /// Flag seen first.
        first: &'static str,
        /// Flag that conflicts with it.
        second: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature to enable.
        feature: &'static str,
        /// What the user asked for.
        action: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag that named the path.
        field: &'static str,
        /// Path as given.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag that named the path.
        field: &'static str,
        /// Path as given.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag that named the path.
        field: &'static str,
        /// Path as given.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the locations file failed.
    #[error("failed to open locations file at {path:?}: {source}")]
    OpenLocations {
        /// Path of the locations file.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The locations file is not a JSON array of location records.
    #[error("failed to parse locations JSON at {path:?}: {source}")]
    ParseLocations {
        /// Path of the locations file.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// Reading or fingerprinting the dataset failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// A filter, sort or pagination option is malformed.
    #[error("invalid ranking option: {0}")]
    Query(#[from] QueryError),
    /// Ranking the dataset failed.
    #[error(transparent)]
    Rank(#[from] RankingError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
