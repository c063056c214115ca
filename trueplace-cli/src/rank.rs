//! Rank command implementation for the `TruePlace` CLI.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use trueplace_core::{Dimension, WeightProfile};
use trueplace_ranking::{
    CacheMode, DEFAULT_TTL, QueryParams, RankingPage, RankingQuery, RankingService, ResultCache,
};
use trueplace_scorer::ScoringEngine;

use crate::dataset::DatasetLocation;
use crate::{
    ARG_BIAS_TYPE, ARG_BUDGET_MAX, ARG_CACHE_TTL_SECS, ARG_COMMUNITY_WEIGHT,
    ARG_COST_QUALITY_WEIGHT, ARG_DATASET_DB, ARG_DIVERSITY_EMPHASIS, ARG_LIMIT, ARG_LOCATIONS,
    ARG_MIN_COMMUNITY, ARG_MIN_SAFETY, ARG_OFFSET, ARG_QUERY, ARG_SAFETY_WEIGHT, ARG_SORT_BY,
    ARG_SORT_DIR, ARG_STATE, CliError, ENV_RANK_LOCATIONS, write_json,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score every location in a dataset against a weight profile, \
                 filter and sort the results, and print one page as JSON. \
                 Options can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Rank locations for a weight profile"
)]
#[ortho_config(prefix = "TRUEPLACE")]
pub(crate) struct RankArgs {
    /// Path to a JSON array of location records.
    #[arg(long = ARG_LOCATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) locations: Option<Utf8PathBuf>,
    /// Path to a SQLite dataset.
    #[arg(long = ARG_DATASET_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) dataset_db: Option<Utf8PathBuf>,
    /// Relative weight of the safety dimension.
    #[arg(long = ARG_SAFETY_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) safety_weight: Option<f64>,
    /// Relative weight of the community dimension.
    #[arg(long = ARG_COMMUNITY_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) community_weight: Option<f64>,
    /// Relative weight of the cost and quality dimension.
    #[arg(long = ARG_COST_QUALITY_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) cost_quality_weight: Option<f64>,
    /// Monthly housing budget in dollars.
    #[arg(long = ARG_BUDGET_MAX, value_name = "dollars")]
    #[serde(default)]
    pub(crate) budget_max: Option<f64>,
    /// Start from the diversity-emphasis weight preset.
    #[arg(
        long = ARG_DIVERSITY_EMPHASIS,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) diversity_emphasis: Option<bool>,
    /// Drop locations whose safety score is below this value.
    #[arg(long = ARG_MIN_SAFETY, value_name = "score")]
    #[serde(default)]
    pub(crate) min_safety: Option<f64>,
    /// Drop locations whose community score is below this value.
    #[arg(long = ARG_MIN_COMMUNITY, value_name = "score")]
    #[serde(default)]
    pub(crate) min_community: Option<f64>,
    /// Score to sort by: score, safety or community.
    #[arg(long = ARG_SORT_BY, value_name = "key")]
    #[serde(default)]
    pub(crate) sort_by: Option<String>,
    /// Sort direction: asc or desc.
    #[arg(long = ARG_SORT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) sort_dir: Option<String>,
    /// Keep only locations reporting incidents for this bias category.
    #[arg(long = ARG_BIAS_TYPE, value_name = "category")]
    #[serde(default)]
    pub(crate) bias_type: Option<Vec<String>>,
    /// Keep only locations in this state.
    #[arg(long = ARG_STATE, value_name = "code")]
    #[serde(default)]
    pub(crate) state: Option<String>,
    /// Keep only locations whose "name, state" contains this text.
    #[arg(long = ARG_QUERY, value_name = "text")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Page size, clamped to 1..=100.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Number of ranked results to skip.
    #[arg(long = ARG_OFFSET, value_name = "count")]
    #[serde(default)]
    pub(crate) offset: Option<usize>,
    /// Lifetime of cached rankings in seconds.
    #[arg(long = ARG_CACHE_TTL_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) cache_ttl_secs: Option<u64>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }

    /// Filter, sort and page options in request-parameter form.
    fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        let numbers = [
            ("minSafety", self.min_safety.map(|value| value.to_string())),
            ("minCommunity", self.min_community.map(|value| value.to_string())),
            ("limit", self.limit.map(|value| value.to_string())),
            ("offset", self.offset.map(|value| value.to_string())),
        ];
        let texts = [
            ("sortBy", self.sort_by.clone()),
            ("sortDir", self.sort_dir.clone()),
            ("state", self.state.clone()),
            ("q", self.query.clone()),
        ];
        for (name, value) in numbers.into_iter().chain(texts) {
            if let Some(present) = value {
                params.set(name, present);
            }
        }
        for bias in self.bias_type.iter().flatten() {
            params.push("biasType", bias.as_str());
        }
        params
    }

    fn profile(&self) -> WeightProfile {
        let mut profile =
            WeightProfile::with_diversity_emphasis(self.diversity_emphasis.unwrap_or(false));
        let overrides = [
            (Dimension::Safety, self.safety_weight),
            (Dimension::Community, self.community_weight),
            (Dimension::CostQuality, self.cost_quality_weight),
        ];
        for (dimension, weight) in overrides {
            if let Some(value) = weight {
                profile.set_weight(dimension, value);
            }
        }
        self.budget_max
            .map_or(profile, |budget| profile.with_budget_max(budget))
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankConfig {
    /// Dataset to rank.
    pub(crate) dataset: DatasetLocation,
    /// Weights, budget and preset for scoring.
    pub(crate) profile: WeightProfile,
    /// Filters, ordering and page.
    pub(crate) query: RankingQuery,
    /// Lifetime of cached rankings.
    pub(crate) cache_ttl: Duration,
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let query = RankingQuery::from_params(&args.query_params())?;
        let profile = args.profile();
        let cache_ttl = args.cache_ttl_secs.map_or(DEFAULT_TTL, Duration::from_secs);
        let dataset =
            DatasetLocation::select(args.locations, args.dataset_db, ENV_RANK_LOCATIONS)?;
        Ok(Self {
            dataset,
            profile,
            query,
            cache_ttl,
        })
    }
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &mut stdout)
}

pub(crate) fn run_rank_with(args: RankArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let page = execute_rank(&config)?;
    write_json(writer, &page)
}

/// Rank the configured dataset and return the requested page.
pub(crate) fn execute_rank(config: &RankConfig) -> Result<RankingPage, CliError> {
    config.dataset.validate_source()?;
    let source = config.dataset.open()?;
    let service = RankingService::new(
        ScoringEngine::standard(),
        source,
        ResultCache::new(config.cache_ttl),
    );
    Ok(service.rank(&config.profile, &config.query, CacheMode::Use)?)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
