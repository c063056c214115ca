//! Ranking requests over a dataset, with result caching.
//!
//! A request is answered in four steps:
//! 1. Fingerprint the dataset and derive the cache key.
//! 2. On a live cache entry, reuse its ranked list.
//! 3. Otherwise score every location, filter, stable-sort and store the
//!    full list under the key.
//! 4. Slice the requested page out of the list.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::{Serialize, Serializer};
use trueplace_core::{DatasetSource, Dimension, RawLocationMetrics, ScoreResult, WeightProfile};
use trueplace_scorer::{ScoreError, ScoringEngine};

use crate::{
    Clock, QueryParams, RankingError, RankingQuery, ResultCache, SortDirection, SortKey,
    SystemClock, build_cache_key,
};

/// Whether a request may be answered from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheMode {
    /// Serve a live entry when one exists.
    #[default]
    Use,
    /// Always recompute; the fresh list still replaces the cached one.
    Bypass,
}

/// A scored location with the incident total for the requested bias types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedLocation {
    /// Score for the location.
    #[serde(flatten)]
    pub score: ScoreResult,
    /// Incidents across the requested bias types; absent when none were
    /// requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias_incidents: Option<u64>,
}

/// How a request interacted with the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    /// Whether the ranked list came from the cache.
    pub hit: bool,
    /// Key the list is stored under.
    pub key: String,
    /// Time-to-live of cache entries.
    #[serde(rename = "ttlMs", serialize_with = "serialize_millis")]
    pub ttl: Duration,
}

/// One page of a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingPage {
    /// Locations on this page, in rank order.
    pub results: Vec<RankedLocation>,
    /// Number of locations across all pages.
    pub total: usize,
    /// Page size applied.
    pub limit: usize,
    /// Locations skipped before this page.
    pub offset: usize,
    /// Cache outcome.
    pub cache: CacheStatus,
}

fn serialize_millis<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX))
}

/// Shared, immutable ranked list as stored in the cache.
pub type RankedList = Arc<[RankedLocation]>;

/// Ranks the locations of one dataset with one engine.
///
/// The service is `Send + Sync` when its source and clock are, so a single
/// instance can answer concurrent requests.
///
/// # Examples
/// ```
/// use trueplace_core::{MemoryDataset, RawLocationMetrics, WeightProfile};
/// use trueplace_ranking::{CacheMode, RankingQuery, RankingService, ResultCache};
/// use trueplace_scorer::ScoringEngine;
///
/// # fn main() -> Result<(), trueplace_ranking::RankingError> {
/// let dataset = MemoryDataset::new(vec![
///     RawLocationMetrics::new("Portland", "OR").with_diversity_index(0.62),
///     RawLocationMetrics::new("Boise", "ID").with_diversity_index(0.31),
/// ]);
/// let service = RankingService::new(ScoringEngine::standard(), dataset, ResultCache::default());
/// let profile = WeightProfile::new();
/// let query = RankingQuery::default();
///
/// let first = service.rank(&profile, &query, CacheMode::Use)?;
/// assert_eq!(first.total, 2);
/// assert_eq!(first.results[0].score.name, "Portland");
/// assert!(!first.cache.hit);
///
/// let second = service.rank(&profile, &query, CacheMode::Use)?;
/// assert!(second.cache.hit);
/// assert_eq!(second.results, first.results);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RankingService<S, C = SystemClock> {
    engine: ScoringEngine,
    source: S,
    cache: ResultCache<RankedList, C>,
}

impl<S: DatasetSource, C: Clock> RankingService<S, C> {
    /// Combine an engine, a dataset and a cache.
    #[must_use]
    pub const fn new(
        engine: ScoringEngine,
        source: S,
        cache: ResultCache<RankedList, C>,
    ) -> Self {
        Self {
            engine,
            source,
            cache,
        }
    }

    /// Engine used for scoring.
    #[must_use]
    pub const fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Dataset being ranked.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Cache holding ranked lists.
    #[must_use]
    pub const fn cache(&self) -> &ResultCache<RankedList, C> {
        &self.cache
    }

    /// Rank the dataset for `profile` and return the page `query` asks for.
    ///
    /// # Errors
    /// Returns [`RankingError::Dataset`] when the dataset cannot be read,
    /// [`RankingError::Configuration`] when `profile` cannot produce a
    /// composite, and [`RankingError::CacheKey`] if the key cannot be
    /// serialised.
    pub fn rank(
        &self,
        profile: &WeightProfile,
        query: &RankingQuery,
        mode: CacheMode,
    ) -> Result<RankingPage, RankingError> {
        let normalised = query.clone().normalised();
        let key = self.cache_key(profile, &normalised)?;

        let cached = match mode {
            CacheMode::Use => self.cache.get(&key),
            CacheMode::Bypass => None,
        };
        if let Some(list) = cached {
            debug!("Ranking cache hit for {key}");
            return Ok(self.page(&list, &normalised, key, true));
        }
        match mode {
            CacheMode::Use => debug!("Ranking cache miss for {key}"),
            CacheMode::Bypass => debug!("Bypassing ranking cache for {key}"),
        }
        let list: RankedList = self.compute(profile, &normalised)?.into();
        self.cache.insert(key.clone(), Arc::clone(&list));
        Ok(self.page(&list, &normalised, key, false))
    }

    /// Rank from raw request parameters.
    ///
    /// Besides the [`RankingQuery::from_params`] names, `valuesDiversity=true`
    /// selects the diversity-emphasis profile and `nocache=true` bypasses
    /// the cache.
    ///
    /// # Errors
    /// Returns [`RankingError::Query`] for malformed parameters and
    /// otherwise the errors of [`RankingService::rank`].
    pub fn rank_params(&self, params: &QueryParams) -> Result<RankingPage, RankingError> {
        let query = RankingQuery::from_params(params)?;
        let profile = WeightProfile::with_diversity_emphasis(flag(params, "valuesDiversity"));
        let mode = if flag(params, "nocache") {
            CacheMode::Bypass
        } else {
            CacheMode::Use
        };
        self.rank(&profile, &query, mode)
    }

    fn page(
        &self,
        ranked: &[RankedLocation],
        query: &RankingQuery,
        key: String,
        hit: bool,
    ) -> RankingPage {
        RankingPage {
            results: ranked
                .iter()
                .skip(query.offset)
                .take(query.limit)
                .cloned()
                .collect(),
            total: ranked.len(),
            limit: query.limit,
            offset: query.offset,
            cache: CacheStatus {
                hit,
                key,
                ttl: self.cache.ttl(),
            },
        }
    }

    fn cache_key(
        &self,
        profile: &WeightProfile,
        query: &RankingQuery,
    ) -> Result<String, RankingError> {
        let fingerprint = self.source.fingerprint()?;
        let mut params = query.cache_params();
        params.set("calibration", self.engine.calibration_version());
        for dimension in self.engine.dimensions() {
            params.push("dimensions", dimension.as_str());
        }
        Ok(build_cache_key(&fingerprint, profile, &params)?)
    }

    fn compute(
        &self,
        profile: &WeightProfile,
        query: &RankingQuery,
    ) -> Result<Vec<RankedLocation>, RankingError> {
        self.engine.check_profile(profile)?;
        let records = self.source.locations()?;
        let mut ranked = Vec::with_capacity(records.len());
        for metrics in records.iter().filter(|metrics| matches_place(metrics, query)) {
            let bias_incidents = metrics.bias_incidents_for(&query.bias_types);
            if !query.bias_types.is_empty() && bias_incidents.is_none() {
                continue;
            }
            let score = match self.engine.score(metrics, profile) {
                Ok(score) => score,
                Err(ScoreError::MalformedMetrics { name, source }) => {
                    warn!("Skipping malformed location '{name}': {source}");
                    continue;
                }
                Err(ScoreError::Configuration(err)) => return Err(err.into()),
            };
            if meets(&score, Dimension::Safety, query.min_safety)
                && meets(&score, Dimension::Community, query.min_community)
            {
                ranked.push(RankedLocation {
                    score,
                    bias_incidents,
                });
            }
        }
        ranked.sort_by(|a, b| compare(a, b, query.sort_by, query.sort_dir));
        Ok(ranked)
    }
}

fn flag(params: &QueryParams, key: &str) -> bool {
    params
        .first(key)
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

fn matches_place(metrics: &RawLocationMetrics, query: &RankingQuery) -> bool {
    let state_ok = query
        .state
        .as_deref()
        .is_none_or(|state| metrics.region.trim().to_uppercase() == state);
    let text_ok = query.text.as_deref().is_none_or(|text| {
        format!("{}, {}", metrics.name, metrics.region)
            .to_lowercase()
            .contains(text)
    });
    state_ok && text_ok
}

fn meets(score: &ScoreResult, dimension: Dimension, minimum: Option<f64>) -> bool {
    minimum.is_none_or(|min| f64::from(score.dimension(dimension)) >= min)
}

fn sort_value(location: &RankedLocation, key: SortKey) -> u8 {
    match key {
        SortKey::Score => location.score.composite,
        SortKey::Safety => location.score.dimension(Dimension::Safety),
        SortKey::Community => location.score.dimension(Dimension::Community),
    }
}

fn compare(
    a: &RankedLocation,
    b: &RankedLocation,
    key: SortKey,
    direction: SortDirection,
) -> Ordering {
    let ascending = sort_value(a, key).cmp(&sort_value(b, key));
    match direction {
        SortDirection::Asc => ascending,
        SortDirection::Desc => ascending.reverse(),
    }
}
