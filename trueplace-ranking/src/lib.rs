//! Cached, filtered and paginated rankings of scored locations.
//!
//! [`RankingService`] ties a [`DatasetSource`](trueplace_core::DatasetSource),
//! a [`ScoringEngine`](trueplace_scorer::ScoringEngine) and a
//! [`ResultCache`] together. Each request is keyed by the dataset
//! fingerprint, the weight profile and the filter and sort options, so an
//! unchanged dataset answers repeated requests from memory until the entry's
//! time-to-live runs out. Time comes from an injected [`Clock`].

#![forbid(unsafe_code)]

mod cache;
mod clock;
mod error;
mod key;
mod query;
mod service;

pub use cache::{DEFAULT_TTL, ResultCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::RankingError;
pub use key::{QueryParams, build_cache_key};
pub use query::{DEFAULT_LIMIT, MAX_LIMIT, QueryError, RankingQuery, SortDirection, SortKey};
pub use service::{
    CacheMode, CacheStatus, RankedList, RankedLocation, RankingPage, RankingService,
};
