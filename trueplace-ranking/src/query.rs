//! Filter, sort and pagination options for a ranking request.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::QueryParams;

/// Largest page size a request may ask for.
pub const MAX_LIMIT: usize = 100;
/// Page size used when a request does not name one.
pub const DEFAULT_LIMIT: usize = 50;

/// Errors raised while reading query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A numeric parameter did not parse as a finite number.
    #[error("parameter '{param}' expects a number, got '{value}'")]
    InvalidNumber {
        /// Parameter name.
        param: &'static str,
        /// Raw value supplied.
        value: String,
    },
    /// `sortBy` named an unknown key.
    #[error("unknown sort key '{0}'; expected score, safety or community")]
    UnknownSortKey(String),
    /// `sortDir` named an unknown direction.
    #[error("unknown sort direction '{0}'; expected asc or desc")]
    UnknownSortDirection(String),
}

/// Score the ranking is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// The composite score.
    #[default]
    Score,
    /// The safety dimension.
    Safety,
    /// The community dimension.
    Community,
}

impl SortKey {
    /// Wire name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Safety => "safety",
            Self::Community => "community",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score" => Ok(Self::Score),
            "safety" => Ok(Self::Safety),
            "community" => Ok(Self::Community),
            _ => Err(QueryError::UnknownSortKey(s.to_owned())),
        }
    }
}

/// Ordering applied to the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Lowest first.
    Asc,
    /// Highest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// Wire name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(QueryError::UnknownSortDirection(s.to_owned())),
        }
    }
}

/// How to filter, order and page a ranking.
///
/// Text filters are stored normalised: `state` upper-cased, `text`
/// lower-cased, both trimmed, and blank values dropped. Bias types are
/// sorted and deduplicated.
///
/// # Examples
/// ```
/// use trueplace_ranking::{QueryParams, RankingQuery, SortKey};
///
/// # fn main() -> Result<(), trueplace_ranking::QueryError> {
/// let params: QueryParams = [("sortBy", "safety"), ("state", " or "), ("limit", "500")]
///     .into_iter()
///     .collect();
/// let query = RankingQuery::from_params(&params)?;
/// assert_eq!(query.sort_by, SortKey::Safety);
/// assert_eq!(query.state.as_deref(), Some("OR"));
/// assert_eq!(query.limit, 100);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RankingQuery {
    /// Minimum safety score a location must reach.
    pub min_safety: Option<f64>,
    /// Minimum community score a location must reach.
    pub min_community: Option<f64>,
    /// Score to order by.
    pub sort_by: SortKey,
    /// Ordering direction.
    pub sort_dir: SortDirection,
    /// Bias categories; when non-empty only locations with data for them
    /// are kept.
    pub bias_types: Vec<String>,
    /// Upper-case region code to match exactly.
    pub state: Option<String>,
    /// Lower-case substring matched against `"{name}, {region}"`.
    pub text: Option<String>,
    /// Page size, within `1..=MAX_LIMIT`.
    pub limit: usize,
    /// Results skipped before the page starts.
    pub offset: usize,
}

impl Default for RankingQuery {
    fn default() -> Self {
        Self {
            min_safety: None,
            min_community: None,
            sort_by: SortKey::default(),
            sort_dir: SortDirection::default(),
            bias_types: Vec::new(),
            state: None,
            text: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl RankingQuery {
    /// Read a query from request parameters.
    ///
    /// Recognised names are `minSafety`, `minCommunity`, `sortBy`,
    /// `sortDir`, `biasType` (repeatable), `state`, `q`, `limit` and
    /// `offset`; anything else is ignored. Blank values count as absent.
    /// `limit` is clamped to `1..=MAX_LIMIT` and a negative `offset` to 0.
    ///
    /// # Errors
    /// Returns [`QueryError`] for a non-numeric threshold or page value and
    /// for an unknown sort key or direction.
    pub fn from_params(params: &QueryParams) -> Result<Self, QueryError> {
        let present = |key: &str| params.first(key).map(str::trim).filter(|v| !v.is_empty());

        let limit = present("limit")
            .map(|raw| parse_integer("limit", raw))
            .transpose()?
            .map_or(DEFAULT_LIMIT, clamp_limit);
        let offset = present("offset")
            .map(|raw| parse_integer("offset", raw))
            .transpose()?
            .map_or(0, |value| usize::try_from(value.max(0)).unwrap_or(usize::MAX));

        Ok(Self {
            min_safety: present("minSafety")
                .map(|raw| parse_threshold("minSafety", raw))
                .transpose()?,
            min_community: present("minCommunity")
                .map(|raw| parse_threshold("minCommunity", raw))
                .transpose()?,
            sort_by: present("sortBy")
                .map(str::parse::<SortKey>)
                .transpose()?
                .unwrap_or_default(),
            sort_dir: present("sortDir")
                .map(str::parse::<SortDirection>)
                .transpose()?
                .unwrap_or_default(),
            bias_types: params.all("biasType").to_vec(),
            state: present("state").map(str::to_owned),
            text: present("q").map(str::to_owned),
            limit,
            offset,
        }
        .normalised())
    }

    /// Normalise text filters and bias types in place of the raw values.
    #[must_use]
    pub fn normalised(mut self) -> Self {
        self.state = normalise_text(self.state.as_deref(), str::to_uppercase);
        self.text = normalise_text(self.text.as_deref(), str::to_lowercase);
        let mut bias_types: Vec<String> = self
            .bias_types
            .iter()
            .map(|bias| bias.trim().to_owned())
            .filter(|bias| !bias.is_empty())
            .collect();
        bias_types.sort_unstable();
        bias_types.dedup();
        self.bias_types = bias_types;
        self.limit = self.limit.clamp(1, MAX_LIMIT);
        self
    }

    /// Parameters that decide which results appear and in what order.
    ///
    /// Pagination is left out so every page of one ranking shares a cache
    /// entry. Absent options are omitted.
    #[must_use]
    pub fn cache_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(min) = self.min_safety {
            params.set("minSafety", min.to_string());
        }
        if let Some(min) = self.min_community {
            params.set("minCommunity", min.to_string());
        }
        params.set("sortBy", self.sort_by.as_str());
        params.set("sortDir", self.sort_dir.as_str());
        for bias in &self.bias_types {
            params.push("biasType", bias.as_str());
        }
        if let Some(state) = &self.state {
            params.set("state", state.as_str());
        }
        if let Some(text) = &self.text {
            params.set("q", text.as_str());
        }
        params
    }
}

fn normalise_text(value: Option<&str>, case: fn(&str) -> String) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(case)
}

fn parse_threshold(param: &'static str, raw: &str) -> Result<f64, QueryError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| QueryError::InvalidNumber {
            param,
            value: raw.to_owned(),
        })
}

fn parse_integer(param: &'static str, raw: &str) -> Result<i64, QueryError> {
    raw.parse::<i64>().map_err(|_| QueryError::InvalidNumber {
        param,
        value: raw.to_owned(),
    })
}

fn clamp_limit(requested: i64) -> usize {
    usize::try_from(requested.max(1))
        .unwrap_or(MAX_LIMIT)
        .min(MAX_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(pairs: &[(&str, &str)]) -> Result<RankingQuery, QueryError> {
        let params: QueryParams = pairs.iter().copied().collect();
        RankingQuery::from_params(&params)
    }

    #[rstest]
    fn empty_parameters_use_defaults() {
        let query = parse(&[]).expect("defaults");
        assert_eq!(query, RankingQuery::default());
        assert_eq!(query.limit, 50);
        assert_eq!(query.sort_by, SortKey::Score);
        assert_eq!(query.sort_dir, SortDirection::Desc);
    }

    #[rstest]
    #[case("0", 1)]
    #[case("-4", 1)]
    #[case("25", 25)]
    #[case("101", 100)]
    #[case("99999999999", 100)]
    fn limit_is_clamped(#[case] raw: &str, #[case] expected: usize) {
        assert_eq!(parse(&[("limit", raw)]).expect("query").limit, expected);
    }

    #[rstest]
    #[case("-10", 0)]
    #[case("20", 20)]
    fn offset_is_never_negative(#[case] raw: &str, #[case] expected: usize) {
        assert_eq!(parse(&[("offset", raw)]).expect("query").offset, expected);
    }

    #[rstest]
    #[case(&[("sortBy", "price")], QueryError::UnknownSortKey("price".to_owned()))]
    #[case(&[("sortDir", "up")], QueryError::UnknownSortDirection("up".to_owned()))]
    #[case(
        &[("minSafety", "high")],
        QueryError::InvalidNumber { param: "minSafety", value: "high".to_owned() }
    )]
    #[case(
        &[("minCommunity", "NaN")],
        QueryError::InvalidNumber { param: "minCommunity", value: "NaN".to_owned() }
    )]
    #[case(
        &[("limit", "ten")],
        QueryError::InvalidNumber { param: "limit", value: "ten".to_owned() }
    )]
    fn malformed_parameters_are_rejected(
        #[case] pairs: &[(&str, &str)],
        #[case] expected: QueryError,
    ) {
        assert_eq!(parse(pairs), Err(expected));
    }

    #[rstest]
    fn blank_values_count_as_absent() {
        let query = parse(&[("minSafety", " "), ("state", ""), ("q", "  "), ("sortBy", "")])
            .expect("query");
        assert_eq!(query, RankingQuery::default());
    }

    #[rstest]
    fn text_filters_are_normalised() {
        let query = parse(&[
            ("state", " wa "),
            ("q", " Port "),
            ("biasType", "religion"),
            ("biasType", " race"),
            ("biasType", "religion"),
        ])
        .expect("query");
        assert_eq!(query.state.as_deref(), Some("WA"));
        assert_eq!(query.text.as_deref(), Some("port"));
        assert_eq!(query.bias_types, ["race", "religion"]);
    }

    #[rstest]
    fn sort_names_are_case_insensitive() {
        let query = parse(&[("sortBy", "Community"), ("sortDir", "ASC")]).expect("query");
        assert_eq!(query.sort_by, SortKey::Community);
        assert_eq!(query.sort_dir, SortDirection::Asc);
    }

    #[rstest]
    fn cache_params_ignore_pagination() {
        let first = parse(&[("state", "or"), ("limit", "10"), ("offset", "0")]).expect("query");
        let second = parse(&[("state", "OR"), ("limit", "20"), ("offset", "40")]).expect("query");
        assert_eq!(first.cache_params(), second.cache_params());
        assert_eq!(first.cache_params().first("limit"), None);
    }

    #[rstest]
    fn cache_params_name_every_active_filter() {
        let query = parse(&[("minSafety", "40"), ("biasType", "race"), ("q", "austin")])
            .expect("query");
        let params = query.cache_params();
        assert_eq!(params.first("minSafety"), Some("40"));
        assert_eq!(params.all("biasType"), ["race"]);
        assert_eq!(params.first("q"), Some("austin"));
        assert_eq!(params.first("sortBy"), Some("score"));
        assert_eq!(params.first("sortDir"), Some("desc"));
        assert_eq!(params.first("minCommunity"), None);
    }
}
