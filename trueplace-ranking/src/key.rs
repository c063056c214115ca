//! Cache keys for ranked result lists.
//!
//! A key is the dataset fingerprint followed by a canonical JSON rendering
//! of the weight profile and the query parameters. Parameter maps are
//! ordered and multi-valued parameters are sorted and deduplicated, so two
//! requests that differ only in parameter order share a key.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use trueplace_core::{DatasetFingerprint, WeightProfile};

/// Ordered multimap of query parameters.
///
/// A parameter seen once serialises as a string and a repeated parameter
/// as a list.
///
/// # Examples
/// ```
/// use trueplace_ranking::QueryParams;
///
/// let params: QueryParams = [("biasType", "race"), ("sortBy", "safety"), ("biasType", "religion")]
///     .into_iter()
///     .collect();
/// assert_eq!(params.first("sortBy"), Some("safety"));
/// assert_eq!(params.all("biasType"), ["race", "religion"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams(BTreeMap<String, Vec<String>>);

impl QueryParams {
    /// Create an empty parameter map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Append a value; repeating a key collects its values.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Replace every value recorded for `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), vec![value.into()]);
    }

    /// First value recorded for `key`.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.all(key).first().map(String::as_str)
    }

    /// Every value recorded for `key`, in insertion order.
    #[must_use]
    pub fn all(&self, key: &str) -> &[String] {
        self.0.get(key).map_or(&[], Vec::as_slice)
    }

    /// Whether no parameters are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy with every value list sorted and deduplicated.
    #[must_use]
    pub fn canonical(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(key, values)| {
                    let mut sorted = values.clone();
                    sorted.sort_unstable();
                    sorted.dedup();
                    (key.clone(), sorted)
                })
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.push(key, value);
        }
        params
    }
}

impl Serialize for QueryParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, values) in &self.0 {
            match values.as_slice() {
                [single] => map.serialize_entry(key, single)?,
                _ => map.serialize_entry(key, values)?,
            }
        }
        map.end()
    }
}

#[derive(serde::Serialize)]
struct KeyMaterial<'a> {
    profile: &'a WeightProfile,
    params: &'a QueryParams,
}

/// Derive the cache key for a ranking request.
///
/// The key is `"{fingerprint}:{json}"`, where the JSON holds the profile and
/// the canonical form of `params`. Pagination parameters should be left out
/// of `params` so every page of one ranking shares an entry.
///
/// # Errors
/// Returns the encoder error if the key material cannot be serialised.
///
/// # Examples
/// ```
/// use trueplace_core::{DatasetFingerprint, DatasetSummary, WeightProfile};
/// use trueplace_ranking::{QueryParams, build_cache_key};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fingerprint = DatasetFingerprint::of(&DatasetSummary::default())?;
/// let profile = WeightProfile::new();
/// let a: QueryParams = [("biasType", "race"), ("biasType", "religion")].into_iter().collect();
/// let b: QueryParams = [("biasType", "religion"), ("biasType", "race")].into_iter().collect();
/// let key = build_cache_key(&fingerprint, &profile, &a)?;
/// assert!(key.starts_with(fingerprint.as_str()));
/// assert_eq!(key, build_cache_key(&fingerprint, &profile, &b)?);
/// # Ok(())
/// # }
/// ```
pub fn build_cache_key(
    fingerprint: &DatasetFingerprint,
    profile: &WeightProfile,
    params: &QueryParams,
) -> Result<String, serde_json::Error> {
    let canonical = params.canonical();
    let material = serde_json::to_string(&KeyMaterial {
        profile,
        params: &canonical,
    })?;
    Ok(format!("{fingerprint}:{material}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use trueplace_core::{DatasetSummary, Dimension};

    #[fixture]
    fn fingerprint() -> DatasetFingerprint {
        DatasetFingerprint::of(&DatasetSummary::default().with_count("locations", 3))
            .expect("fingerprint")
    }

    fn key(
        fingerprint: &DatasetFingerprint,
        profile: &WeightProfile,
        pairs: &[(&str, &str)],
    ) -> String {
        let params: QueryParams = pairs.iter().copied().collect();
        build_cache_key(fingerprint, profile, &params).expect("cache key")
    }

    #[rstest]
    fn key_starts_with_the_fingerprint(fingerprint: DatasetFingerprint) {
        let built = key(&fingerprint, &WeightProfile::new(), &[("sortBy", "score")]);
        assert!(built.starts_with(&format!("{fingerprint}:{{")), "key was {built}");
    }

    #[rstest]
    fn parameter_order_does_not_matter(fingerprint: DatasetFingerprint) {
        let profile = WeightProfile::new();
        assert_eq!(
            key(&fingerprint, &profile, &[("sortBy", "safety"), ("state", "OR")]),
            key(&fingerprint, &profile, &[("state", "OR"), ("sortBy", "safety")]),
        );
    }

    #[rstest]
    fn repeated_values_are_deduplicated(fingerprint: DatasetFingerprint) {
        let profile = WeightProfile::new();
        assert_eq!(
            key(
                &fingerprint,
                &profile,
                &[("biasType", "race"), ("biasType", "race"), ("biasType", "age")],
            ),
            key(&fingerprint, &profile, &[("biasType", "age"), ("biasType", "race")]),
        );
    }

    #[rstest]
    fn distinct_inputs_give_distinct_keys(fingerprint: DatasetFingerprint) {
        let base = WeightProfile::new();
        let reference = key(&fingerprint, &base, &[("sortBy", "score")]);
        let variants = [
            key(&fingerprint, &base, &[("sortBy", "safety")]),
            key(&fingerprint, &base, &[("sortBy", "score"), ("state", "OR")]),
            key(&fingerprint, &base.with_budget_max(1500.0), &[("sortBy", "score")]),
            key(
                &fingerprint,
                &base.with_weight(Dimension::Safety, 0.9),
                &[("sortBy", "score")],
            ),
            key(
                &fingerprint,
                &WeightProfile::with_diversity_emphasis(true),
                &[("sortBy", "score")],
            ),
        ];
        for variant in variants {
            assert_ne!(variant, reference);
        }
    }

    #[rstest]
    fn a_changed_dataset_changes_the_key(fingerprint: DatasetFingerprint) {
        let other = DatasetFingerprint::of(&DatasetSummary::default().with_count("locations", 4))
            .expect("fingerprint");
        let profile = WeightProfile::new();
        assert_ne!(key(&fingerprint, &profile, &[]), key(&other, &profile, &[]));
    }

    #[rstest]
    fn single_values_serialise_as_strings() {
        let params: QueryParams = [("q", "port"), ("biasType", "race"), ("biasType", "age")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&params).expect("serialise params");
        assert_eq!(json, r#"{"biasType":["race","age"],"q":"port"}"#);
    }
}
