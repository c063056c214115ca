//! Scoring output: composite, per-dimension breakdown, rationale and
//! provenance.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::Dimension;

/// Provenance of one metric category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Citation {
    /// Metric category described.
    pub metric: &'static str,
    /// Publishing body or dataset.
    pub source: &'static str,
    /// Canonical landing page.
    pub url: &'static str,
}

/// Per-dimension quality in `0..=100`, before weighting.
///
/// # Examples
/// ```
/// use trueplace_core::{Dimension, DimensionScores};
///
/// let mut dims = DimensionScores::default();
/// dims.insert(Dimension::Safety, 82);
/// assert_eq!(dims.get(Dimension::Safety), Some(82));
/// assert_eq!(dims.get(Dimension::Community), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DimensionScores {
    scores: BTreeMap<Dimension, u8>,
}

impl DimensionScores {
    /// Record the score for a dimension.
    pub fn insert(&mut self, dimension: Dimension, score: u8) {
        self.scores.insert(dimension, score.min(100));
    }

    /// Return the score for a dimension, if it was scored.
    #[must_use]
    pub fn get(&self, dimension: Dimension) -> Option<u8> {
        self.scores.get(&dimension).copied()
    }

    /// Iterate over scored dimensions in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, u8)> + '_ {
        self.scores.iter().map(|(dimension, score)| (*dimension, *score))
    }

    /// Number of scored dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Report whether no dimension was scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// The explainable score for one location under one weight profile.
///
/// `composite` is the weighted blend; `dims` holds each dimension's raw
/// quality and is never re-weighted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ScoreResult {
    /// Name of the scored location.
    pub name: String,
    /// Region of the scored location.
    pub region: String,
    /// Weighted composite in `0..=100`.
    pub composite: u8,
    /// Unweighted per-dimension scores in `0..=100`.
    pub dims: DimensionScores,
    /// Up to three short explanation bullets.
    pub rationale: Vec<String>,
    /// Provenance of the input metric categories.
    pub citations: Vec<Citation>,
}

impl ScoreResult {
    /// Score for one dimension, or `0` when the dimension was not scored.
    #[must_use]
    pub fn dimension(&self, dimension: Dimension) -> u8 {
        self.dims.get(dimension).unwrap_or(0)
    }
}
