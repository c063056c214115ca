//! Weight profiles: a user's relative priorities across dimensions.
//!
//! Weights are non-negative and need not sum to one; the composite scorer
//! divides each by the total of the weights it actually uses. Profiles start
//! from one of two presets, chosen by the diversity-emphasis flag, and
//! explicit weights override the preset.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ConfigurationError, Dimension};

/// Per-dimension weights.
///
/// The three scored dimensions are always present; the remaining ones are
/// optional and only matter when the engine carries a scorer for them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DimensionWeights {
    /// Weight of the safety dimension.
    pub safety: f64,
    /// Weight of the community dimension.
    pub community: f64,
    /// Weight of the cost and quality dimension.
    pub cost_quality: f64,
    /// Weight of the climate dimension, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub climate: Option<f64>,
    /// Weight of the politics dimension, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub politics: Option<f64>,
    /// Weight of the legacy mobility dimension, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mobility: Option<f64>,
    /// Weight of the legacy inclusion dimension, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inclusion: Option<f64>,
}

impl DimensionWeights {
    /// Preset used when the user has not asked to emphasise diversity.
    pub const BALANCED: Self = Self::preset(0.40, 0.45, 0.15);
    /// Preset used when the user values diversity.
    pub const DIVERSITY_EMPHASIS: Self = Self::preset(0.25, 0.60, 0.15);

    const fn preset(safety: f64, community: f64, cost_quality: f64) -> Self {
        Self {
            safety,
            community,
            cost_quality,
            climate: None,
            politics: None,
            mobility: None,
            inclusion: None,
        }
    }

    /// Build weights for the three scored dimensions only.
    #[must_use]
    pub const fn new(safety: f64, community: f64, cost_quality: f64) -> Self {
        Self::preset(safety, community, cost_quality)
    }

    /// Return the weight for a dimension; absent optional weights are zero.
    #[must_use]
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Safety => self.safety,
            Dimension::Community => self.community,
            Dimension::CostQuality => self.cost_quality,
            Dimension::Climate => self.climate.unwrap_or(0.0),
            Dimension::Politics => self.politics.unwrap_or(0.0),
            Dimension::Mobility => self.mobility.unwrap_or(0.0),
            Dimension::Inclusion => self.inclusion.unwrap_or(0.0),
        }
    }

    /// Insert or update a dimension weight.
    pub const fn set(&mut self, dimension: Dimension, weight: f64) {
        match dimension {
            Dimension::Safety => self.safety = weight,
            Dimension::Community => self.community = weight,
            Dimension::CostQuality => self.cost_quality = weight,
            Dimension::Climate => self.climate = Some(weight),
            Dimension::Politics => self.politics = Some(weight),
            Dimension::Mobility => self.mobility = Some(weight),
            Dimension::Inclusion => self.inclusion = Some(weight),
        }
    }
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// A user's relative priorities plus optional budget ceiling.
///
/// # Examples
/// ```
/// use trueplace_core::{Dimension, WeightProfile};
///
/// let profile = WeightProfile::new()
///     .with_weight(Dimension::Safety, 2.0)
///     .with_budget_max(1500.0);
/// assert_eq!(profile.weight(Dimension::Safety), 2.0);
/// assert_eq!(profile.weight(Dimension::Community), 0.45);
/// assert!(profile.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WeightProfile {
    weights: DimensionWeights,
    #[cfg_attr(feature = "serde", serde(default))]
    budget_max: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    diversity_emphasis: bool,
}

impl WeightProfile {
    /// Construct a profile from the balanced preset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a profile from the preset matching `diversity_emphasis`.
    ///
    /// # Examples
    /// ```
    /// use trueplace_core::{Dimension, WeightProfile};
    ///
    /// let profile = WeightProfile::with_diversity_emphasis(true);
    /// assert_eq!(profile.weight(Dimension::Community), 0.60);
    /// ```
    #[must_use]
    pub const fn with_diversity_emphasis(diversity_emphasis: bool) -> Self {
        let weights = if diversity_emphasis {
            DimensionWeights::DIVERSITY_EMPHASIS
        } else {
            DimensionWeights::BALANCED
        };
        Self {
            weights,
            budget_max: None,
            diversity_emphasis,
        }
    }

    /// Construct a profile from explicit weights.
    #[must_use]
    pub const fn from_weights(weights: DimensionWeights) -> Self {
        Self {
            weights,
            budget_max: None,
            diversity_emphasis: false,
        }
    }

    /// Return the weight for a dimension.
    #[must_use]
    pub fn weight(&self, dimension: Dimension) -> f64 {
        self.weights.get(dimension)
    }

    /// Borrow the full weight table.
    #[must_use]
    pub const fn weights(&self) -> &DimensionWeights {
        &self.weights
    }

    /// Monthly budget ceiling, if set.
    #[must_use]
    pub const fn budget_max(&self) -> Option<f64> {
        self.budget_max
    }

    /// Whether the profile asked to emphasise diversity.
    #[must_use]
    pub const fn diversity_emphasis(&self) -> bool {
        self.diversity_emphasis
    }

    /// Insert or update a dimension weight.
    pub const fn set_weight(&mut self, dimension: Dimension, weight: f64) {
        self.weights.set(dimension, weight);
    }

    /// Add a dimension weight while returning `self` for chaining.
    #[must_use]
    pub const fn with_weight(mut self, dimension: Dimension, weight: f64) -> Self {
        self.set_weight(dimension, weight);
        self
    }

    /// Set the budget ceiling while returning `self` for chaining.
    #[must_use]
    pub const fn with_budget_max(mut self, budget_max: f64) -> Self {
        self.budget_max = Some(budget_max);
        self
    }

    /// Validate weights and budget and return a copy.
    ///
    /// This does not check the weight total; the total depends on which
    /// dimensions an engine scores and is checked there.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidWeight`] for a negative or
    /// non-finite weight, and [`ConfigurationError::InvalidBudget`] when the
    /// budget is non-finite or not positive.
    pub fn validate(self) -> Result<Self, ConfigurationError> {
        for dimension in Dimension::ALL {
            let weight = self.weight(dimension);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigurationError::InvalidWeight { dimension, weight });
            }
        }
        if let Some(budget) = self.budget_max
            && (!budget.is_finite() || budget <= 0.0)
        {
            return Err(ConfigurationError::InvalidBudget { budget });
        }
        Ok(self)
    }
}
