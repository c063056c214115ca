//! Dimensions describing the axes a location is evaluated on.
//!
//! The enum is the tag of the scoring model: every dimension scorer, weight
//! and per-dimension output is keyed by one of these variants.
//!
//! # Examples
//! ```
//! use trueplace_core::Dimension;
//!
//! assert_eq!(Dimension::CostQuality.as_str(), "costQuality");
//! assert_eq!(Dimension::Safety.to_string(), "safety");
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named axis of evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Dimension {
    /// Crime and hate-crime exposure.
    Safety,
    /// Community make-up, currently driven by the diversity index.
    Community,
    /// Housing affordability blended with health quality.
    CostQuality,
    /// Climate suitability. Carried in profiles; no shipped scorer.
    Climate,
    /// Political alignment. Carried in profiles; no shipped scorer.
    Politics,
    /// Legacy binary mobility flag.
    Mobility,
    /// Legacy binary inclusion flag.
    Inclusion,
}

impl Dimension {
    /// Every dimension in canonical order.
    pub const ALL: [Self; 7] = [
        Self::Safety,
        Self::Community,
        Self::CostQuality,
        Self::Climate,
        Self::Politics,
        Self::Mobility,
        Self::Inclusion,
    ];

    /// Return the dimension's wire name.
    ///
    /// # Examples
    /// ```
    /// use trueplace_core::Dimension;
    ///
    /// assert_eq!(Dimension::Community.as_str(), "community");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safety => "safety",
            Self::Community => "community",
            Self::CostQuality => "costQuality",
            Self::Climate => "climate",
            Self::Politics => "politics",
            Self::Mobility => "mobility",
            Self::Inclusion => "inclusion",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match folded.as_str() {
            "safety" => Ok(Self::Safety),
            "community" => Ok(Self::Community),
            "costquality" => Ok(Self::CostQuality),
            "climate" => Ok(Self::Climate),
            "politics" => Ok(Self::Politics),
            "mobility" => Ok(Self::Mobility),
            "inclusion" => Ok(Self::Inclusion),
            _ => Err(format!("unknown dimension '{s}'")),
        }
    }
}
