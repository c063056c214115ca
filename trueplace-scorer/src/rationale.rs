//! Short explanation bullets accompanying a score.

use trueplace_core::{Dimension, RawLocationMetrics, WeightProfile};

/// Safety above this threshold earns a positive bullet.
pub const SAFE_THRESHOLD: f64 = 0.7;
/// Safety below this threshold earns a cautionary bullet.
pub const UNSAFE_THRESHOLD: f64 = 0.3;
/// Community above this threshold earns a diversity bullet.
pub const DIVERSE_THRESHOLD: f64 = 0.6;
/// Upper bound on the number of bullets returned.
pub const MAX_BULLETS: usize = 3;

const SAFE_BULLET: &str = "Low crime rates create a safe community environment";
const UNSAFE_BULLET: &str = "Higher than average crime rates may be a safety concern";
const DIVERSE_BULLET: &str = "Diverse community with representation from many backgrounds";

/// Build up to [`MAX_BULLETS`] bullets in fixed order: safety, community,
/// then cost.
///
/// `dimension_score` returns the unweighted `0.0..=1.0` score for a
/// dimension, or `None` when it was not scored. The cost bullet appears only
/// when the profile sets a budget and the record reports a housing cost.
///
/// # Examples
/// ```
/// use trueplace_core::{Dimension, RawLocationMetrics, WeightProfile};
/// use trueplace_scorer::rationale;
///
/// let metrics = RawLocationMetrics::new("Tacoma", "WA").with_housing_cost(3000.0);
/// let profile = WeightProfile::new().with_budget_max(1500.0);
/// let bullets = rationale(&metrics, &profile, |dimension| match dimension {
///     Dimension::Safety => Some(0.9),
///     _ => Some(0.1),
/// });
/// assert_eq!(
///     bullets,
///     [
///         "Low crime rates create a safe community environment",
///         "Housing costs ($3,000) exceed your stated budget",
///     ]
/// );
/// ```
#[must_use]
pub fn rationale(
    metrics: &RawLocationMetrics,
    profile: &WeightProfile,
    dimension_score: impl Fn(Dimension) -> Option<f64>,
) -> Vec<String> {
    let mut bullets = Vec::with_capacity(MAX_BULLETS);

    match dimension_score(Dimension::Safety) {
        Some(safety) if safety > SAFE_THRESHOLD => bullets.push(SAFE_BULLET.to_owned()),
        Some(safety) if safety < UNSAFE_THRESHOLD => bullets.push(UNSAFE_BULLET.to_owned()),
        _ => {}
    }

    if dimension_score(Dimension::Community).is_some_and(|community| community > DIVERSE_THRESHOLD)
    {
        bullets.push(DIVERSE_BULLET.to_owned());
    }

    if let (Some(cost), Some(budget)) = (metrics.reported_housing_cost(), profile.budget_max()) {
        let figure = format_dollars(cost);
        if cost <= budget {
            bullets.push(format!("Housing costs ({figure}) fit within your budget"));
        } else {
            bullets.push(format!("Housing costs ({figure}) exceed your stated budget"));
        }
    }

    bullets.truncate(MAX_BULLETS);
    bullets
}

/// Format a dollar amount rounded to whole dollars with comma separators.
///
/// # Examples
/// ```
/// use trueplace_scorer::format_dollars;
///
/// assert_eq!(format_dollars(3000.0), "$3,000");
/// assert_eq!(format_dollars(1234567.6), "$1,234,568");
/// assert_eq!(format_dollars(950.0), "$950");
/// ```
#[must_use]
pub fn format_dollars(amount: f64) -> String {
    let digits: Vec<char> = format!("{:.0}", amount.abs().round()).chars().collect();
    let groups: Vec<String> = digits
        .rchunks(3)
        .rev()
        .map(|group| group.iter().collect())
        .collect();
    format!("${}", groups.join(","))
}
