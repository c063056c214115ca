//! Behavioural tests for composite scoring using rstest-bdd.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use trueplace_core::{
    ConfigurationError, Dimension, DimensionWeights, RawLocationMetrics, ScoreResult,
    WeightProfile,
};
use trueplace_scorer::{ScoreError, compute_score};

#[derive(Debug)]
struct CompositeWorld {
    metrics: RefCell<RawLocationMetrics>,
    profile: RefCell<WeightProfile>,
    outcome: RefCell<Option<Result<ScoreResult, ScoreError>>>,
}

impl CompositeWorld {
    fn scored(&self) -> ScoreResult {
        match self.outcome.borrow().clone() {
            Some(Ok(result)) => result,
            other => panic!("expected a score, got {other:?}"),
        }
    }
}

#[fixture]
fn world() -> CompositeWorld {
    CompositeWorld {
        metrics: RefCell::new(RawLocationMetrics::new("Anywhere", "ZZ")),
        profile: RefCell::new(WeightProfile::new()),
        outcome: RefCell::new(None),
    }
}

#[given("a location with no crime, full diversity and cheap housing")]
fn given_ideal_location(world: &CompositeWorld) {
    world.metrics.replace(
        RawLocationMetrics::new("Ideal", "ZZ")
            .with_hate_crime_rate(0.0)
            .with_violent_crime_rate(0.0)
            .with_diversity_index(1.0)
            .with_housing_cost(500.0)
            .with_health_index(100.0),
    );
}

#[given("a location with housing costs of 3000 dollars")]
fn given_expensive_location(world: &CompositeWorld) {
    world
        .metrics
        .replace(RawLocationMetrics::new("Tacoma", "WA").with_housing_cost(3000.0));
}

#[given("equal weights for every dimension")]
fn given_equal_weights(world: &CompositeWorld) {
    world
        .profile
        .replace(WeightProfile::from_weights(DimensionWeights::new(1.0, 1.0, 1.0)));
}

#[given("zero weights for every dimension")]
fn given_zero_weights(world: &CompositeWorld) {
    world
        .profile
        .replace(WeightProfile::from_weights(DimensionWeights::new(0.0, 0.0, 0.0)));
}

#[given("a budget of 1500 dollars")]
fn given_budget(world: &CompositeWorld) {
    let profile = *world.profile.borrow();
    world.profile.replace(profile.with_budget_max(1500.0));
}

#[when("the location is scored")]
fn when_scored(world: &CompositeWorld) {
    let outcome = compute_score(&world.metrics.borrow(), &world.profile.borrow());
    world.outcome.replace(Some(outcome));
}

#[then("the composite score is 100")]
fn then_full_marks(world: &CompositeWorld) {
    assert_eq!(world.scored().composite, 100);
}

#[then("the cost quality score is 33")]
fn then_cost_quality(world: &CompositeWorld) {
    assert_eq!(world.scored().dimension(Dimension::CostQuality), 33);
}

#[then("the rationale mentions the budget")]
fn then_budget_bullet(world: &CompositeWorld) {
    let result = world.scored();
    assert!(
        result
            .rationale
            .iter()
            .any(|bullet| bullet.contains("exceed your stated budget")),
        "rationale was {:?}",
        result.rationale
    );
}

#[then("scoring fails with a configuration error")]
fn then_configuration_error(world: &CompositeWorld) {
    assert_eq!(
        world.outcome.borrow().clone(),
        Some(Err(ScoreError::Configuration(
            ConfigurationError::ZeroWeightSum
        )))
    );
}

#[scenario(path = "tests/features/composite.feature", index = 0)]
fn best_case_location(world: CompositeWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/composite.feature", index = 1)]
fn over_budget_location(world: CompositeWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/composite.feature", index = 2)]
fn zero_weights(world: CompositeWorld) {
    let _ = world;
}
