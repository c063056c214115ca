//! Focused unit tests covering rank configuration and execution.

use std::time::Duration;

use camino::Utf8PathBuf;
use rstest::rstest;
use serde_json::json;
use trueplace_core::test_support::sample_locations;
use trueplace_core::{ConfigurationError, Dimension, WeightProfile};
use trueplace_ranking::{QueryError, RankingError, SortDirection, SortKey};

use super::helpers::Workspace;
use super::*;
use crate::dataset::DatasetLocation;
use crate::rank::{RankArgs, RankConfig, config_from_layers_for_test, execute_rank};

fn args_for(path: Utf8PathBuf) -> RankArgs {
    RankArgs {
        locations: Some(path),
        ..RankArgs::default()
    }
}

#[rstest]
fn converting_rank_without_dataset_errors() {
    let err = RankConfig::try_from(RankArgs::default()).expect_err("missing dataset should error");
    assert!(
        matches!(
            err,
            CliError::MissingArgument {
                field: ARG_LOCATIONS,
                env: ENV_RANK_LOCATIONS,
            }
        ),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn converting_rank_with_both_datasets_errors() {
    let args = RankArgs {
        locations: Some(Utf8PathBuf::from("locations.json")),
        dataset_db: Some(Utf8PathBuf::from("dataset.db")),
        ..RankArgs::default()
    };
    let err = RankConfig::try_from(args).expect_err("two datasets should error");
    assert!(
        matches!(err, CliError::ConflictingArguments { .. }),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn weight_options_override_the_preset() {
    let args = RankArgs {
        safety_weight: Some(2.0),
        budget_max: Some(1500.0),
        diversity_emphasis: Some(true),
        ..args_for(Utf8PathBuf::from("locations.json"))
    };
    let config = RankConfig::try_from(args).expect("config should build");
    let expected = WeightProfile::with_diversity_emphasis(true)
        .with_weight(Dimension::Safety, 2.0)
        .with_budget_max(1500.0);
    assert_eq!(config.profile, expected);
    assert_eq!(config.profile.weight(Dimension::Community), 0.60);
}

#[rstest]
fn filter_options_become_a_normalised_query() {
    let args = RankArgs {
        sort_by: Some("Safety".to_owned()),
        sort_dir: Some("asc".to_owned()),
        state: Some("or".to_owned()),
        query: Some("Port".to_owned()),
        bias_type: Some(vec!["race".to_owned(), "race".to_owned()]),
        min_community: Some(40.0),
        limit: Some(500),
        offset: Some(2),
        ..args_for(Utf8PathBuf::from("locations.json"))
    };
    let config = RankConfig::try_from(args).expect("config should build");
    assert_eq!(config.query.sort_by, SortKey::Safety);
    assert_eq!(config.query.sort_dir, SortDirection::Asc);
    assert_eq!(config.query.state.as_deref(), Some("OR"));
    assert_eq!(config.query.text.as_deref(), Some("port"));
    assert_eq!(config.query.bias_types, ["race"]);
    assert_eq!(config.query.min_community, Some(40.0));
    assert_eq!(config.query.limit, 100);
    assert_eq!(config.query.offset, 2);
}

#[rstest]
fn unknown_sort_keys_are_rejected() {
    let args = RankArgs {
        sort_by: Some("vibes".to_owned()),
        ..args_for(Utf8PathBuf::from("locations.json"))
    };
    let err = RankConfig::try_from(args).expect_err("unknown sort key should error");
    assert!(
        matches!(err, CliError::Query(QueryError::UnknownSortKey(ref key)) if key == "vibes"),
        "unexpected error: {err:?}"
    );
}

#[rstest]
#[case::default(None, Duration::from_secs(600))]
#[case::custom(Some(30), Duration::from_secs(30))]
#[case::disabled(Some(0), Duration::ZERO)]
fn cache_ttl_comes_from_seconds(#[case] secs: Option<u64>, #[case] expected: Duration) {
    let args = RankArgs {
        cache_ttl_secs: secs,
        ..args_for(Utf8PathBuf::from("locations.json"))
    };
    let config = RankConfig::try_from(args).expect("config should build");
    assert_eq!(config.cache_ttl, expected);
}

#[rstest]
fn ranking_a_json_dataset_orders_by_composite() {
    let workspace = Workspace::new();
    let config = RankConfig::try_from(args_for(workspace.sample_json())).expect("config");

    let page = execute_rank(&config).expect("rank should succeed");

    assert_eq!(page.total, 3);
    assert_eq!(page.results.len(), 3);
    assert!(!page.cache.hit);
    assert_eq!(page.cache.ttl, Duration::from_secs(600));
    let composites: Vec<u8> = page.results.iter().map(|r| r.score.composite).collect();
    let mut sorted = composites.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(composites, sorted);
}

#[rstest]
fn state_and_bias_filters_narrow_the_ranking() {
    let workspace = Workspace::new();
    let args = RankArgs {
        bias_type: Some(vec!["religion".to_owned()]),
        state: Some("tx".to_owned()),
        ..args_for(workspace.sample_json())
    };
    let config = RankConfig::try_from(args).expect("config");

    let page = execute_rank(&config).expect("rank should succeed");

    assert_eq!(page.total, 1);
    let austin = page.results.first().expect("one result");
    assert_eq!(austin.score.name, "Austin");
    assert_eq!(austin.bias_incidents, Some(5));
}

#[rstest]
fn pagination_slices_the_full_ranking() {
    let workspace = Workspace::new();
    let path = workspace.sample_json();
    let full = execute_rank(&RankConfig::try_from(args_for(path.clone())).expect("config"))
        .expect("full ranking");
    let args = RankArgs {
        limit: Some(1),
        offset: Some(1),
        ..args_for(path)
    };
    let page = execute_rank(&RankConfig::try_from(args).expect("config")).expect("page");

    assert_eq!(page.total, 3);
    assert_eq!(page.limit, 1);
    assert_eq!(page.offset, 1);
    assert_eq!(page.results.first(), full.results.get(1));
}

#[cfg(feature = "store-sqlite")]
#[rstest]
fn sqlite_and_json_datasets_rank_identically() {
    let workspace = Workspace::new();
    let json_config = RankConfig::try_from(args_for(workspace.sample_json())).expect("config");
    let from_json = execute_rank(&json_config).expect("json ranking");
    let args = RankArgs {
        dataset_db: Some(workspace.sample_sqlite()),
        ..RankArgs::default()
    };
    let from_sqlite =
        execute_rank(&RankConfig::try_from(args).expect("config")).expect("sqlite ranking");

    assert_eq!(from_sqlite.results, from_json.results);
    assert_ne!(from_sqlite.cache.key, from_json.cache.key);
}

#[rstest]
fn zero_weights_surface_a_configuration_error() {
    let workspace = Workspace::new();
    let args = RankArgs {
        safety_weight: Some(0.0),
        community_weight: Some(0.0),
        cost_quality_weight: Some(0.0),
        ..args_for(workspace.sample_json())
    };
    let config = RankConfig::try_from(args).expect("config");
    let err = execute_rank(&config).expect_err("zero weights should error");
    assert!(
        matches!(
            err,
            CliError::Rank(RankingError::Configuration(ConfigurationError::ZeroWeightSum))
        ),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn missing_dataset_files_are_reported() {
    let workspace = Workspace::new();
    let missing = workspace.path("absent.json");
    let config = RankConfig::try_from(args_for(missing.clone())).expect("config");
    let err = execute_rank(&config).expect_err("missing file should error");
    assert!(
        matches!(
            &err,
            CliError::MissingSourceFile { field: ARG_LOCATIONS, path } if *path == missing
        ),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn directories_are_not_datasets() {
    let workspace = Workspace::new();
    let dir = workspace.path("nested");
    std::fs::create_dir(&dir).expect("create dir");
    let args = RankArgs {
        dataset_db: Some(dir),
        ..RankArgs::default()
    };
    let err = execute_rank(&RankConfig::try_from(args).expect("config"))
        .expect_err("directory should error");
    assert!(
        matches!(err, CliError::SourcePathNotFile { field: ARG_DATASET_DB, .. }),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn malformed_locations_json_is_reported() {
    let workspace = Workspace::new();
    let path = workspace.write_raw("broken.json", b"{\"name\": ");
    let err = execute_rank(&RankConfig::try_from(args_for(path)).expect("config"))
        .expect_err("broken JSON should error");
    assert!(
        matches!(err, CliError::ParseLocations { .. }),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn undecodable_location_records_are_skipped() {
    let workspace = Workspace::new();
    let path = workspace.write_raw(
        "mixed.json",
        concat!(
            r#"[{"name":"Good","state":"OR","healthIndex":80},"#,
            r#"{"name":"Bad","state":"OR","healthIndex":"high"}]"#,
        )
        .as_bytes(),
    );
    let config = RankConfig::try_from(args_for(path)).expect("config");

    let page = execute_rank(&config).expect("rank should skip the bad record");

    assert_eq!(page.total, 1);
    let first = page.results.first().expect("one result");
    assert_eq!(first.score.name, "Good");
}

#[rstest]
fn a_json_object_is_not_a_locations_array() {
    let workspace = Workspace::new();
    let path = workspace.write_raw("object.json", br#"{"name":"Good","state":"OR"}"#);
    let config = RankConfig::try_from(args_for(path)).expect("config");
    let err = execute_rank(&config).expect_err("object should error");
    assert!(
        matches!(err, CliError::ParseLocations { .. }),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn pages_serialise_with_wire_names() {
    let workspace = Workspace::new();
    let config = RankConfig::try_from(args_for(workspace.sample_json())).expect("config");
    let page = execute_rank(&config).expect("rank should succeed");
    let mut buffer = Vec::new();
    write_json(&mut buffer, &page).expect("write output");

    let text = String::from_utf8(buffer).expect("utf-8 output");
    assert!(text.ends_with('\n'));
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(value.pointer("/total"), Some(&json!(3)));
    assert_eq!(value.pointer("/cache/hit"), Some(&json!(false)));
    assert_eq!(value.pointer("/cache/ttlMs"), Some(&json!(600_000)));
    assert!(value.pointer("/results/0/composite").is_some());
    assert!(value.pointer("/results/0/dims/safety").is_some());
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "locations": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    assert!(
        matches!(err, CliError::Configuration(_)),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;

    let workspace = Workspace::new();
    let file_locations = workspace.sample_json();
    let env_locations = workspace.write_locations(
        "env.json",
        &sample_locations().into_iter().take(1).collect::<Vec<_>>(),
    );

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "locations": file_locations.as_str(),
            "safety_weight": 3.0,
            "limit": 5,
        }),
        None,
    );
    composer.push_environment(json!({
        "locations": env_locations.as_str(),
        "state": "tx",
    }));
    composer.push_cli(json!({ "limit": 7 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.dataset, DatasetLocation::Json(env_locations));
    assert_eq!(config.profile.weight(Dimension::Safety), 3.0);
    assert_eq!(config.query.state.as_deref(), Some("TX"));
    assert_eq!(config.query.limit, 7);
}
