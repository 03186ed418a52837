//! Focused unit tests covering the recommendation commands.

use super::helpers::Workspace;
use super::*;
use crate::recommend::{
    RecommendEventsArgs, RecommendEventsConfig, RecommendVolunteersConfig,
    events_config_from_layers_for_test, execute_recommend_events, execute_recommend_volunteers,
};
use rstest::rstest;
use volio_core::{EventId, VolunteerId};
use volio_match::RankingOptions;

fn volunteers_config(
    database: Utf8PathBuf,
    event: &str,
    options: RankingOptions,
) -> RecommendVolunteersConfig {
    RecommendVolunteersConfig {
        source: DirectorySource::new(database, None),
        event: EventId::from(event),
        options,
    }
}

fn ids<'a>(ids: impl Iterator<Item = &'a VolunteerId>) -> Vec<&'a str> {
    ids.map(VolunteerId::as_str).collect()
}

#[rstest]
fn converting_without_a_volunteer_errors() {
    let args = RecommendEventsArgs {
        database: Some(Utf8PathBuf::from("volio.db")),
        ..RecommendEventsArgs::default()
    };
    let err = RecommendEventsConfig::try_from(args).expect_err("missing volunteer");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_VOLUNTEER);
            assert_eq!(env, ENV_RECOMMEND_EVENTS_VOLUNTEER);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn flags_map_onto_ranking_options() {
    let args = RecommendEventsArgs {
        database: Some(Utf8PathBuf::from("volio.db")),
        volunteer: Some("ana".into()),
        limit: Some(3),
        min_score: Some(40),
        skip_involved: Some(true),
        lookup_timeout_ms: None,
    };
    let config = RecommendEventsConfig::try_from(args).expect("config builds");
    assert_eq!(
        config.options,
        RankingOptions::default()
            .with_limit(3)
            .with_min_score(40)
            .skipping_involved()
    );
}

#[rstest]
fn recommend_events_orders_by_score() {
    let workspace = Workspace::new();
    let config = RecommendEventsConfig {
        source: DirectorySource::new(workspace.imported_sample(), None),
        volunteer: VolunteerId::from("ana"),
        options: RankingOptions::default(),
    };

    let ranking = execute_recommend_events(&config).expect("ranking succeeds");
    let ranked: Vec<&str> = ranking.ids().map(EventId::as_str).collect();
    assert_eq!(ranked, ["evt-park", "evt-school"]);
    assert!(ranking.is_complete());
}

#[rstest]
#[case::everyone(RankingOptions::default(), &["ana", "ben", "cai"])]
#[case::skipping_involved(RankingOptions::default().skipping_involved(), &["ana", "cai"])]
#[case::above_threshold(RankingOptions::default().with_min_score(50), &["ana"])]
#[case::limited(RankingOptions::default().with_limit(2), &["ana", "ben"])]
fn recommend_volunteers_applies_options(
    #[case] options: RankingOptions,
    #[case] expected: &[&str],
) {
    let workspace = Workspace::new();
    let config = volunteers_config(workspace.imported_sample(), "evt-park", options);

    let ranking = execute_recommend_volunteers(&config).expect("ranking succeeds");
    assert_eq!(ids(ranking.ids()), expected);
}

#[rstest]
fn recommend_volunteers_reports_unknown_events() {
    let workspace = Workspace::new();
    let config = volunteers_config(
        workspace.imported_sample(),
        "evt-ghost",
        RankingOptions::default(),
    );
    let err = execute_recommend_volunteers(&config).expect_err("event is unknown");
    assert_eq!(err.to_string(), "event evt-ghost was not found");
}

#[rstest]
fn merge_layers_accept_ranking_flags_from_files() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({ "database": "volio.db", "limit": 10, "skip_involved": true }),
        None,
    );
    composer.push_cli(json!({ "volunteer": "ana", "limit": 2 }));

    let config =
        events_config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(
        config.options,
        RankingOptions::default().with_limit(2).skipping_involved()
    );
}
