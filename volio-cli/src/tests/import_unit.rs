//! Focused unit tests covering import configuration and dataset loading.

use super::helpers::{Workspace, sample_dataset, write_utf8};
use super::*;
use crate::import::{
    ImportArgs, ImportConfig, ImportSummary, config_from_layers_for_test, execute_import,
    load_dataset,
};
use rstest::rstest;
use volio_core::{ProfileStore, SqliteDirectory, VolunteerId};

#[rstest]
#[case(None, Some("volio.db"), ARG_DATASET, ENV_IMPORT_DATASET)]
#[case(Some("dataset.json"), None, ARG_DATABASE, ENV_IMPORT_DATABASE)]
fn converting_without_required_fields_errors(
    #[case] dataset: Option<&str>,
    #[case] database: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = ImportArgs {
        dataset: dataset.map(Utf8PathBuf::from),
        database: database.map(Utf8PathBuf::from),
    };
    let err = ImportConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn load_dataset_decodes_json() {
    let workspace = Workspace::new();
    let path = workspace.write_dataset("dataset.json", &sample_dataset());
    let dataset = load_dataset(&path).expect("dataset decodes");
    assert_eq!(dataset, sample_dataset());
}

#[rstest]
fn load_dataset_defaults_missing_sections() {
    let workspace = Workspace::new();
    let path = workspace.path("volunteers-only.json");
    write_utf8(&path, br#"{ "volunteers": [{ "id": "ana" }] }"#);
    let dataset = load_dataset(&path).expect("dataset decodes");
    assert_eq!(dataset.volunteers.len(), 1);
    assert!(dataset.events.is_empty());
    assert!(dataset.friendships.is_empty());
}

#[rstest]
fn load_dataset_rejects_invalid_json() {
    let workspace = Workspace::new();
    let path = workspace.path("dataset.json");
    write_utf8(&path, b"{ not valid json");
    let err = load_dataset(&path).expect_err("invalid json should error");
    match err {
        CliError::ParseDataset { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ParseDataset, found {other:?}"),
    }
}

#[rstest]
fn import_reports_a_missing_dataset_before_writing() {
    let workspace = Workspace::new();
    let config = ImportConfig {
        dataset: workspace.path("missing.json"),
        database: workspace.path("volio.db"),
    };
    let err = execute_import(&config).expect_err("dataset is missing");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_DATASET),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
    assert!(!config.database.exists());
}

#[rstest]
fn import_writes_a_readable_directory() {
    let workspace = Workspace::new();
    let config = ImportConfig {
        dataset: workspace.write_dataset("dataset.json", &sample_dataset()),
        database: workspace.path("artefacts/volio.db"),
    };

    let summary = execute_import(&config).expect("import succeeds");
    assert_eq!(
        summary,
        ImportSummary {
            database: config.database.clone(),
            volunteers: 3,
            events: 2,
            friendships: 1,
        }
    );

    let directory = SqliteDirectory::open(&config.database).expect("directory opens");
    let ana = directory
        .volunteer(&VolunteerId::from("ana"))
        .expect("ana was imported");
    assert!(ana.top_badges.contains("eco-warrior"));
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "dataset": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_prefers_cli_over_environment_and_file() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({ "dataset": "from-file.json", "database": "from-file.db" }),
        None,
    );
    composer.push_environment(json!({ "database": "from-env.db" }));
    composer.push_cli(json!({ "dataset": "from-cli.json" }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.dataset, Utf8PathBuf::from("from-cli.json"));
    assert_eq!(config.database, Utf8PathBuf::from("from-env.db"));
}
