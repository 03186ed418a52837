//! `import` command: persist a JSON dataset into a SQLite directory.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use volio_core::{Dataset, write_directory};

use crate::fs::{ensure_parent_dir, open_utf8_file};
use crate::{
    ARG_DATABASE, ARG_DATASET, CliError, ENV_IMPORT_DATABASE, ENV_IMPORT_DATASET,
    require_existing, write_json,
};

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "import",
    long_about = "Load a JSON dataset of volunteers, events, and friendships \
                 and write it to a SQLite directory. Existing directory rows \
                 are replaced.",
    about = "Persist a JSON dataset into a SQLite directory"
)]
#[ortho_config(prefix = "VOLIO")]
pub(crate) struct ImportArgs {
    /// Path to a JSON file containing a dataset.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// Path of the SQLite directory to write.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl ImportArgs {
    pub(crate) fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    /// Path to the JSON dataset.
    pub(crate) dataset: Utf8PathBuf,
    /// Path of the SQLite directory to write.
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let dataset = args.dataset.ok_or(CliError::MissingArgument {
            field: ARG_DATASET,
            env: ENV_IMPORT_DATASET,
        })?;
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_IMPORT_DATABASE,
        })?;
        Ok(Self { dataset, database })
    }
}

/// Counts of the records written by `import`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ImportSummary {
    /// Directory that was written.
    pub(crate) database: Utf8PathBuf,
    /// Number of volunteer profiles.
    pub(crate) volunteers: usize,
    /// Number of events.
    pub(crate) events: usize,
    /// Number of friendship pairs in the dataset.
    pub(crate) friendships: usize,
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_import_with(args, &mut stdout)
}

pub(crate) fn run_import_with(args: ImportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = execute_import(&config)?;
    write_json(writer, &summary)
}

pub(crate) fn execute_import(config: &ImportConfig) -> Result<ImportSummary, CliError> {
    require_existing(&config.dataset, ARG_DATASET)?;
    let dataset = load_dataset(&config.dataset)?;
    ensure_parent_dir(&config.database).map_err(|source| CliError::CreateDatabaseDir {
        path: config.database.clone(),
        source,
    })?;
    write_directory(&config.database, &dataset).map_err(|source| CliError::WriteDirectory {
        path: config.database.clone(),
        source,
    })?;
    Ok(ImportSummary {
        database: config.database.clone(),
        volunteers: dataset.volunteers.len(),
        events: dataset.events.len(),
        friendships: dataset.friendships.len(),
    })
}

/// Loads a JSON-encoded [`Dataset`] from disk.
pub(crate) fn load_dataset(path: &Utf8Path) -> Result<Dataset, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenDataset {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseDataset {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ImportConfig, CliError> {
    let merged = ImportArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ImportConfig::try_from(merged)
}
