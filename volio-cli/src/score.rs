//! `score` command: score one stored volunteer against one stored event.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use volio_core::{EventId, VolunteerId};
use volio_match::MatchResult;

use crate::{
    ARG_DATABASE, ARG_EVENT, ARG_LOOKUP_TIMEOUT_MS, ARG_VOLUNTEER, CliError, DirectorySource,
    ENV_SCORE_DATABASE, ENV_SCORE_EVENT, ENV_SCORE_VOLUNTEER, block_on, require_existing,
    write_json,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "score",
    long_about = "Compute the Smart Match score between a volunteer and an \
                 event stored in a SQLite directory and print the score with \
                 its factor breakdown as JSON.",
    about = "Score one volunteer against one event"
)]
#[ortho_config(prefix = "VOLIO")]
pub(crate) struct ScoreArgs {
    /// Path to the SQLite directory written by `volio import`.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the volunteer to score.
    #[arg(long = ARG_VOLUNTEER, value_name = "id")]
    #[serde(default)]
    pub(crate) volunteer: Option<String>,
    /// Identifier of the event to score against.
    #[arg(long = ARG_EVENT, value_name = "id")]
    #[serde(default)]
    pub(crate) event: Option<String>,
    /// Upper bound on the friend lookup, in milliseconds.
    #[arg(long = ARG_LOOKUP_TIMEOUT_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) lookup_timeout_ms: Option<u64>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreConfig {
    /// Directory to read and its lookup bound.
    pub(crate) source: DirectorySource,
    /// Volunteer to score.
    pub(crate) volunteer: VolunteerId,
    /// Event to score against.
    pub(crate) event: EventId,
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_SCORE_DATABASE,
        })?;
        let volunteer = args.volunteer.ok_or(CliError::MissingArgument {
            field: ARG_VOLUNTEER,
            env: ENV_SCORE_VOLUNTEER,
        })?;
        let event = args.event.ok_or(CliError::MissingArgument {
            field: ARG_EVENT,
            env: ENV_SCORE_EVENT,
        })?;
        Ok(Self {
            source: DirectorySource::new(database, args.lookup_timeout_ms),
            volunteer: VolunteerId::from(volunteer),
            event: EventId::from(event),
        })
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_score_with(args, &mut stdout)
}

pub(crate) fn run_score_with(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let result = execute_score(&config)?;
    write_json(writer, &result)
}

pub(crate) fn execute_score(config: &ScoreConfig) -> Result<MatchResult, CliError> {
    require_existing(&config.source.database, ARG_DATABASE)?;
    let service = config.source.open_service()?;
    let result = block_on(service.score_by_ids(&config.volunteer, &config.event))??;
    Ok(result)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
