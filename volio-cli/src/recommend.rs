//! `recommend-events` and `recommend-volunteers` commands.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use volio_core::{EventId, VolunteerId};
use volio_match::{Ranking, RankingOptions};

use crate::{
    ARG_DATABASE, ARG_EVENT, ARG_LIMIT, ARG_LOOKUP_TIMEOUT_MS, ARG_MIN_SCORE, ARG_SKIP_INVOLVED,
    ARG_VOLUNTEER, CliError, DirectorySource, ENV_RECOMMEND_EVENTS_DATABASE,
    ENV_RECOMMEND_EVENTS_VOLUNTEER, ENV_RECOMMEND_VOLUNTEERS_DATABASE,
    ENV_RECOMMEND_VOLUNTEERS_EVENT, block_on, require_existing, write_json,
};

/// CLI arguments for the `recommend-events` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "recommend-events",
    long_about = "Rank every event in a SQLite directory for one volunteer, \
                 best match first. Ties are broken by event id.",
    about = "Rank events for a volunteer"
)]
#[ortho_config(prefix = "VOLIO")]
pub(crate) struct RecommendEventsArgs {
    /// Path to the SQLite directory written by `volio import`.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the volunteer to recommend events for.
    #[arg(long = ARG_VOLUNTEER, value_name = "id")]
    #[serde(default)]
    pub(crate) volunteer: Option<String>,
    /// Keep at most this many events.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Drop events scoring below this value.
    #[arg(long = ARG_MIN_SCORE, value_name = "score")]
    #[serde(default)]
    pub(crate) min_score: Option<u8>,
    /// Skip events the volunteer organises or already joined.
    #[arg(
        long = ARG_SKIP_INVOLVED,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) skip_involved: Option<bool>,
    /// Upper bound on the friend lookup, in milliseconds.
    #[arg(long = ARG_LOOKUP_TIMEOUT_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) lookup_timeout_ms: Option<u64>,
}

impl RecommendEventsArgs {
    pub(crate) fn into_config(self) -> Result<RecommendEventsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendEventsConfig::try_from(merged)
    }
}

/// Resolved `recommend-events` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecommendEventsConfig {
    /// Directory to read and its lookup bound.
    pub(crate) source: DirectorySource,
    /// Volunteer receiving recommendations.
    pub(crate) volunteer: VolunteerId,
    /// Filtering and truncation settings.
    pub(crate) options: RankingOptions,
}

impl TryFrom<RecommendEventsArgs> for RecommendEventsConfig {
    type Error = CliError;

    fn try_from(args: RecommendEventsArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_RECOMMEND_EVENTS_DATABASE,
        })?;
        let volunteer = args.volunteer.ok_or(CliError::MissingArgument {
            field: ARG_VOLUNTEER,
            env: ENV_RECOMMEND_EVENTS_VOLUNTEER,
        })?;
        Ok(Self {
            source: DirectorySource::new(database, args.lookup_timeout_ms),
            volunteer: VolunteerId::from(volunteer),
            options: ranking_options(args.limit, args.min_score, args.skip_involved),
        })
    }
}

/// CLI arguments for the `recommend-volunteers` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "recommend-volunteers",
    long_about = "Rank every volunteer in a SQLite directory for one event, \
                 best match first. Volunteers whose friend lookup fails are \
                 listed under failures instead of being ranked.",
    about = "Rank volunteers for an event"
)]
#[ortho_config(prefix = "VOLIO")]
pub(crate) struct RecommendVolunteersArgs {
    /// Path to the SQLite directory written by `volio import`.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the event to recommend volunteers for.
    #[arg(long = ARG_EVENT, value_name = "id")]
    #[serde(default)]
    pub(crate) event: Option<String>,
    /// Keep at most this many volunteers.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Drop volunteers scoring below this value.
    #[arg(long = ARG_MIN_SCORE, value_name = "score")]
    #[serde(default)]
    pub(crate) min_score: Option<u8>,
    /// Skip the organiser and volunteers who already joined.
    #[arg(
        long = ARG_SKIP_INVOLVED,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) skip_involved: Option<bool>,
    /// Upper bound on each friend lookup, in milliseconds.
    #[arg(long = ARG_LOOKUP_TIMEOUT_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) lookup_timeout_ms: Option<u64>,
}

impl RecommendVolunteersArgs {
    pub(crate) fn into_config(self) -> Result<RecommendVolunteersConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendVolunteersConfig::try_from(merged)
    }
}

/// Resolved `recommend-volunteers` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecommendVolunteersConfig {
    /// Directory to read and its lookup bound.
    pub(crate) source: DirectorySource,
    /// Event receiving recommendations.
    pub(crate) event: EventId,
    /// Filtering and truncation settings.
    pub(crate) options: RankingOptions,
}

impl TryFrom<RecommendVolunteersArgs> for RecommendVolunteersConfig {
    type Error = CliError;

    fn try_from(args: RecommendVolunteersArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_RECOMMEND_VOLUNTEERS_DATABASE,
        })?;
        let event = args.event.ok_or(CliError::MissingArgument {
            field: ARG_EVENT,
            env: ENV_RECOMMEND_VOLUNTEERS_EVENT,
        })?;
        Ok(Self {
            source: DirectorySource::new(database, args.lookup_timeout_ms),
            event: EventId::from(event),
            options: ranking_options(args.limit, args.min_score, args.skip_involved),
        })
    }
}

fn ranking_options(
    limit: Option<usize>,
    min_score: Option<u8>,
    skip_involved: Option<bool>,
) -> RankingOptions {
    let mut options = RankingOptions::default().with_min_score(min_score.unwrap_or(0));
    if let Some(max) = limit {
        options = options.with_limit(max);
    }
    if skip_involved.unwrap_or(false) {
        options = options.skipping_involved();
    }
    options
}

pub(crate) fn run_recommend_events(args: RecommendEventsArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_recommend_events_with(args, &mut stdout)
}

pub(crate) fn run_recommend_events_with(
    args: RecommendEventsArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let ranking = execute_recommend_events(&config)?;
    write_json(writer, &ranking)
}

pub(crate) fn execute_recommend_events(
    config: &RecommendEventsConfig,
) -> Result<Ranking<EventId>, CliError> {
    require_existing(&config.source.database, ARG_DATABASE)?;
    let service = config.source.open_service()?;
    let ranking = block_on(service.recommend_events(&config.volunteer, &config.options))??;
    Ok(ranking)
}

pub(crate) fn run_recommend_volunteers(args: RecommendVolunteersArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_recommend_volunteers_with(args, &mut stdout)
}

pub(crate) fn run_recommend_volunteers_with(
    args: RecommendVolunteersArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let ranking = execute_recommend_volunteers(&config)?;
    write_json(writer, &ranking)
}

pub(crate) fn execute_recommend_volunteers(
    config: &RecommendVolunteersConfig,
) -> Result<Ranking<VolunteerId>, CliError> {
    require_existing(&config.source.database, ARG_DATABASE)?;
    let service = config.source.open_service()?;
    let ranking = block_on(service.recommend_volunteers(&config.event, &config.options))??;
    Ok(ranking)
}

#[cfg(test)]
pub(crate) fn events_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RecommendEventsConfig, CliError> {
    let merged = RecommendEventsArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RecommendEventsConfig::try_from(merged)
}
