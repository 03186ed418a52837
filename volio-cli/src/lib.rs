//! Command-line interface for importing volunteer directories and running
//! Smart Match scoring against them.
#![forbid(unsafe_code)]

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use serde::Serialize;
use volio_core::SqliteDirectory;
use volio_match::{MatchService, TimedLookup};

mod error;
mod fs;
mod import;
mod recommend;
mod score;

pub use error::CliError;

use import::{ImportArgs, run_import};
use recommend::{
    RecommendEventsArgs, RecommendVolunteersArgs, run_recommend_events, run_recommend_volunteers,
};
use score::{ScoreArgs, run_score};

pub(crate) const ARG_DATASET: &str = "dataset";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_VOLUNTEER: &str = "volunteer";
pub(crate) const ARG_EVENT: &str = "event";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ARG_MIN_SCORE: &str = "min-score";
pub(crate) const ARG_SKIP_INVOLVED: &str = "skip-involved";
pub(crate) const ARG_LOOKUP_TIMEOUT_MS: &str = "lookup-timeout-ms";

pub(crate) const ENV_IMPORT_DATASET: &str = "VOLIO_CMDS_IMPORT_DATASET";
pub(crate) const ENV_IMPORT_DATABASE: &str = "VOLIO_CMDS_IMPORT_DATABASE";
pub(crate) const ENV_SCORE_DATABASE: &str = "VOLIO_CMDS_SCORE_DATABASE";
pub(crate) const ENV_SCORE_VOLUNTEER: &str = "VOLIO_CMDS_SCORE_VOLUNTEER";
pub(crate) const ENV_SCORE_EVENT: &str = "VOLIO_CMDS_SCORE_EVENT";
pub(crate) const ENV_RECOMMEND_EVENTS_DATABASE: &str = "VOLIO_CMDS_RECOMMEND_EVENTS_DATABASE";
pub(crate) const ENV_RECOMMEND_EVENTS_VOLUNTEER: &str = "VOLIO_CMDS_RECOMMEND_EVENTS_VOLUNTEER";
pub(crate) const ENV_RECOMMEND_VOLUNTEERS_DATABASE: &str =
    "VOLIO_CMDS_RECOMMEND_VOLUNTEERS_DATABASE";
pub(crate) const ENV_RECOMMEND_VOLUNTEERS_EVENT: &str = "VOLIO_CMDS_RECOMMEND_VOLUNTEERS_EVENT";

/// Friend lookup timeout applied when none is configured.
pub(crate) const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;

/// Run the volio CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration, file access,
/// scoring, or output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Import(args) => run_import(args),
        Command::Score(args) => run_score(args),
        Command::RecommendEvents(args) => run_recommend_events(args),
        Command::RecommendVolunteers(args) => run_recommend_volunteers(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "volio",
    about = "Volunteer and event matching utilities for Volio",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Persist a JSON dataset into a SQLite directory.
    Import(ImportArgs),
    /// Score one volunteer against one event.
    Score(ScoreArgs),
    /// Rank events for a volunteer.
    RecommendEvents(RecommendEventsArgs),
    /// Rank volunteers for an event.
    RecommendVolunteers(RecommendVolunteersArgs),
}

/// Service reading profiles from a SQLite directory with time-bounded
/// friend lookups.
pub(crate) type DirectoryService =
    MatchService<Arc<SqliteDirectory>, TimedLookup<Arc<SqliteDirectory>>>;

/// Directory and lookup settings shared by the scoring commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectorySource {
    /// Path to the SQLite directory written by `volio import`.
    pub(crate) database: Utf8PathBuf,
    /// Upper bound on each friend lookup.
    pub(crate) lookup_timeout: Duration,
}

impl DirectorySource {
    pub(crate) const fn new(database: Utf8PathBuf, lookup_timeout_ms: Option<u64>) -> Self {
        let millis = match lookup_timeout_ms {
            Some(millis) => millis,
            None => DEFAULT_LOOKUP_TIMEOUT_MS,
        };
        Self {
            database,
            lookup_timeout: Duration::from_millis(millis),
        }
    }

    pub(crate) fn open_service(&self) -> Result<DirectoryService, CliError> {
        let directory = self.open_directory()?;
        let lookup = self.timed_lookup(&directory);
        Ok(MatchService::new(directory, lookup))
    }

    fn open_directory(&self) -> Result<Arc<SqliteDirectory>, CliError> {
        let directory = SqliteDirectory::open(&self.database).map_err(|source| {
            CliError::OpenDirectory {
                path: self.database.clone(),
                source,
            }
        })?;
        Ok(Arc::new(directory))
    }

    fn timed_lookup(
        &self,
        directory: &Arc<SqliteDirectory>,
    ) -> TimedLookup<Arc<SqliteDirectory>> {
        TimedLookup::new(Arc::clone(directory), self.lookup_timeout)
    }
}

/// Report whether `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Drive `future` to completion on a single-threaded runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(CliError::Runtime)?;
    Ok(runtime.block_on(future))
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
