//! SQLite-backed directory of volunteers, events, and friendships.
//!
//! The directory implements both [`ProfileStore`] and
//! [`SocialGraphLookup`], so a single `volio.db` file can drive match
//! scoring offline. Set-valued columns hold JSON arrays of strings.

use std::{
    collections::BTreeSet,
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use geo::Coord;
use log::warn;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, Transaction, params};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    Dataset, Event, EventId, LookupError, SocialGraphLookup, VolunteerId, VolunteerProfile,
    is_valid_location, lat_lon,
};

use super::{ProfileStore, StoreError};

const SCHEMA: &str = "
    DROP TABLE IF EXISTS friendships;
    DROP TABLE IF EXISTS events;
    DROP TABLE IF EXISTS volunteers;
    CREATE TABLE volunteers (
        id TEXT PRIMARY KEY,
        top_badges TEXT NOT NULL,
        interests TEXT NOT NULL,
        lat REAL,
        lon REAL
    );
    CREATE TABLE events (
        id TEXT PRIMARY KEY,
        category TEXT NOT NULL,
        required_badges TEXT NOT NULL,
        lat REAL,
        lon REAL,
        organizer_id TEXT NOT NULL,
        participant_ids TEXT NOT NULL
    );
    CREATE TABLE friendships (
        volunteer_id TEXT NOT NULL,
        friend_id TEXT NOT NULL,
        PRIMARY KEY (volunteer_id, friend_id)
    );
";

const VOLUNTEER_COLUMNS: &str = "SELECT id, top_badges, interests, lat, lon FROM volunteers";
const EVENT_COLUMNS: &str = "SELECT id, category, required_badges, lat, lon, organizer_id, \
     participant_ids FROM events";
const FRIENDS_SQL: &str =
    "SELECT friend_id FROM friendships WHERE volunteer_id = ?1 ORDER BY friend_id";

/// Error raised when reading or writing a `volio.db` directory.
#[derive(Debug, Error)]
pub enum SqliteDirectoryError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The database lacks a table or column the directory needs.
    #[error("SQLite database at {path} does not match the volio schema: {source}")]
    Schema {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A JSON column could not be decoded.
    #[error("failed to decode {column} for {table} row {id}: {source}")]
    InvalidColumn {
        /// Table containing the row.
        table: &'static str,
        /// Column holding the malformed payload.
        column: &'static str,
        /// Identifier of the affected row.
        id: String,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A JSON column could not be encoded while writing.
    #[error("failed to encode {column} for {table} row {id}: {source}")]
    EncodeColumn {
        /// Table receiving the row.
        table: &'static str,
        /// Column being written.
        column: &'static str,
        /// Identifier of the affected row.
        id: String,
        /// JSON encoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// Another thread panicked while holding the connection.
    #[error("SQLite connection lock was poisoned")]
    LockPoisoned,
    /// Generic SQLite error when reading or writing rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Read-only directory backed by a SQLite database.
///
/// Friend lookups run on Tokio's blocking pool, so they must be awaited
/// inside a Tokio runtime. A busy connection then leaves the caller free to
/// give up on the lookup.
pub struct SqliteDirectory {
    path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl fmt::Debug for SqliteDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDirectory")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteDirectory {
    /// Open a directory written by [`write_directory`].
    ///
    /// # Errors
    /// Returns [`SqliteDirectoryError::OpenDatabase`] when the file cannot be
    /// opened read-only and [`SqliteDirectoryError::Schema`] when any of the
    /// expected tables or columns is missing.
    pub fn open(database_path: impl AsRef<Path>) -> Result<Self, SqliteDirectoryError> {
        let path = database_path.as_ref().to_path_buf();
        let connection = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| SqliteDirectoryError::OpenDatabase {
                path: path.clone(),
                source,
            })?;
        for sql in [VOLUNTEER_COLUMNS, EVENT_COLUMNS, FRIENDS_SQL] {
            connection
                .prepare_cached(sql)
                .map(|_| ())
                .map_err(|source| SqliteDirectoryError::Schema {
                    path: path.clone(),
                    source,
                })?;
        }
        Ok(Self {
            path,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Path of the backing database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn find_volunteer(
        &self,
        id: &VolunteerId,
    ) -> Result<Option<VolunteerProfile>, SqliteDirectoryError> {
        let connection = self.lock()?;
        let mut statement =
            connection.prepare_cached(&format!("{VOLUNTEER_COLUMNS} WHERE id = ?1"))?;
        let raw = statement
            .query_row(params![id.as_str()], RawVolunteer::from_row)
            .optional()?;
        raw.map(RawVolunteer::decode).transpose()
    }

    fn find_event(&self, id: &EventId) -> Result<Option<Event>, SqliteDirectoryError> {
        let connection = self.lock()?;
        let mut statement = connection.prepare_cached(&format!("{EVENT_COLUMNS} WHERE id = ?1"))?;
        let raw = statement
            .query_row(params![id.as_str()], RawEvent::from_row)
            .optional()?;
        raw.map(RawEvent::decode).transpose()
    }

    fn all_volunteers(&self) -> Result<Vec<VolunteerProfile>, SqliteDirectoryError> {
        let connection = self.lock()?;
        let mut statement = connection.prepare_cached(&format!("{VOLUNTEER_COLUMNS} ORDER BY id"))?;
        let rows = statement.query_map([], RawVolunteer::from_row)?;
        rows.map(|row| row.map_err(SqliteDirectoryError::from)?.decode())
            .collect()
    }

    fn all_events(&self) -> Result<Vec<Event>, SqliteDirectoryError> {
        let connection = self.lock()?;
        let mut statement = connection.prepare_cached(&format!("{EVENT_COLUMNS} ORDER BY id"))?;
        let rows = statement.query_map([], RawEvent::from_row)?;
        rows.map(|row| row.map_err(SqliteDirectoryError::from)?.decode())
            .collect()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, SqliteDirectoryError> {
        self.connection
            .lock()
            .map_err(|_| SqliteDirectoryError::LockPoisoned)
    }
}

fn friend_ids(
    connection: &Mutex<Connection>,
    volunteer: &VolunteerId,
) -> Result<BTreeSet<VolunteerId>, SqliteDirectoryError> {
    let guard = connection
        .lock()
        .map_err(|_| SqliteDirectoryError::LockPoisoned)?;
    let mut statement = guard.prepare_cached(FRIENDS_SQL)?;
    let rows = statement.query_map(params![volunteer.as_str()], |row| {
        row.get::<_, String>(0)
    })?;
    let mut friends = BTreeSet::new();
    for row in rows {
        friends.insert(VolunteerId::from(row?));
    }
    Ok(friends)
}

impl ProfileStore for SqliteDirectory {
    fn volunteer(&self, id: &VolunteerId) -> Result<VolunteerProfile, StoreError> {
        self.find_volunteer(id)
            .map_err(StoreError::backend)?
            .ok_or_else(|| StoreError::VolunteerNotFound { id: id.clone() })
    }

    fn event(&self, id: &EventId) -> Result<Event, StoreError> {
        self.find_event(id)
            .map_err(StoreError::backend)?
            .ok_or_else(|| StoreError::EventNotFound { id: id.clone() })
    }

    fn volunteers(&self) -> Result<Vec<VolunteerProfile>, StoreError> {
        self.all_volunteers().map_err(StoreError::backend)
    }

    fn events(&self) -> Result<Vec<Event>, StoreError> {
        self.all_events().map_err(StoreError::backend)
    }
}

#[async_trait]
impl SocialGraphLookup for SqliteDirectory {
    async fn friends_of(
        &self,
        volunteer: &VolunteerId,
    ) -> Result<BTreeSet<VolunteerId>, LookupError> {
        let connection = Arc::clone(&self.connection);
        let id = volunteer.clone();
        tokio::task::spawn_blocking(move || friend_ids(&connection, &id))
            .await
            .map_err(|err| LookupError::unavailable(volunteer, err))?
            .map_err(|err| LookupError::unavailable(volunteer, err))
    }
}

/// Persist `dataset` into a SQLite database at `database_path`.
///
/// Existing volio tables are dropped and recreated inside a single
/// transaction, so readers never observe a half-written directory.
/// Friendships are stored in both directions.
///
/// # Errors
/// Returns [`SqliteDirectoryError`] when the database cannot be opened or a
/// row cannot be written.
pub fn write_directory(
    database_path: impl AsRef<Path>,
    dataset: &Dataset,
) -> Result<(), SqliteDirectoryError> {
    let path = database_path.as_ref();
    let mut connection =
        Connection::open(path).map_err(|source| SqliteDirectoryError::OpenDatabase {
            path: path.to_path_buf(),
            source,
        })?;
    let transaction = connection.transaction()?;
    transaction.execute_batch(SCHEMA)?;
    insert_volunteers(&transaction, &dataset.volunteers)?;
    insert_events(&transaction, &dataset.events)?;
    insert_friendships(&transaction, dataset)?;
    transaction.commit()?;
    Ok(())
}

fn insert_volunteers(
    transaction: &Transaction<'_>,
    volunteers: &[VolunteerProfile],
) -> Result<(), SqliteDirectoryError> {
    let mut statement = transaction.prepare(
        "INSERT OR REPLACE INTO volunteers (id, top_badges, interests, lat, lon)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for volunteer in volunteers {
        let id = volunteer.id.as_str();
        let badges = encode("volunteers", "top_badges", id, &volunteer.top_badges)?;
        let interests = encode("volunteers", "interests", id, &volunteer.interests)?;
        let (lat, lon) = split_location(volunteer.location);
        statement.execute(params![id, badges, interests, lat, lon])?;
    }
    Ok(())
}

fn insert_events(
    transaction: &Transaction<'_>,
    events: &[Event],
) -> Result<(), SqliteDirectoryError> {
    let mut statement = transaction.prepare(
        "INSERT OR REPLACE INTO events
            (id, category, required_badges, lat, lon, organizer_id, participant_ids)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for event in events {
        let id = event.id.as_str();
        let badges = encode("events", "required_badges", id, &event.required_badges)?;
        let participants = encode("events", "participant_ids", id, &event.participant_ids)?;
        let (lat, lon) = split_location(event.location);
        statement.execute(params![
            id,
            event.category,
            badges,
            lat,
            lon,
            event.organizer_id.as_str(),
            participants
        ])?;
    }
    Ok(())
}

fn insert_friendships(
    transaction: &Transaction<'_>,
    dataset: &Dataset,
) -> Result<(), SqliteDirectoryError> {
    let mut statement = transaction.prepare(
        "INSERT OR IGNORE INTO friendships (volunteer_id, friend_id) VALUES (?1, ?2)",
    )?;
    for (volunteer, friends) in dataset.friend_graph() {
        for friend in friends {
            statement.execute(params![volunteer.as_str(), friend.as_str()])?;
        }
    }
    Ok(())
}

const fn split_location(location: Option<Coord<f64>>) -> (Option<f64>, Option<f64>) {
    match location {
        Some(coord) => (Some(coord.y), Some(coord.x)),
        None => (None, None),
    }
}

fn join_location(
    table: &'static str,
    id: &str,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Option<Coord<f64>> {
    match (lat, lon) {
        (Some(latitude), Some(longitude)) => {
            let location = lat_lon(latitude, longitude);
            if is_valid_location(location) {
                Some(location)
            } else {
                warn!("ignoring out-of-range location for {table} row {id}");
                None
            }
        }
        (None, None) => None,
        _ => {
            warn!("ignoring partial location for {table} row {id}");
            None
        }
    }
}

fn encode<T: Serialize>(
    table: &'static str,
    column: &'static str,
    id: &str,
    value: &T,
) -> Result<String, SqliteDirectoryError> {
    serde_json::to_string(value).map_err(|source| SqliteDirectoryError::EncodeColumn {
        table,
        column,
        id: id.to_owned(),
        source,
    })
}

fn decode<T: DeserializeOwned>(
    table: &'static str,
    column: &'static str,
    id: &str,
    payload: &str,
) -> Result<T, SqliteDirectoryError> {
    serde_json::from_str(payload).map_err(|source| SqliteDirectoryError::InvalidColumn {
        table,
        column,
        id: id.to_owned(),
        source,
    })
}

struct RawVolunteer {
    id: String,
    top_badges: String,
    interests: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl RawVolunteer {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            top_badges: row.get(1)?,
            interests: row.get(2)?,
            lat: row.get(3)?,
            lon: row.get(4)?,
        })
    }

    fn decode(self) -> Result<VolunteerProfile, SqliteDirectoryError> {
        let top_badges = decode("volunteers", "top_badges", &self.id, &self.top_badges)?;
        let interests = decode("volunteers", "interests", &self.id, &self.interests)?;
        let location = join_location("volunteers", &self.id, self.lat, self.lon);
        Ok(VolunteerProfile {
            id: VolunteerId::from(self.id),
            top_badges,
            interests,
            location,
        })
    }
}

struct RawEvent {
    id: String,
    category: String,
    required_badges: String,
    lat: Option<f64>,
    lon: Option<f64>,
    organizer_id: String,
    participant_ids: String,
}

impl RawEvent {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            category: row.get(1)?,
            required_badges: row.get(2)?,
            lat: row.get(3)?,
            lon: row.get(4)?,
            organizer_id: row.get(5)?,
            participant_ids: row.get(6)?,
        })
    }

    fn decode(self) -> Result<Event, SqliteDirectoryError> {
        let required_badges = decode("events", "required_badges", &self.id, &self.required_badges)?;
        let participant_ids = decode("events", "participant_ids", &self.id, &self.participant_ids)?;
        let location = join_location("events", &self.id, self.lat, self.lon);
        Ok(Event {
            id: EventId::from(self.id),
            required_badges,
            category: self.category,
            location,
            participant_ids,
            organizer_id: VolunteerId::from(self.organizer_id),
        })
    }
}
