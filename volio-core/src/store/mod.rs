//! Data access traits for volunteer profiles and events.
//!
//! The `ProfileStore` trait defines a read-only interface for retrieving
//! [`VolunteerProfile`] and [`Event`] values by identifier, and for
//! enumerating candidates when building recommendations.

use std::sync::Arc;

use thiserror::Error;

use crate::{Event, EventId, VolunteerId, VolunteerProfile};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteDirectory, SqliteDirectoryError, write_directory};

/// Errors returned by [`ProfileStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No volunteer exists with the requested identifier.
    #[error("volunteer {id} was not found")]
    VolunteerNotFound {
        /// Requested identifier.
        id: VolunteerId,
    },
    /// No event exists with the requested identifier.
    #[error("event {id} was not found")]
    EventNotFound {
        /// Requested identifier.
        id: EventId,
    },
    /// The backing store failed.
    #[error("profile store failed: {source}")]
    Backend {
        /// Underlying storage error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wrap a storage-specific error.
    pub fn backend(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend {
            source: Box::new(source),
        }
    }

    /// Report whether the error signals a missing record.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::VolunteerNotFound { .. } | Self::EventNotFound { .. }
        )
    }
}

/// Read-only access to persisted volunteers and events.
///
/// Enumeration methods return records ordered by identifier so callers get
/// deterministic candidate lists.
///
/// # Examples
///
/// ```rust
/// use volio_core::{Event, EventId, ProfileStore, VolunteerId};
/// use volio_core::test_support::MemoryDirectory;
///
/// let store = MemoryDirectory::default()
///     .with_event(Event::new("evt-1", "Environment", "org-1"));
///
/// let event = store.event(&EventId::from("evt-1")).expect("stored event");
/// assert_eq!(event.category, "Environment");
/// assert!(store.volunteer(&VolunteerId::from("nobody")).is_err());
/// ```
pub trait ProfileStore: Send + Sync {
    /// Fetch a volunteer by identifier.
    ///
    /// Returns [`StoreError::VolunteerNotFound`] when no record exists.
    fn volunteer(&self, id: &VolunteerId) -> Result<VolunteerProfile, StoreError>;

    /// Fetch an event by identifier.
    ///
    /// Returns [`StoreError::EventNotFound`] when no record exists.
    fn event(&self, id: &EventId) -> Result<Event, StoreError>;

    /// Return every volunteer, ordered by identifier.
    fn volunteers(&self) -> Result<Vec<VolunteerProfile>, StoreError>;

    /// Return every event, ordered by identifier.
    fn events(&self) -> Result<Vec<Event>, StoreError>;
}

impl<T> ProfileStore for Arc<T>
where
    T: ProfileStore + ?Sized,
{
    fn volunteer(&self, id: &VolunteerId) -> Result<VolunteerProfile, StoreError> {
        self.as_ref().volunteer(id)
    }

    fn event(&self, id: &EventId) -> Result<Event, StoreError> {
        self.as_ref().event(id)
    }

    fn volunteers(&self) -> Result<Vec<VolunteerProfile>, StoreError> {
        self.as_ref().volunteers()
    }

    fn events(&self) -> Result<Vec<Event>, StoreError> {
        self.as_ref().events()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::test_support::MemoryDirectory;

    #[fixture]
    fn store() -> MemoryDirectory {
        MemoryDirectory::default()
            .with_volunteer(VolunteerProfile::new("vol-b"))
            .with_volunteer(VolunteerProfile::new("vol-a"))
            .with_event(Event::new("evt-2", "Education", "vol-a"))
            .with_event(Event::new("evt-1", "Environment", "vol-b"))
    }

    #[rstest]
    fn enumerations_are_ordered_by_id(store: MemoryDirectory) {
        let volunteers: Vec<String> = store
            .volunteers()
            .expect("list volunteers")
            .into_iter()
            .map(|v| v.id.into_inner())
            .collect();
        let events: Vec<String> = store
            .events()
            .expect("list events")
            .into_iter()
            .map(|e| e.id.into_inner())
            .collect();
        assert_eq!(volunteers, vec!["vol-a", "vol-b"]);
        assert_eq!(events, vec!["evt-1", "evt-2"]);
    }

    #[rstest]
    fn missing_records_report_not_found(store: MemoryDirectory) {
        let shared = Arc::new(store);
        let volunteer_err = shared
            .volunteer(&VolunteerId::from("ghost"))
            .expect_err("unknown volunteer");
        let event_err = shared
            .event(&EventId::from("ghost"))
            .expect_err("unknown event");
        assert!(volunteer_err.is_not_found());
        assert!(event_err.is_not_found());
        assert_eq!(event_err.to_string(), "event ghost was not found");
    }

    #[rstest]
    fn backend_errors_are_not_not_found() {
        let err = StoreError::backend(std::io::Error::other("disk on fire"));
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "profile store failed: disk on fire");
    }
}
