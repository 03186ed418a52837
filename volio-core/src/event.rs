//! Volunteering events and the volunteers involved in them.

use std::collections::BTreeSet;

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{EventId, VolunteerId, lat_lon};

/// A volunteering event that volunteers can join.
///
/// The event's `category` doubles as its single skill requirement. Online
/// events carry no location.
///
/// # Examples
/// ```
/// use volio_core::Event;
///
/// let event = Event::new("evt-1", "Environment", "org-1")
///     .with_required_badge("eco-warrior")
///     .with_location(43.25, 76.95)
///     .with_participant("vol-2");
///
/// assert!(!event.is_online());
/// assert!(event.has_participant(&"vol-2".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,
    /// Badges the organiser asks volunteers to hold.
    #[cfg_attr(feature = "serde", serde(default))]
    pub required_badges: BTreeSet<String>,
    /// Category tag, treated as the event's skill requirement.
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: String,
    /// Venue location (`x = longitude`, `y = latitude`); `None` when online.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<Coord<f64>>,
    /// Volunteers who already joined, in joining order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub participant_ids: Vec<VolunteerId>,
    /// Volunteer who owns the event.
    #[cfg_attr(feature = "serde", serde(default))]
    pub organizer_id: VolunteerId,
}

impl Event {
    /// Construct an online event with no required badges or participants.
    pub fn new(
        id: impl Into<EventId>,
        category: impl Into<String>,
        organizer_id: impl Into<VolunteerId>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            organizer_id: organizer_id.into(),
            ..Self::default()
        }
    }

    /// Add a required badge while returning `self` for chaining.
    #[must_use]
    pub fn with_required_badge(mut self, badge: impl Into<String>) -> Self {
        self.required_badges.insert(badge.into());
        self
    }

    /// Set the venue from latitude and longitude in degrees.
    #[must_use]
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(lat_lon(latitude, longitude));
        self
    }

    /// Append a participant while returning `self` for chaining.
    #[must_use]
    pub fn with_participant(mut self, volunteer: impl Into<VolunteerId>) -> Self {
        self.participant_ids.push(volunteer.into());
        self
    }

    /// Report whether the event has no physical venue.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.location.is_none()
    }

    /// Report whether `volunteer` already joined the event.
    #[must_use]
    pub fn has_participant(&self, volunteer: &VolunteerId) -> bool {
        self.participant_ids.contains(volunteer)
    }

    /// Report whether `volunteer` organises or already joined the event.
    #[must_use]
    pub fn involves(&self, volunteer: &VolunteerId) -> bool {
        self.organizer_id == *volunteer || self.has_participant(volunteer)
    }

    /// Return the distinct participant identifiers.
    #[must_use]
    pub fn participant_set(&self) -> BTreeSet<&VolunteerId> {
        self.participant_ids.iter().collect()
    }
}
