//! Volunteer profiles as seen by the matching engine.

use std::collections::BTreeSet;

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{VolunteerId, lat_lon};

/// A volunteer as seen by the matching engine.
///
/// Badges and interests are free-form tags. Missing optional data is
/// represented by empty sets or `None` and never treated as an error.
///
/// # Examples
/// ```
/// use volio_core::VolunteerProfile;
///
/// let volunteer = VolunteerProfile::new("vol-1")
///     .with_badge("eco-warrior")
///     .with_interest("Environment")
///     .with_location(43.25, 76.95);
///
/// assert!(volunteer.top_badges.contains("eco-warrior"));
/// assert!(volunteer.is_interested_in("Environment"));
/// assert!(volunteer.location.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolunteerProfile {
    /// Unique identifier.
    pub id: VolunteerId,
    /// Badges the volunteer chose to showcase.
    #[cfg_attr(feature = "serde", serde(default))]
    pub top_badges: BTreeSet<String>,
    /// Event categories the volunteer cares about.
    #[cfg_attr(feature = "serde", serde(default))]
    pub interests: BTreeSet<String>,
    /// Home location (`x = longitude`, `y = latitude`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<Coord<f64>>,
}

impl VolunteerProfile {
    /// Construct a profile with no badges, interests, or location.
    pub fn new(id: impl Into<VolunteerId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Add a showcased badge while returning `self` for chaining.
    #[must_use]
    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.top_badges.insert(badge.into());
        self
    }

    /// Add an interest category while returning `self` for chaining.
    #[must_use]
    pub fn with_interest(mut self, category: impl Into<String>) -> Self {
        self.interests.insert(category.into());
        self
    }

    /// Set the location from latitude and longitude in degrees.
    #[must_use]
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(lat_lon(latitude, longitude));
        self
    }

    /// Report whether `category` is one of the volunteer's interests.
    #[must_use]
    pub fn is_interested_in(&self, category: &str) -> bool {
        self.interests.contains(category)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn new_profile_is_empty() {
        let volunteer = VolunteerProfile::new("vol-1");
        assert_eq!(volunteer.id.as_str(), "vol-1");
        assert!(volunteer.top_badges.is_empty());
        assert!(volunteer.interests.is_empty());
        assert!(volunteer.location.is_none());
    }

    #[rstest]
    fn duplicate_badges_collapse() {
        let volunteer = VolunteerProfile::new("vol-1")
            .with_badge("first-event")
            .with_badge("first-event");
        assert_eq!(volunteer.top_badges.len(), 1);
    }

    #[rstest]
    fn location_is_stored_as_lon_lat() {
        let volunteer = VolunteerProfile::new("vol-1").with_location(51.5, -0.1);
        let location = volunteer.location.expect("location set");
        assert_eq!(location.x, -0.1);
        assert_eq!(location.y, 51.5);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn missing_optional_fields_deserialize_as_empty() {
        let volunteer: VolunteerProfile =
            serde_json::from_str(r#"{"id":"vol-1"}"#).expect("decode profile");
        assert_eq!(volunteer, VolunteerProfile::new("vol-1"));
    }
}
