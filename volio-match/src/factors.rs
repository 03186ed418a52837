//! The five match factors and their combination into a 0–100 score.
//!
//! Every factor is a ratio in `0.0..=1.0`. Missing optional data degrades a
//! factor to zero instead of failing, and non-finite intermediate values are
//! sanitised to zero.

use std::collections::BTreeSet;

use geo::{Distance, Haversine, Point};
use serde::Serialize;
use volio_core::{Event, VolunteerId, VolunteerProfile, is_valid_location};

use crate::MatchWeights;

/// Distance in metres at which the location factor reaches zero.
pub const PROXIMITY_RADIUS_M: f64 = 50_000.0;

/// Number of mutual participants at which the social factor saturates.
pub const SOCIAL_SATURATION: usize = 3;

/// Per-factor breakdown of a match, each value in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFactors {
    /// Share of the volunteer's showcased badges the event asks for.
    pub badge_match: f64,
    /// Share of the event's skill set (its category) the volunteer covers.
    pub skills_match: f64,
    /// Linear proximity between volunteer and venue.
    pub location_match: f64,
    /// Mutual participants relative to [`SOCIAL_SATURATION`].
    pub social_match: f64,
    /// One when the event category is among the volunteer's interests.
    pub interests_match: f64,
}

impl MatchFactors {
    /// Compute every factor for a volunteer, an event, and the volunteer's
    /// friends.
    #[must_use]
    pub fn compute(
        volunteer: &VolunteerProfile,
        event: &Event,
        friends: &BTreeSet<VolunteerId>,
    ) -> Self {
        Self {
            badge_match: badge_match(volunteer, event),
            skills_match: skills_match(volunteer, event),
            location_match: location_match(volunteer, event),
            social_match: social_match(friends, event),
            interests_match: interests_match(volunteer, event),
        }
    }

    /// Weighted sum of the factors, in `0.0..=1.0` for validated weights.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "combining factors is a weighted sum"
    )]
    pub fn weighted_sum(&self, weights: MatchWeights) -> f64 {
        self.badge_match * weights.badge
            + self.skills_match * weights.skills
            + self.location_match * weights.location
            + self.social_match * weights.social
            + self.interests_match * weights.interests
    }
}

/// Score and factor breakdown for one volunteer/event pair.
///
/// # Examples
/// ```
/// use volio_match::{MatchFactors, MatchResult, MatchWeights};
///
/// let factors = MatchFactors {
///     badge_match: 1.0,
///     skills_match: 1.0,
///     location_match: 1.0,
///     social_match: 0.0,
///     interests_match: 1.0,
/// };
/// let result = MatchResult::from_factors(factors, MatchWeights::DEFAULT);
/// assert_eq!(result.score, 85);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult {
    /// Overall compatibility in `0..=100`.
    pub score: u8,
    /// Factor values the score was built from.
    pub factors: MatchFactors,
}

impl MatchResult {
    /// Combine `factors` with `weights` into a rounded score.
    #[must_use]
    pub fn from_factors(factors: MatchFactors, weights: MatchWeights) -> Self {
        Self {
            score: to_percent(factors.weighted_sum(weights)),
            factors,
        }
    }
}

/// `|topBadges ∩ requiredBadges| / max(1, |topBadges|)`.
#[must_use]
pub fn badge_match(volunteer: &VolunteerProfile, event: &Event) -> f64 {
    let shared = volunteer
        .top_badges
        .intersection(&event.required_badges)
        .count();
    ratio(shared, volunteer.top_badges.len().max(1))
}

/// `|interests ∩ {category}| / max(1, |{category}|)`.
///
/// The event's skill set is the singleton holding its category, so this is
/// one when the volunteer lists the category and zero otherwise.
#[must_use]
pub fn skills_match(volunteer: &VolunteerProfile, event: &Event) -> f64 {
    let required = BTreeSet::from([event.category.as_str()]);
    let covered = required
        .iter()
        .filter(|skill| volunteer.is_interested_in(skill))
        .count();
    ratio(covered, required.len().max(1))
}

/// Proximity between the volunteer's home and the event venue.
///
/// Zero when either location is absent or unusable.
#[must_use]
pub fn location_match(volunteer: &VolunteerProfile, event: &Event) -> f64 {
    match (volunteer.location, event.location) {
        (Some(home), Some(venue)) if is_valid_location(home) && is_valid_location(venue) => {
            proximity(Haversine.distance(Point::from(home), Point::from(venue)))
        }
        _ => 0.0,
    }
}

/// Map a great-circle distance in metres onto `0.0..=1.0`.
///
/// Falls linearly from one at zero metres to zero at
/// [`PROXIMITY_RADIUS_M`] and stays at zero beyond it.
///
/// # Examples
/// ```
/// use volio_match::proximity;
///
/// assert_eq!(proximity(0.0), 1.0);
/// assert!((proximity(26_000.0) - 0.48).abs() < 1e-12);
/// assert_eq!(proximity(50_000.0), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "proximity decays linearly with distance"
)]
pub fn proximity(distance_m: f64) -> f64 {
    sanitise(1.0 - distance_m / PROXIMITY_RADIUS_M)
}

/// `min(1, |friends ∩ participants| / 3)`.
#[must_use]
pub fn social_match(friends: &BTreeSet<VolunteerId>, event: &Event) -> f64 {
    let mutual = event
        .participant_set()
        .into_iter()
        .filter(|participant| friends.contains(*participant))
        .count();
    ratio(mutual.min(SOCIAL_SATURATION), SOCIAL_SATURATION)
}

/// One when the event category is among the volunteer's interests.
#[must_use]
pub fn interests_match(volunteer: &VolunteerProfile, event: &Event) -> f64 {
    if volunteer.is_interested_in(&event.category) {
        1.0
    } else {
        0.0
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "factor ratios divide small set sizes"
)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    sanitise(numerator as f64 / denominator.max(1) as f64)
}

const fn sanitise(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the rounded percentage is clamped to 0..=100 before narrowing"
)]
fn to_percent(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    (raw * 100.0).round().clamp(0.0, 100.0) as u8
}
