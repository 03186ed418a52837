//! The Smart Match scorer.

use std::collections::BTreeSet;

use volio_core::{Event, EventId, SocialGraphLookup, VolunteerId, VolunteerProfile};

use crate::{MatchError, MatchFactors, MatchResult, MatchWeights, WeightsError};

/// Deterministic, explainable compatibility score between one volunteer and
/// one event.
///
/// Scoring mutates nothing. The only suspension point is the friend lookup
/// in [`MatchScorer::score`]; callers already holding the friend set use
/// [`MatchScorer::score_with_friends`].
///
/// # Examples
/// ```
/// use volio_core::{Event, VolunteerProfile};
/// use volio_core::test_support::MemoryDirectory;
/// use volio_match::MatchScorer;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let volunteer = VolunteerProfile::new("vol-1")
///     .with_badge("eco-warrior")
///     .with_interest("Environment")
///     .with_location(43.25, 76.95);
/// let event = Event::new("evt-1", "Environment", "org-1")
///     .with_required_badge("eco-warrior")
///     .with_required_badge("first-event")
///     .with_location(43.25, 76.95);
///
/// let result = MatchScorer::new()
///     .score(&volunteer, &event, &MemoryDirectory::default())
///     .await
///     .expect("lookup succeeds");
/// assert_eq!(result.score, 85);
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MatchScorer {
    weights: MatchWeights,
}

impl MatchScorer {
    /// Build a scorer with [`MatchWeights::DEFAULT`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            weights: MatchWeights::DEFAULT,
        }
    }

    /// Build a scorer with a custom weight set.
    ///
    /// # Errors
    /// Returns [`WeightsError`] when the weights fail
    /// [`MatchWeights::validate`].
    pub fn with_weights(weights: MatchWeights) -> Result<Self, WeightsError> {
        Ok(Self {
            weights: weights.validate()?,
        })
    }

    /// Weights used to combine factors.
    #[must_use]
    pub const fn weights(&self) -> MatchWeights {
        self.weights
    }

    /// Score `volunteer` against `event`, reading the volunteer's friends
    /// through `lookup`.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidInput`] when either id is empty (the
    /// lookup is not attempted), and [`MatchError::LookupFailed`] when the
    /// lookup fails. A failed lookup is never treated as "no friends".
    pub async fn score<L>(
        &self,
        volunteer: &VolunteerProfile,
        event: &Event,
        lookup: &L,
    ) -> Result<MatchResult, MatchError>
    where
        L: SocialGraphLookup + ?Sized,
    {
        ensure_ids(volunteer, event)?;
        let friends = lookup.friends_of(&volunteer.id).await?;
        Ok(self.combine(volunteer, event, &friends))
    }

    /// Score `volunteer` against `event` with an already resolved friend set.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidInput`] when either id is empty.
    pub fn score_with_friends(
        &self,
        volunteer: &VolunteerProfile,
        event: &Event,
        friends: &BTreeSet<VolunteerId>,
    ) -> Result<MatchResult, MatchError> {
        ensure_ids(volunteer, event)?;
        Ok(self.combine(volunteer, event, friends))
    }

    fn combine(
        &self,
        volunteer: &VolunteerProfile,
        event: &Event,
        friends: &BTreeSet<VolunteerId>,
    ) -> MatchResult {
        let factors = MatchFactors::compute(volunteer, event, friends);
        MatchResult::from_factors(factors, self.weights)
    }
}

pub(crate) fn ensure_volunteer_id(id: &VolunteerId) -> Result<(), MatchError> {
    if id.is_empty() {
        return Err(MatchError::InvalidInput { field: "volunteer" });
    }
    Ok(())
}

pub(crate) fn ensure_event_id(id: &EventId) -> Result<(), MatchError> {
    if id.is_empty() {
        return Err(MatchError::InvalidInput { field: "event" });
    }
    Ok(())
}

fn ensure_ids(volunteer: &VolunteerProfile, event: &Event) -> Result<(), MatchError> {
    ensure_volunteer_id(&volunteer.id)?;
    ensure_event_id(&event.id)
}
