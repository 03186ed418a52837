//! Ranking candidates with the match scorer.
//!
//! Both directions are supported: events for one volunteer, and volunteers
//! for one event. Results are ordered by descending score with ties broken
//! by ascending candidate id, so output is deterministic.
//!
//! Partial failures are reported, not fatal. When ranking volunteers, each
//! candidate needs its own friend lookup; a candidate whose lookup fails is
//! left out of [`Ranking::matches`] and listed in [`Ranking::failures`]
//! instead, and the remaining candidates are still ranked.

use std::{fmt::Display, num::NonZeroUsize};

use futures_util::{StreamExt, stream};
use log::{debug, warn};
use serde::{Serialize, Serializer};
use volio_core::{Event, EventId, SocialGraphLookup, VolunteerId, VolunteerProfile};

use crate::{
    MatchError, MatchResult, MatchScorer,
    scorer::{ensure_event_id, ensure_volunteer_id},
};

/// Default bound on concurrent friend lookups when ranking volunteers.
pub const DEFAULT_MAX_IN_FLIGHT: NonZeroUsize = match NonZeroUsize::new(16) {
    Some(value) => value,
    None => NonZeroUsize::MIN,
};

/// Filters applied after scoring.
///
/// The default keeps every candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RankingOptions {
    /// Keep at most this many matches after sorting.
    pub limit: Option<usize>,
    /// Drop matches scoring below this value.
    pub min_score: u8,
    /// Omit pairs where the volunteer already organises or joined the event.
    pub skip_involved: bool,
}

impl RankingOptions {
    /// Keep at most `limit` matches.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Drop matches scoring below `min_score`.
    #[must_use]
    pub const fn with_min_score(mut self, min_score: u8) -> Self {
        self.min_score = min_score;
        self
    }

    /// Omit pairs where the volunteer already organises or joined the event.
    #[must_use]
    pub const fn skipping_involved(mut self) -> Self {
        self.skip_involved = true;
        self
    }
}

/// One scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch<Id> {
    /// Candidate identifier.
    pub id: Id,
    /// Score and factor breakdown.
    #[serde(flatten)]
    pub result: MatchResult,
}

/// A candidate that could not be scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingFailure<Id> {
    /// Candidate identifier.
    pub id: Id,
    /// Why the candidate was excluded.
    #[serde(serialize_with = "serialize_display")]
    pub error: MatchError,
}

/// Ordered matches plus any candidates that failed to score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking<Id> {
    /// Matches ordered by descending score, then ascending id.
    pub matches: Vec<RankedMatch<Id>>,
    /// Candidates excluded because scoring failed, ordered by id.
    pub failures: Vec<RankingFailure<Id>>,
}

impl<Id> Ranking<Id> {
    /// Report whether every candidate was scored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Identifiers of the ranked matches, best first.
    pub fn ids(&self) -> impl Iterator<Item = &Id> {
        self.matches.iter().map(|entry| &entry.id)
    }
}

/// Applies [`MatchScorer`] to collections of candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationRanker {
    scorer: MatchScorer,
    max_in_flight: NonZeroUsize,
}

impl Default for RecommendationRanker {
    fn default() -> Self {
        Self::new(MatchScorer::new())
    }
}

impl RecommendationRanker {
    /// Rank with `scorer`, allowing [`DEFAULT_MAX_IN_FLIGHT`] concurrent
    /// lookups.
    #[must_use]
    pub const fn new(scorer: MatchScorer) -> Self {
        Self {
            scorer,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Bound the number of concurrent friend lookups.
    #[must_use]
    pub const fn with_max_in_flight(mut self, max_in_flight: NonZeroUsize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Scorer applied to every candidate.
    #[must_use]
    pub const fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    /// Rank `events` for `volunteer`.
    ///
    /// The volunteer's friends are looked up once and shared by every event.
    /// Events with an empty id are reported as failures.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidInput`] when the volunteer id is empty and
    /// [`MatchError::LookupFailed`] when the single friend lookup fails, since
    /// no event can be scored without it.
    pub async fn rank_events<L>(
        &self,
        volunteer: &VolunteerProfile,
        events: &[Event],
        lookup: &L,
        options: &RankingOptions,
    ) -> Result<Ranking<EventId>, MatchError>
    where
        L: SocialGraphLookup + ?Sized,
    {
        ensure_volunteer_id(&volunteer.id)?;
        let friends = lookup.friends_of(&volunteer.id).await?;

        let mut matches = Vec::with_capacity(events.len());
        let mut failures = Vec::new();
        for event in events {
            if options.skip_involved && event.involves(&volunteer.id) {
                continue;
            }
            match self.scorer.score_with_friends(volunteer, event, &friends) {
                Ok(result) => matches.push(RankedMatch {
                    id: event.id.clone(),
                    result,
                }),
                Err(error) => failures.push(RankingFailure {
                    id: event.id.clone(),
                    error,
                }),
            }
        }

        debug!(
            "ranked {} events for volunteer {}",
            matches.len(),
            volunteer.id
        );
        Ok(finish(matches, failures, options))
    }

    /// Rank `volunteers` for `event`.
    ///
    /// Friend lookups run concurrently, bounded by the ranker's
    /// `max_in_flight`. Every lookup completes (or fails) before sorting.
    /// Candidates whose lookup fails, or whose id is empty, are excluded and
    /// reported in [`Ranking::failures`].
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidInput`] when the event id is empty.
    pub async fn rank_volunteers<L>(
        &self,
        event: &Event,
        volunteers: &[VolunteerProfile],
        lookup: &L,
        options: &RankingOptions,
    ) -> Result<Ranking<VolunteerId>, MatchError>
    where
        L: SocialGraphLookup + ?Sized,
    {
        ensure_event_id(&event.id)?;
        let scorer = self.scorer;
        let candidates = volunteers
            .iter()
            .filter(|volunteer| !(options.skip_involved && event.involves(&volunteer.id)));

        let outcomes: Vec<(&VolunteerProfile, Result<MatchResult, MatchError>)> =
            stream::iter(candidates)
                .map(|volunteer| async move {
                    (volunteer, scorer.score(volunteer, event, lookup).await)
                })
                .buffer_unordered(self.max_in_flight.get())
                .collect()
                .await;

        let mut matches = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (volunteer, outcome) in outcomes {
            match outcome {
                Ok(result) => matches.push(RankedMatch {
                    id: volunteer.id.clone(),
                    result,
                }),
                Err(error) => {
                    warn!(
                        "excluding volunteer {} from ranking for event {}: {error}",
                        volunteer.id, event.id
                    );
                    failures.push(RankingFailure {
                        id: volunteer.id.clone(),
                        error,
                    });
                }
            }
        }

        debug!(
            "ranked {} volunteers for event {} ({} excluded)",
            matches.len(),
            event.id,
            failures.len()
        );
        Ok(finish(matches, failures, options))
    }
}

fn finish<Id: Ord>(
    mut matches: Vec<RankedMatch<Id>>,
    mut failures: Vec<RankingFailure<Id>>,
    options: &RankingOptions,
) -> Ranking<Id> {
    matches.retain(|entry| entry.result.score >= options.min_score);
    matches.sort_by(|left, right| {
        right
            .result
            .score
            .cmp(&left.result.score)
            .then_with(|| left.id.cmp(&right.id))
    });
    if let Some(limit) = options.limit {
        matches.truncate(limit);
    }
    failures.sort_by(|left, right| left.id.cmp(&right.id));
    Ranking { matches, failures }
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
