//! Store-backed scoring and recommendations by identifier.

use thiserror::Error;
use volio_core::{EventId, ProfileStore, SocialGraphLookup, StoreError, VolunteerId};

use crate::{
    MatchError, MatchResult, Ranking, RankingOptions, RecommendationRanker,
    scorer::{ensure_event_id, ensure_volunteer_id},
};

/// Errors returned by [`MatchService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Loading a profile or event failed, including unknown identifiers.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Scoring or ranking failed.
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Resolves identifiers through a [`ProfileStore`] before scoring.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use volio_core::{Event, VolunteerProfile};
/// use volio_core::test_support::MemoryDirectory;
/// use volio_match::{MatchService, RankingOptions};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let directory = Arc::new(
///     MemoryDirectory::default()
///         .with_volunteer(VolunteerProfile::new("vol-1").with_interest("Environment"))
///         .with_event(Event::new("evt-1", "Environment", "org-1"))
///         .with_event(Event::new("evt-2", "Education", "org-1")),
/// );
/// let service = MatchService::new(Arc::clone(&directory), directory);
///
/// let ranking = service
///     .recommend_events(&"vol-1".into(), &RankingOptions::default())
///     .await
///     .expect("ranking succeeds");
/// assert_eq!(ranking.ids().next().map(|id| id.as_str()), Some("evt-1"));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MatchService<S, L> {
    store: S,
    lookup: L,
    ranker: RecommendationRanker,
}

impl<S, L> MatchService<S, L>
where
    S: ProfileStore,
    L: SocialGraphLookup,
{
    /// Combine a store and a lookup with the default ranker.
    #[must_use]
    pub fn new(store: S, lookup: L) -> Self {
        Self {
            store,
            lookup,
            ranker: RecommendationRanker::default(),
        }
    }

    /// Replace the ranker (and therefore the scorer and fan-out bound).
    #[must_use]
    pub fn with_ranker(mut self, ranker: RecommendationRanker) -> Self {
        self.ranker = ranker;
        self
    }

    /// Ranker used for recommendations.
    #[must_use]
    pub const fn ranker(&self) -> &RecommendationRanker {
        &self.ranker
    }

    /// Score one volunteer against one event.
    ///
    /// # Errors
    /// Returns [`ServiceError::Match`] for empty ids or lookup failures, and
    /// [`ServiceError::Store`] when either record is missing or unreadable.
    pub async fn score_by_ids(
        &self,
        volunteer_id: &VolunteerId,
        event_id: &EventId,
    ) -> Result<MatchResult, ServiceError> {
        ensure_volunteer_id(volunteer_id)?;
        ensure_event_id(event_id)?;
        let volunteer = self.store.volunteer(volunteer_id)?;
        let event = self.store.event(event_id)?;
        Ok(self
            .ranker
            .scorer()
            .score(&volunteer, &event, &self.lookup)
            .await?)
    }

    /// Rank every stored event for a volunteer.
    ///
    /// # Errors
    /// See [`RecommendationRanker::rank_events`]; store failures surface as
    /// [`ServiceError::Store`].
    pub async fn recommend_events(
        &self,
        volunteer_id: &VolunteerId,
        options: &RankingOptions,
    ) -> Result<Ranking<EventId>, ServiceError> {
        ensure_volunteer_id(volunteer_id)?;
        let volunteer = self.store.volunteer(volunteer_id)?;
        let events = self.store.events()?;
        Ok(self
            .ranker
            .rank_events(&volunteer, &events, &self.lookup, options)
            .await?)
    }

    /// Rank every stored volunteer for an event.
    ///
    /// # Errors
    /// See [`RecommendationRanker::rank_volunteers`]; store failures surface
    /// as [`ServiceError::Store`].
    pub async fn recommend_volunteers(
        &self,
        event_id: &EventId,
        options: &RankingOptions,
    ) -> Result<Ranking<VolunteerId>, ServiceError> {
        ensure_event_id(event_id)?;
        let event = self.store.event(event_id)?;
        let volunteers = self.store.volunteers()?;
        Ok(self
            .ranker
            .rank_volunteers(&event, &volunteers, &self.lookup, options)
            .await?)
    }
}
