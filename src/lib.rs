//! Facade crate for the Volio matching engine.
//!
//! This crate re-exports the core domain types and the Smart Match scorer,
//! and exposes the SQLite directory behind the `store-sqlite` feature.
//!
//! # Examples
//! ```
//! use volio_engine::{Event, MatchScorer, VolunteerProfile};
//! use std::collections::BTreeSet;
//!
//! let volunteer = VolunteerProfile::new("vol-1").with_interest("Education");
//! let event = Event::new("evt-1", "Education", "org-1");
//! let result = MatchScorer::new()
//!     .score_with_friends(&volunteer, &event, &BTreeSet::new())
//!     .expect("ids are present");
//! assert_eq!(result.score, 40);
//! ```

#![forbid(unsafe_code)]

pub use volio_core::{
    Dataset, Event, EventId, Friendship, LookupError, ProfileStore, SocialGraphLookup, StoreError,
    VolunteerId, VolunteerProfile,
};

#[cfg(feature = "store-sqlite")]
pub use volio_core::{SqliteDirectory, SqliteDirectoryError, write_directory};

pub use volio_match::{
    MatchError, MatchFactors, MatchResult, MatchScorer, MatchService, MatchWeights, Ranking,
    RankingOptions, RecommendationRanker, ServiceError, TimedLookup, WeightsError,
};
