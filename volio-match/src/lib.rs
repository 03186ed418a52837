//! Smart Match scoring and recommendations for Volio.
//!
//! The crate scores how well a volunteer fits an event from five
//! static-weighted factors:
//!
//! | Factor | Weight | Definition |
//! |---|---|---|
//! | badge | 0.30 | shared badges / showcased badges |
//! | skills | 0.25 | category covered by interests |
//! | location | 0.15 | `max(0, 1 - d / 50 km)` |
//! | social | 0.15 | `min(1, mutual participants / 3)` |
//! | interests | 0.15 | category among interests |
//!
//! The score is `round(100 × Σ factor × weight)`, clamped to `0..=100`.
//!
//! - [`MatchScorer`] scores one pair, reading friends through a
//!   [`SocialGraphLookup`](volio_core::SocialGraphLookup).
//! - [`RecommendationRanker`] orders candidate events or volunteers.
//! - [`MatchService`] resolves identifiers through a
//!   [`ProfileStore`](volio_core::ProfileStore) first.
//! - [`TimedLookup`] bounds how long a friend lookup may take.

#![forbid(unsafe_code)]

mod error;
mod factors;
mod lookup;
mod ranker;
mod scorer;
mod service;
mod weights;

pub use error::{MatchError, WeightsError};
pub use factors::{
    MatchFactors, MatchResult, PROXIMITY_RADIUS_M, SOCIAL_SATURATION, badge_match,
    interests_match, location_match, proximity, skills_match, social_match,
};
pub use lookup::TimedLookup;
pub use ranker::{
    DEFAULT_MAX_IN_FLIGHT, RankedMatch, Ranking, RankingFailure, RankingOptions,
    RecommendationRanker,
};
pub use scorer::MatchScorer;
pub use service::{MatchService, ServiceError};
pub use weights::MatchWeights;
