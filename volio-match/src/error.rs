//! Error types raised while scoring and ranking matches.

use thiserror::Error;
use volio_core::LookupError;

/// Errors returned by [`MatchScorer`](crate::MatchScorer) and
/// [`RecommendationRanker`](crate::RecommendationRanker).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// A volunteer or event identifier was empty.
    #[error("{field} id must not be empty")]
    InvalidInput {
        /// Which identifier was rejected (`"volunteer"` or `"event"`).
        field: &'static str,
    },
    /// The social graph could not be read.
    #[error("social graph lookup failed: {source}")]
    LookupFailed {
        /// Source error from the lookup.
        #[from]
        source: LookupError,
    },
}

impl MatchError {
    /// Report whether retrying the same call might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::LookupFailed { .. })
    }
}

/// Errors raised when validating [`MatchWeights`](crate::MatchWeights).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    /// A single weight was negative, NaN, or infinite.
    #[error("{factor} weight must be finite and non-negative, got {value}")]
    InvalidWeight {
        /// Factor whose weight was rejected.
        factor: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The weights did not add up to one.
    #[error("weights must sum to 1.0, got {total}")]
    BadTotal {
        /// Sum of all weights.
        total: f64,
    },
}
