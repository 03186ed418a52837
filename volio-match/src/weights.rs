//! Static factor weights.

use serde::Serialize;

use crate::WeightsError;

const TOTAL_TOLERANCE: f64 = 1e-9;

/// Relative importance of each match factor.
///
/// Weights are a tunable constant set rather than something learnt from
/// data. Any custom set must be finite, non-negative, and sum to one so
/// that scores stay within `0..=100`.
///
/// # Examples
/// ```
/// use volio_match::MatchWeights;
///
/// let weights = MatchWeights::default();
/// assert!((weights.total() - 1.0).abs() < 1e-9);
/// assert!(weights.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchWeights {
    /// Weight of the badge overlap factor.
    pub badge: f64,
    /// Weight of the skill overlap factor.
    pub skills: f64,
    /// Weight of the geographic proximity factor.
    pub location: f64,
    /// Weight of the mutual friend factor.
    pub social: f64,
    /// Weight of the interest overlap factor.
    pub interests: f64,
}

impl MatchWeights {
    /// The production weight set.
    pub const DEFAULT: Self = Self {
        badge: 0.30,
        skills: 0.25,
        location: 0.15,
        social: 0.15,
        interests: 0.15,
    };

    /// Return the weights paired with their factor names.
    #[must_use]
    pub const fn named(self) -> [(&'static str, f64); 5] {
        [
            ("badge", self.badge),
            ("skills", self.skills),
            ("location", self.location),
            ("social", self.social),
            ("interests", self.interests),
        ]
    }

    /// Sum of all weights.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the total is a plain sum of the weights"
    )]
    pub fn total(self) -> f64 {
        self.badge + self.skills + self.location + self.social + self.interests
    }

    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`WeightsError::InvalidWeight`] for the first weight that is
    /// negative or not finite, and [`WeightsError::BadTotal`] when the sum
    /// differs from one by more than `1e-9`.
    #[expect(
        clippy::float_arithmetic,
        reason = "validation compares the total against one"
    )]
    pub fn validate(self) -> Result<Self, WeightsError> {
        if let Some((factor, value)) = self
            .named()
            .into_iter()
            .find(|(_, weight)| !weight.is_finite() || *weight < 0.0)
        {
            return Err(WeightsError::InvalidWeight { factor, value });
        }
        let total = self.total();
        if (total - 1.0).abs() > TOTAL_TOLERANCE {
            return Err(WeightsError::BadTotal { total });
        }
        Ok(self)
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}
