//! Friend-graph lookups.
//!
//! The [`SocialGraphLookup`] trait abstracts the read that resolves a
//! volunteer's friends. It is the only suspension point of match scoring, so
//! it is asynchronous; implementations backed by local storage may complete
//! immediately.
//!
//! Failures must be reported as [`LookupError`] rather than an empty set, so
//! callers can tell "no friends" apart from "storage unavailable".

use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

use crate::VolunteerId;

/// Errors from [`SocialGraphLookup::friends_of`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The backing store could not be reached or returned an error.
    #[error("friend lookup for {volunteer} failed: {message}")]
    Unavailable {
        /// Volunteer whose friends were requested.
        volunteer: VolunteerId,
        /// Description of the underlying failure.
        message: String,
    },
    /// The lookup did not complete before its deadline.
    #[error("friend lookup for {volunteer} timed out after {timeout_ms} ms")]
    Timeout {
        /// Volunteer whose friends were requested.
        volunteer: VolunteerId,
        /// Deadline that elapsed, in milliseconds.
        timeout_ms: u64,
    },
}

impl LookupError {
    /// Build an [`LookupError::Unavailable`] from any displayable cause.
    pub fn unavailable(volunteer: &VolunteerId, cause: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            volunteer: volunteer.clone(),
            message: cause.to_string(),
        }
    }
}

/// Resolve the friends of a volunteer.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so lookups can be
/// fanned out concurrently. Unknown volunteers have no friends and yield an
/// empty set.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeSet;
/// use async_trait::async_trait;
/// use volio_core::{LookupError, SocialGraphLookup, VolunteerId};
///
/// struct Loner;
///
/// #[async_trait]
/// impl SocialGraphLookup for Loner {
///     async fn friends_of(
///         &self,
///         _volunteer: &VolunteerId,
///     ) -> Result<BTreeSet<VolunteerId>, LookupError> {
///         Ok(BTreeSet::new())
///     }
/// }
/// ```
#[async_trait]
pub trait SocialGraphLookup: Send + Sync {
    /// Return the set of friend identifiers for `volunteer`.
    async fn friends_of(&self, volunteer: &VolunteerId)
    -> Result<BTreeSet<VolunteerId>, LookupError>;
}

#[async_trait]
impl<T> SocialGraphLookup for Arc<T>
where
    T: SocialGraphLookup + ?Sized,
{
    async fn friends_of(
        &self,
        volunteer: &VolunteerId,
    ) -> Result<BTreeSet<VolunteerId>, LookupError> {
        self.as_ref().friends_of(volunteer).await
    }
}

#[async_trait]
impl<T> SocialGraphLookup for &T
where
    T: SocialGraphLookup + ?Sized,
{
    async fn friends_of(
        &self,
        volunteer: &VolunteerId,
    ) -> Result<BTreeSet<VolunteerId>, LookupError> {
        (**self).friends_of(volunteer).await
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::test_support::{FailingLookup, MemoryDirectory};

    #[rstest]
    #[tokio::test]
    async fn shared_lookups_delegate() {
        let directory = Arc::new(MemoryDirectory::default().with_friendship("ana", "ben"));
        let friends = directory
            .friends_of(&VolunteerId::from("ana"))
            .await
            .expect("lookup should succeed");
        assert!(friends.contains(&VolunteerId::from("ben")));
    }

    #[rstest]
    #[tokio::test]
    async fn failures_name_the_volunteer() {
        let lookup = FailingLookup::new("connection reset");
        let borrowed: &dyn SocialGraphLookup = &lookup;
        let err = borrowed
            .friends_of(&VolunteerId::from("ana"))
            .await
            .expect_err("lookup should fail");
        assert_eq!(
            err.to_string(),
            "friend lookup for ana failed: connection reset"
        );
    }
}
