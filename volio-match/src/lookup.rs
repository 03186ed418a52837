//! Deadline adapter for friend lookups.

use std::{collections::BTreeSet, time::Duration};

use async_trait::async_trait;
use volio_core::{LookupError, SocialGraphLookup, VolunteerId};

/// Wraps a [`SocialGraphLookup`] with a per-call deadline.
///
/// When the inner lookup does not finish in time its future is dropped and
/// [`LookupError::Timeout`] is returned. Must run inside a Tokio runtime with
/// the time driver enabled.
#[derive(Debug, Clone)]
pub struct TimedLookup<L> {
    inner: L,
    timeout: Duration,
}

impl<L> TimedLookup<L> {
    /// Apply `timeout` to every call made through `inner`.
    pub const fn new(inner: L, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Deadline applied to each lookup.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

#[async_trait]
impl<L> SocialGraphLookup for TimedLookup<L>
where
    L: SocialGraphLookup,
{
    async fn friends_of(
        &self,
        volunteer: &VolunteerId,
    ) -> Result<BTreeSet<VolunteerId>, LookupError> {
        tokio::time::timeout(self.timeout, self.inner.friends_of(volunteer))
            .await
            .map_err(|_| LookupError::Timeout {
                volunteer: volunteer.clone(),
                timeout_ms: self.timeout_ms(),
            })?
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use volio_core::test_support::MemoryDirectory;

    use super::*;

    struct StalledLookup;

    #[async_trait]
    impl SocialGraphLookup for StalledLookup {
        async fn friends_of(
            &self,
            _volunteer: &VolunteerId,
        ) -> Result<BTreeSet<VolunteerId>, LookupError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(BTreeSet::new())
        }
    }

    #[rstest]
    #[tokio::test]
    async fn slow_lookups_time_out() {
        let lookup = TimedLookup::new(StalledLookup, Duration::from_millis(20));
        let err = lookup
            .friends_of(&VolunteerId::from("ana"))
            .await
            .expect_err("lookup should time out");
        assert_eq!(
            err,
            LookupError::Timeout {
                volunteer: VolunteerId::from("ana"),
                timeout_ms: 20,
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn fast_lookups_pass_through() {
        let directory = MemoryDirectory::default().with_friendship("ana", "ben");
        let lookup = TimedLookup::new(directory, Duration::from_secs(1));
        let friends = lookup
            .friends_of(&VolunteerId::from("ana"))
            .await
            .expect("lookup succeeds");
        assert!(friends.contains(&VolunteerId::from("ben")));
    }
}
