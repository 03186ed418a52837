//! In-memory directory and lookup doubles used by unit tests, behaviour
//! tests, and benchmarks.

use std::collections::{BTreeMap, BTreeSet};
#[cfg(any(test, feature = "test-support"))]
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{
    Dataset, Event, EventId, LookupError, ProfileStore, SocialGraphLookup, StoreError, VolunteerId,
    VolunteerProfile,
};

/// In-memory [`ProfileStore`] and [`SocialGraphLookup`].
///
/// Friendships are mutual. The directory performs map lookups only and is
/// intended for small datasets.
#[derive(Default, Debug, Clone)]
pub struct MemoryDirectory {
    volunteers: BTreeMap<VolunteerId, VolunteerProfile>,
    events: BTreeMap<EventId, Event>,
    friends: BTreeMap<VolunteerId, BTreeSet<VolunteerId>>,
}

impl MemoryDirectory {
    /// Build a directory holding every record of `dataset`.
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            volunteers: dataset
                .volunteers
                .iter()
                .map(|v| (v.id.clone(), v.clone()))
                .collect(),
            events: dataset
                .events
                .iter()
                .map(|e| (e.id.clone(), e.clone()))
                .collect(),
            friends: dataset.friend_graph(),
        }
    }

    /// Add a volunteer while returning `self` for chaining.
    #[must_use]
    pub fn with_volunteer(mut self, volunteer: VolunteerProfile) -> Self {
        self.volunteers.insert(volunteer.id.clone(), volunteer);
        self
    }

    /// Add an event while returning `self` for chaining.
    #[must_use]
    pub fn with_event(mut self, event: Event) -> Self {
        self.events.insert(event.id.clone(), event);
        self
    }

    /// Record a mutual friendship while returning `self` for chaining.
    #[must_use]
    pub fn with_friendship(
        mut self,
        a: impl Into<VolunteerId>,
        b: impl Into<VolunteerId>,
    ) -> Self {
        let (left, right) = (a.into(), b.into());
        if left != right {
            self.friends
                .entry(left.clone())
                .or_default()
                .insert(right.clone());
            self.friends.entry(right).or_default().insert(left);
        }
        self
    }

    fn friends(&self, volunteer: &VolunteerId) -> BTreeSet<VolunteerId> {
        self.friends.get(volunteer).cloned().unwrap_or_default()
    }
}

impl ProfileStore for MemoryDirectory {
    fn volunteer(&self, id: &VolunteerId) -> Result<VolunteerProfile, StoreError> {
        self.volunteers
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::VolunteerNotFound { id: id.clone() })
    }

    fn event(&self, id: &EventId) -> Result<Event, StoreError> {
        self.events
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::EventNotFound { id: id.clone() })
    }

    fn volunteers(&self) -> Result<Vec<VolunteerProfile>, StoreError> {
        Ok(self.volunteers.values().cloned().collect())
    }

    fn events(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.events.values().cloned().collect())
    }
}

#[async_trait]
impl SocialGraphLookup for MemoryDirectory {
    async fn friends_of(
        &self,
        volunteer: &VolunteerId,
    ) -> Result<BTreeSet<VolunteerId>, LookupError> {
        Ok(self.friends(volunteer))
    }
}

/// `SocialGraphLookup` that fails, either always or for chosen volunteers.
///
/// Volunteers not targeted by the failure resolve through a fallback
/// [`MemoryDirectory`].
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
#[derive(Debug, Clone)]
pub struct FailingLookup {
    message: String,
    targets: Option<BTreeSet<VolunteerId>>,
    fallback: MemoryDirectory,
}

#[cfg(any(test, feature = "test-support"))]
impl FailingLookup {
    /// Fail every lookup with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            targets: None,
            fallback: MemoryDirectory::default(),
        }
    }

    /// Restrict failures to `volunteer` (may be chained).
    #[must_use]
    pub fn only_for(mut self, volunteer: impl Into<VolunteerId>) -> Self {
        self.targets
            .get_or_insert_with(BTreeSet::new)
            .insert(volunteer.into());
        self
    }

    /// Resolve non-failing lookups through `directory`.
    #[must_use]
    pub fn with_fallback(mut self, directory: MemoryDirectory) -> Self {
        self.fallback = directory;
        self
    }

    fn fails_for(&self, volunteer: &VolunteerId) -> bool {
        self.targets
            .as_ref()
            .is_none_or(|targets| targets.contains(volunteer))
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl SocialGraphLookup for FailingLookup {
    async fn friends_of(
        &self,
        volunteer: &VolunteerId,
    ) -> Result<BTreeSet<VolunteerId>, LookupError> {
        if self.fails_for(volunteer) {
            return Err(LookupError::unavailable(volunteer, &self.message));
        }
        Ok(self.fallback.friends(volunteer))
    }
}

/// `SocialGraphLookup` wrapper that counts calls to the inner lookup.
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
#[derive(Debug, Default)]
pub struct CountingLookup<L> {
    inner: L,
    calls: AtomicUsize,
}

#[cfg(any(test, feature = "test-support"))]
impl<L> CountingLookup<L> {
    /// Wrap `inner` with a zeroed call counter.
    pub const fn new(inner: L) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups performed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl<L: SocialGraphLookup> SocialGraphLookup for CountingLookup<L> {
    async fn friends_of(
        &self,
        volunteer: &VolunteerId,
    ) -> Result<BTreeSet<VolunteerId>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.friends_of(volunteer).await
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn targeted_failures_leave_other_volunteers_alone() {
        let lookup = FailingLookup::new("replica lagging")
            .only_for("ana")
            .with_fallback(MemoryDirectory::default().with_friendship("ben", "cai"));

        let ana = lookup.friends_of(&VolunteerId::from("ana")).await;
        let ben = lookup
            .friends_of(&VolunteerId::from("ben"))
            .await
            .expect("ben resolves through the fallback");

        assert!(matches!(ana, Err(LookupError::Unavailable { .. })));
        assert!(ben.contains(&VolunteerId::from("cai")));
    }

    #[rstest]
    #[tokio::test]
    async fn counting_lookup_records_calls() {
        let lookup = CountingLookup::new(MemoryDirectory::default());
        for _ in 0..3 {
            lookup
                .friends_of(&VolunteerId::from("ana"))
                .await
                .expect("lookup succeeds");
        }
        assert_eq!(lookup.calls(), 3);
    }

    #[rstest]
    fn self_friendships_are_ignored() {
        let directory = MemoryDirectory::default().with_friendship("ana", "ana");
        assert!(directory.friends(&VolunteerId::from("ana")).is_empty());
    }
}
