//! Serialisable bundle of volunteers, events, and friendships.
//!
//! A [`Dataset`] is the interchange format consumed by `volio import` and by
//! [`write_directory`](crate::store::write_directory).

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Event, VolunteerId, VolunteerProfile};

/// An unordered friendship between two volunteers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Friendship {
    /// One side of the friendship.
    pub a: VolunteerId,
    /// The other side of the friendship.
    pub b: VolunteerId,
}

impl Friendship {
    /// Pair two volunteers as friends.
    pub fn new(a: impl Into<VolunteerId>, b: impl Into<VolunteerId>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Report whether both sides name the same volunteer.
    #[must_use]
    pub fn is_self_link(&self) -> bool {
        self.a == self.b
    }
}

/// Volunteers, events, and the friend graph linking volunteers.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dataset {
    /// Volunteer profiles.
    #[cfg_attr(feature = "serde", serde(default))]
    pub volunteers: Vec<VolunteerProfile>,
    /// Events open for matching.
    #[cfg_attr(feature = "serde", serde(default))]
    pub events: Vec<Event>,
    /// Mutual friendships between volunteers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub friendships: Vec<Friendship>,
}

impl Dataset {
    /// Expand friendships into a symmetric adjacency map.
    ///
    /// Self-links are dropped; duplicate pairs collapse.
    ///
    /// # Examples
    /// ```
    /// use volio_core::{Dataset, Friendship, VolunteerId};
    ///
    /// let dataset = Dataset {
    ///     friendships: vec![Friendship::new("ana", "ben")],
    ///     ..Dataset::default()
    /// };
    /// let graph = dataset.friend_graph();
    /// assert!(graph[&VolunteerId::from("ben")].contains(&VolunteerId::from("ana")));
    /// ```
    #[must_use]
    pub fn friend_graph(&self) -> BTreeMap<VolunteerId, BTreeSet<VolunteerId>> {
        let mut graph: BTreeMap<VolunteerId, BTreeSet<VolunteerId>> = BTreeMap::new();
        for friendship in self.friendships.iter().filter(|f| !f.is_self_link()) {
            graph
                .entry(friendship.a.clone())
                .or_default()
                .insert(friendship.b.clone());
            graph
                .entry(friendship.b.clone())
                .or_default()
                .insert(friendship.a.clone());
        }
        graph
    }
}
