//! Opaque identifiers for volunteers and events.
//!
//! Identifiers are free-form strings issued by the surrounding application.
//! They are ordered lexically so rankings can break ties deterministically.

use std::{borrow::Borrow, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Report whether the identifier is the empty string.
            ///
            /// Whitespace is significant: `" "` is a valid, non-empty id.
            #[must_use]
            pub const fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consume the wrapper and return the raw identifier.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Identifier of a volunteer account.
    ///
    /// # Examples
    /// ```
    /// use volio_core::VolunteerId;
    ///
    /// let id = VolunteerId::from("vol-1");
    /// assert_eq!(id.as_str(), "vol-1");
    /// assert!(!id.is_empty());
    /// ```
    VolunteerId
);

opaque_id!(
    /// Identifier of an event.
    ///
    /// # Examples
    /// ```
    /// use volio_core::EventId;
    ///
    /// assert!(EventId::from("").is_empty());
    /// assert!(!EventId::from("  ").is_empty());
    /// ```
    EventId
);

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", true)]
    #[case("   ", false)]
    #[case("\t\n", false)]
    #[case("vol-1", false)]
    fn empty_detection_keeps_whitespace(#[case] raw: &str, #[case] empty: bool) {
        assert_eq!(VolunteerId::from(raw).is_empty(), empty);
        assert_eq!(EventId::from(raw).is_empty(), empty);
    }

    #[rstest]
    fn ids_order_lexically() {
        let ids: BTreeSet<VolunteerId> = ["carol", "alice", "bob"]
            .into_iter()
            .map(VolunteerId::from)
            .collect();
        let ordered: Vec<&str> = ids.iter().map(VolunteerId::as_str).collect();
        assert_eq!(ordered, vec!["alice", "bob", "carol"]);
    }

    #[rstest]
    fn display_matches_raw_value() {
        assert_eq!(EventId::from("evt-9").to_string(), "evt-9");
    }
}
