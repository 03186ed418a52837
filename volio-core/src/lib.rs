//! Core domain types for the Volio matching engine.
//!
//! This crate holds the volunteer and event models, the friend-graph lookup
//! seam, and the profile store abstraction with its optional SQLite backend.
//! Scoring lives in `volio-match`; this crate performs no scoring itself.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod dataset;
mod event;
mod ids;
mod location;
mod social;
pub mod store;
#[doc(hidden)]
pub mod test_support;
mod volunteer;

pub use dataset::{Dataset, Friendship};
pub use event::Event;
pub use ids::{EventId, VolunteerId};
pub use location::{is_valid_location, lat_lon};
pub use social::{LookupError, SocialGraphLookup};
pub use store::{ProfileStore, StoreError};
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteDirectory, SqliteDirectoryError, write_directory};
pub use volunteer::VolunteerProfile;
