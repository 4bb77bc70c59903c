//! Social Module
//!
//! The in-memory social graph of ReelGraph: who is registered, who follows whom,
//! which videos exist and how people engaged with them.
//!
//! ## Architecture
//!
//! 1. **Registry** - Users and their directional follow-sets
//! 2. **Store** - Videos in posting order, with per-kind reaction sets and comments
//! 3. **Reaction** - Open set of reaction labels ("like", "love", ...)
//! 4. **Feed** - Pure composition of a user's feed from Registry + Store
//!
//! ## Feed Visibility
//!
//! A user sees their own videos plus videos from everyone they follow. Following is
//! not mutual, so a follower's videos never leak into the followee's feed.
//!
//! No state here is global. Callers own a `UserRegistry` and a `VideoStore` and pass
//! them by reference; see `crate::service::Platform` for the bundled form.

pub mod feed;
pub mod ids;
pub mod metrics;
pub mod reaction;
pub mod registry;
pub mod store;

pub use feed::compute_feed;
pub use ids::{UserId, VideoId};
pub use reaction::ReactionKind;
pub use registry::{User, UserRegistry};
pub use store::{Video, VideoStore};
