//! Reaction Policy
//!
//! A reaction kind is only a label. New kinds need a new label, nothing else:
//! the store and the feed composer never branch on it.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

use super::ids::{UserId, VideoId};
use super::store::VideoStore;
use crate::error::{Error, Result};

pub const LIKE_LABEL: &str = "like";

/// A named category of engagement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReactionKind(Cow<'static, str>);

impl ReactionKind {
    pub const LIKE: ReactionKind = ReactionKind(Cow::Borrowed(LIKE_LABEL));
    pub const LOVE: ReactionKind = ReactionKind(Cow::Borrowed("love"));
    pub const HAHA: ReactionKind = ReactionKind(Cow::Borrowed("haha"));

    /// Build a kind from caller input. Blank labels are rejected and
    /// surrounding whitespace is dropped.
    pub fn new(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(Error::bad_request("reaction kind cannot be blank"));
        }
        Ok(Self(Cow::Owned(trimmed.to_string())))
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// Apply this reaction from `user` to `video`
    pub fn apply(&self, store: &mut VideoStore, video: VideoId, user: UserId) -> Result<()> {
        store.add_reaction(video, self.label(), user)
    }
}

impl Default for ReactionKind {
    fn default() -> Self {
        Self::LIKE
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::registry::UserRegistry;

    #[test]
    fn test_new_trims_and_rejects_blank() {
        assert_eq!(ReactionKind::new("  wow ").unwrap().label(), "wow");
        assert!(matches!(
            ReactionKind::new("   "),
            Err(Error::BadRequest { .. })
        ));
        assert_eq!(ReactionKind::new("like").unwrap(), ReactionKind::LIKE);
    }

    #[test]
    fn test_apply_forwards_to_store() {
        let mut users = UserRegistry::new();
        let alice = users.create_user("Alice");
        let bob = users.create_user("Bob");
        let mut store = VideoStore::new();
        let cats = store.post_video(&users, "Cats", alice).unwrap();

        ReactionKind::LIKE.apply(&mut store, cats, bob).unwrap();
        ReactionKind::LIKE.apply(&mut store, cats, bob).unwrap();
        ReactionKind::new("haha").unwrap().apply(&mut store, cats, bob).unwrap();

        let video = store.get(cats).unwrap();
        assert_eq!(video.reaction_count("like"), 1);
        assert_eq!(video.reaction_count(ReactionKind::HAHA.label()), 1);
    }

    #[test]
    fn test_apply_to_missing_video() {
        let mut store = VideoStore::new();
        let err = ReactionKind::LOVE
            .apply(&mut store, VideoId(3), UserId(1))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(ReactionKind::LIKE.to_string(), "like");
        assert_eq!(serde_json::to_string(&ReactionKind::LOVE).unwrap(), "\"love\"");
    }
}
