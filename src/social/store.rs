//! Video Store
//!
//! Owns every `Video` in posting order together with its engagement data.
//! Reactions are keyed by free-form kind label; the store does not know or
//! care which labels exist.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use super::ids::{IdSequence, UserId, VideoId};
use super::registry::UserRegistry;
use crate::error::{Error, Result};

/// A posted video
#[derive(Debug, Clone)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub owner: UserId,
    pub posted_at: DateTime<Utc>,
    reactions: BTreeMap<String, HashSet<UserId>>,
    comments: Vec<String>,
}

impl Video {
    fn new(id: VideoId, title: String, owner: UserId) -> Self {
        Self {
            id,
            title,
            owner,
            posted_at: Utc::now(),
            reactions: BTreeMap::new(),
            comments: Vec::new(),
        }
    }

    /// Users who reacted with `kind`, if anyone did
    pub fn reactors(&self, kind: &str) -> Option<&HashSet<UserId>> {
        self.reactions.get(kind)
    }

    pub fn reaction_count(&self, kind: &str) -> usize {
        self.reactions.get(kind).map_or(0, HashSet::len)
    }

    /// Count per reaction kind, ordered by label
    pub fn reaction_tally(&self) -> BTreeMap<String, usize> {
        self.reactions
            .iter()
            .map(|(kind, users)| (kind.clone(), users.len()))
            .collect()
    }

    /// Comments in the order they were added
    pub fn comments(&self) -> &[String] {
        &self.comments
    }
}

#[derive(Debug, Default)]
pub struct VideoStore {
    videos: Vec<Video>,
    index: HashMap<VideoId, usize>,
    ids: IdSequence,
}

impl VideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a new video owned by `owner`, who must be registered in `users`.
    pub fn post_video(
        &mut self,
        users: &UserRegistry,
        title: impl Into<String>,
        owner: UserId,
    ) -> Result<VideoId> {
        if !users.contains(owner) {
            return Err(Error::not_found("user", owner));
        }

        let id = VideoId(self.ids.allocate());
        let video = Video::new(id, title.into(), owner);
        debug!(video_id = %id, owner = %owner, title = %video.title, "Video posted");

        self.index.insert(id, self.videos.len());
        self.videos.push(video);
        Ok(id)
    }

    /// Record that `user` reacted to `video_id` with `kind`.
    ///
    /// Neither the user nor the kind is validated here. A repeated
    /// (kind, user) pair leaves the set unchanged.
    pub fn add_reaction(&mut self, video_id: VideoId, kind: &str, user: UserId) -> Result<()> {
        let video = self.get_mut(video_id)?;
        let added = video
            .reactions
            .entry(kind.to_string())
            .or_default()
            .insert(user);
        if added {
            debug!(video_id = %video_id, kind, user = %user, "Reaction added");
        }
        Ok(())
    }

    /// Append `text` verbatim to the video's comments
    pub fn add_comment(&mut self, video_id: VideoId, text: impl Into<String>) -> Result<()> {
        let video = self.get_mut(video_id)?;
        video.comments.push(text.into());
        debug!(video_id = %video_id, total = video.comments.len(), "Comment added");
        Ok(())
    }

    /// All videos in posting order
    pub fn list_all(&self) -> &[Video] {
        &self.videos
    }

    pub fn get(&self, video_id: VideoId) -> Result<&Video> {
        self.index
            .get(&video_id)
            .and_then(|&pos| self.videos.get(pos))
            .ok_or_else(|| Error::not_found("video", video_id))
    }

    fn get_mut(&mut self, video_id: VideoId) -> Result<&mut Video> {
        self.index
            .get(&video_id)
            .and_then(|&pos| self.videos.get_mut(pos))
            .ok_or_else(|| Error::not_found("video", video_id))
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}
