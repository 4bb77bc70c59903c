//! Platform facade
//!
//! Bundles one `UserRegistry` and one `VideoStore` into an explicit state object
//! and exposes the operations a presentation layer needs, returning plain-data
//! views instead of internal records.
//!
//! Every mutator validates all of its references before touching state, so a
//! failed call never leaves a partial change behind.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::config::FeedConfig;
use crate::error::{Error, Result};
use crate::social::feed::compute_feed_with_threshold;
use crate::social::{ReactionKind, User, UserId, UserRegistry, Video, VideoId, VideoStore};

/// Platform behind a single writer lock, for adapters that serve concurrent requests
pub type SharedPlatform = Arc<RwLock<Platform>>;

/// User as shown to adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub following: Vec<UserId>,
}

/// Video as shown to adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoView {
    pub id: VideoId,
    pub title: String,
    pub owner_id: UserId,
    pub owner_name: String,
    pub posted_at: String,
    pub reactions: BTreeMap<String, usize>,
    pub comments: Vec<String>,
}

#[derive(Debug)]
pub struct Platform {
    users: UserRegistry,
    videos: VideoStore,
    slow_feed_threshold: Duration,
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform {
    pub fn new() -> Self {
        Self::with_config(&FeedConfig::default())
    }

    pub fn with_config(config: &FeedConfig) -> Self {
        Self {
            users: UserRegistry::new(),
            videos: VideoStore::new(),
            slow_feed_threshold: config.slow_threshold,
        }
    }

    /// Wrap this platform for shared use
    pub fn into_shared(self) -> SharedPlatform {
        Arc::new(RwLock::new(self))
    }

    pub fn users(&self) -> &UserRegistry {
        &self.users
    }

    pub fn videos(&self) -> &VideoStore {
        &self.videos
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    #[instrument(skip(self, name))]
    pub fn create_user(&mut self, name: impl Into<String>) -> UserId {
        let id = self.users.create_user(name);
        info!(user_id = %id, "👤 User created");
        id
    }

    #[instrument(skip(self))]
    pub fn follow(&mut self, follower: UserId, followee: UserId) -> Result<()> {
        self.users.follow(follower, followee)?;
        info!(follower = %follower, followee = %followee, "User follow processed");
        Ok(())
    }

    #[instrument(skip(self, title))]
    pub fn post_video(&mut self, title: impl Into<String>, owner: UserId) -> Result<VideoId> {
        let id = self.videos.post_video(&self.users, title, owner)?;
        info!(video_id = %id, owner = %owner, "🎬 Video posted");
        Ok(id)
    }

    /// Raw store reaction. No visibility or registration checks.
    pub fn add_reaction(&mut self, video: VideoId, kind: &ReactionKind, user: UserId) -> Result<()> {
        kind.apply(&mut self.videos, video, user)
    }

    /// Raw store comment. `text` is stored verbatim.
    pub fn add_comment(&mut self, video: VideoId, text: impl Into<String>) -> Result<()> {
        self.videos.add_comment(video, text)
    }

    /// React as `user` to a video in that user's feed
    #[instrument(skip(self))]
    pub fn react(&mut self, user: UserId, video: VideoId, kind: &ReactionKind) -> Result<()> {
        self.ensure_visible(user, video)?;
        kind.apply(&mut self.videos, video, user)?;
        info!(user = %user, video_id = %video, kind = %kind, "Reaction recorded");
        Ok(())
    }

    /// Like a video in the user's feed
    pub fn like(&mut self, user: UserId, video: VideoId) -> Result<()> {
        self.react(user, video, &ReactionKind::LIKE)
    }

    /// Comment as `user` on a video in that user's feed.
    ///
    /// Stored as `"<name>: <text>"`.
    #[instrument(skip(self, text))]
    pub fn comment(&mut self, user: UserId, video: VideoId, text: &str) -> Result<()> {
        self.ensure_visible(user, video)?;
        let name = &self.users.get(user)?.name;
        let attributed = format!("{}: {}", name, text);
        self.videos.add_comment(video, attributed)?;
        info!(user = %user, video_id = %video, "💬 Comment recorded");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get_following(&self, user: UserId) -> Result<Vec<UserId>> {
        let mut following: Vec<UserId> = self.users.get_following(user)?.into_iter().collect();
        following.sort();
        Ok(following)
    }

    pub fn user(&self, user: UserId) -> Result<UserView> {
        self.users.get(user).map(user_view)
    }

    /// All users in registration order
    pub fn list_users(&self) -> Vec<UserView> {
        self.users.list().map(user_view).collect()
    }

    pub fn video(&self, video: VideoId) -> Result<VideoView> {
        self.view(self.videos.get(video)?)
    }

    /// All videos in posting order
    pub fn list_videos(&self) -> Result<Vec<VideoView>> {
        self.videos.list_all().iter().map(|v| self.view(v)).collect()
    }

    /// Feed for `user`, in posting order
    pub fn feed(&self, user: UserId) -> Result<Vec<VideoView>> {
        compute_feed_with_threshold(&self.users, &self.videos, user, self.slow_feed_threshold)?
            .into_iter()
            .map(|v| self.view(v))
            .collect()
    }

    fn ensure_visible(&self, user: UserId, video: VideoId) -> Result<()> {
        // Resolve the video first so a missing id reports as a missing video
        self.videos.get(video)?;
        let visible = compute_feed_with_threshold(
            &self.users,
            &self.videos,
            user,
            self.slow_feed_threshold,
        )?
        .iter()
        .any(|v| v.id == video);

        if visible {
            Ok(())
        } else {
            Err(Error::not_found("video in feed", video))
        }
    }

    fn view(&self, video: &Video) -> Result<VideoView> {
        let owner = self.users.get(video.owner)?;
        Ok(VideoView {
            id: video.id,
            title: video.title.clone(),
            owner_id: owner.id,
            owner_name: owner.name.clone(),
            posted_at: video.posted_at.to_rfc3339(),
            reactions: video.reaction_tally(),
            comments: video.comments().to_vec(),
        })
    }
}

fn user_view(user: &User) -> UserView {
    let mut following = user.following();
    following.sort();
    UserView {
        id: user.id,
        name: user.name.clone(),
        following,
    }
}
