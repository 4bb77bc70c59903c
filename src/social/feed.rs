//! Feed Composer
//!
//! Stateless: every call recomputes the feed from the registry and store as
//! they are right now.

use std::time::Duration;
use tracing::debug;

use super::ids::UserId;
use super::metrics::PerformanceTimer;
use super::registry::UserRegistry;
use super::store::{Video, VideoStore};
use crate::error::Result;

pub const DEFAULT_SLOW_THRESHOLD_MS: u64 = 50;

/// Default slow-feed threshold used by `compute_feed`
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_millis(DEFAULT_SLOW_THRESHOLD_MS);

/// Videos visible to `user_id`, in posting order.
///
/// Visible means owned by `user_id` or by someone `user_id` follows.
/// Fails with `NotFound` when `user_id` is not registered.
pub fn compute_feed<'a>(
    users: &UserRegistry,
    videos: &'a VideoStore,
    user_id: UserId,
) -> Result<Vec<&'a Video>> {
    compute_feed_with_threshold(users, videos, user_id, DEFAULT_SLOW_THRESHOLD)
}

/// `compute_feed` with an explicit slow-log threshold
pub fn compute_feed_with_threshold<'a>(
    users: &UserRegistry,
    videos: &'a VideoStore,
    user_id: UserId,
    slow_threshold: Duration,
) -> Result<Vec<&'a Video>> {
    let _timer = PerformanceTimer::new("compute_feed", slow_threshold);

    let mut visible = users.get_following(user_id)?;
    visible.insert(user_id);

    let feed: Vec<&Video> = videos
        .list_all()
        .iter()
        .filter(|video| visible.contains(&video.owner))
        .collect();

    debug!(
        user_id = %user_id,
        sources = visible.len(),
        videos = feed.len(),
        "Feed composed"
    );

    Ok(feed)
}
