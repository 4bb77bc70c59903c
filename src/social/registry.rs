//! User Registry
//!
//! Owns every `User` record and its follow-set. Users are never removed and a
//! follow-set only grows.

use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::ids::{IdSequence, UserId};
use crate::error::{Error, Result};

/// A registered user
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    following: HashSet<UserId>,
}

impl User {
    fn new(id: UserId, name: String) -> Self {
        Self {
            id,
            name,
            following: HashSet::new(),
        }
    }

    /// Whether this user follows `other`
    pub fn follows(&self, other: UserId) -> bool {
        self.following.contains(&other)
    }

    /// Copy of the followed identifiers, in no particular order
    pub fn following(&self) -> Vec<UserId> {
        self.following.iter().copied().collect()
    }

    /// Number of users this user follows
    pub fn following_count(&self) -> usize {
        self.following.len()
    }
}

#[derive(Debug, Default)]
pub struct UserRegistry {
    users: BTreeMap<UserId, User>,
    ids: IdSequence,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user under the next sequential identifier. Never fails.
    pub fn create_user(&mut self, name: impl Into<String>) -> UserId {
        let id = UserId(self.ids.allocate());
        let user = User::new(id, name.into());
        debug!(user_id = %id, name = %user.name, "Registered user");
        self.users.insert(id, user);
        id
    }

    /// Make `follower` follow `followee`.
    ///
    /// Both must be registered. Self-follows and repeated follows are silent no-ops.
    pub fn follow(&mut self, follower: UserId, followee: UserId) -> Result<()> {
        if !self.users.contains_key(&followee) {
            return Err(Error::not_found("user", followee));
        }
        let user = self
            .users
            .get_mut(&follower)
            .ok_or_else(|| Error::not_found("user", follower))?;

        if follower == followee {
            return Ok(());
        }
        if user.following.insert(followee) {
            debug!(follower = %follower, followee = %followee, "Follow added");
        }
        Ok(())
    }

    /// Snapshot of the users `user_id` follows.
    ///
    /// The returned set is a copy; mutating it does not touch the registry.
    pub fn get_following(&self, user_id: UserId) -> Result<HashSet<UserId>> {
        self.get(user_id).map(|user| user.following.clone())
    }

    pub fn get(&self, user_id: UserId) -> Result<&User> {
        self.users
            .get(&user_id)
            .ok_or_else(|| Error::not_found("user", user_id))
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.users.contains_key(&user_id)
    }

    /// All users in registration order
    pub fn list(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
