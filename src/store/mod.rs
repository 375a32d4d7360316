// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

//! Storage seam for users, follow edges and activity records.
//!
//! Two logical indices exist over the edge set: by follower and by followed
//! user. Lists come back newest first, ties broken by descending id.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreResult;
use crate::models::activity::{ActivityRange, ActivityRecord, NewActivity};
use crate::models::follow::{FollowEdge, FollowInsert, NewFollowEdge};
use crate::models::user::{NewUser, ProfileUpdate, Role, User, UserId};

#[async_trait]
pub trait SocialStore: Send + Sync {
    /// Cheap liveness probe used by the health endpoint
    async fn ping(&self) -> StoreResult<()>;

    async fn user_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Indexed lookup by the identity provider's subject
    async fn user_by_subject(&self, subject: &str) -> StoreResult<Option<User>>;

    /// Insert a user, or return the existing row for the same subject
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<User>>;

    async fn set_role(&self, id: UserId, role: Role, now: DateTime<Utc>) -> StoreResult<Option<User>>;

    /// Atomically check the edge, check the follower's outgoing count against
    /// `max_follows` (when given) and insert.
    async fn insert_follow(
        &self,
        edge: NewFollowEdge,
        max_follows: Option<u32>,
    ) -> StoreResult<FollowInsert>;

    /// Returns whether an edge was removed
    async fn delete_follow(&self, follower_id: UserId, following_id: UserId) -> StoreResult<bool>;

    async fn follow_exists(&self, follower_id: UserId, following_id: UserId) -> StoreResult<bool>;

    /// Edges pointing at `user_id`
    async fn followers_of(&self, user_id: UserId) -> StoreResult<Vec<FollowEdge>>;

    /// Edges leaving `user_id`
    async fn following_of(&self, user_id: UserId) -> StoreResult<Vec<FollowEdge>>;

    async fn count_followers(&self, user_id: UserId) -> StoreResult<i64>;

    async fn count_following(&self, user_id: UserId) -> StoreResult<i64>;

    async fn insert_activity(&self, activity: NewActivity) -> StoreResult<ActivityRecord>;

    async fn activities_of(
        &self,
        user_id: UserId,
        range: ActivityRange,
    ) -> StoreResult<Vec<ActivityRecord>>;
}
