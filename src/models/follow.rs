// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::user::UserId;
use crate::schema::follows;

pub type EdgeId = i32;

/// Model for a directed "follower follows following" edge
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = follows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FollowEdge {
    pub id: EdgeId,
    pub follower_id: UserId,
    pub following_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a new follow edge
#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = follows)]
pub struct NewFollowEdge {
    pub follower_id: UserId,
    pub following_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Outcome of the atomic check-then-insert performed by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowInsert {
    Created(FollowEdge),
    AlreadyExists,
    LimitReached,
}

/// A follower or followed user with profile details
#[derive(Debug, Clone, Serialize)]
pub struct FollowDetail {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    /// Whether the viewer follows this user
    pub is_following: bool,
    /// When the edge was created
    pub followed_at: DateTime<Utc>,
    /// Edge id, usable as the list cursor
    pub edge_id: EdgeId,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowStats {
    pub user_id: UserId,
    pub followers_count: i64,
    pub following_count: i64,
}

/// Query parameters for paginating followers/following lists
#[derive(Debug, Default, Deserialize)]
pub struct FollowsQuery {
    pub limit: Option<usize>,
    pub cursor: Option<EdgeId>,
}
