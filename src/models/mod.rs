// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

pub mod activity;
pub mod follow;
pub mod user;

pub use activity::{ActivityDetails, ActivityRecord, ActivityType, FeedActivity, FeedPage};
pub use follow::{FollowDetail, FollowEdge, FollowStats};
pub use user::{ProfileUpdate, ProfileView, Role, User, UserId, Visibility};
