// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::debug;

use super::{ok, ApiError, ApiResponse, ApiResult};
use crate::api::auth::Caller;
use crate::api::extract::{Path, Query};
use crate::api::AppState;
use crate::models::follow::{EdgeId, FollowDetail, FollowEdge, FollowStats, FollowsQuery};
use crate::models::user::UserId;
use crate::social::Page;

#[derive(Debug, Serialize)]
pub struct FollowStatus {
    pub user_id: UserId,
    pub following: bool,
}

/// Follow a traveler as the calling user
pub async fn follow_user(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(user_id): Path<UserId>,
) -> Result<(StatusCode, Json<ApiResponse<FollowEdge>>), ApiError> {
    let edge = state.service.follow(caller.as_ref(), user_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(edge))))
}

pub async fn unfollow_user(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(user_id): Path<UserId>,
) -> ApiResult<FollowStatus> {
    state.service.unfollow(caller.as_ref(), user_id).await?;
    ok(FollowStatus {
        user_id,
        following: false,
    })
}

pub async fn is_following(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(user_id): Path<UserId>,
) -> ApiResult<FollowStatus> {
    let following = state.service.is_following(caller.as_ref(), user_id).await?;
    ok(FollowStatus { user_id, following })
}

/// Get the travelers following a user
pub async fn get_followers(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(user_id): Path<UserId>,
    Query(query): Query<FollowsQuery>,
) -> ApiResult<Page<FollowDetail, EdgeId>> {
    debug!(
        "Getting followers for user {}, limit: {:?}, cursor: {:?}",
        user_id, query.limit, query.cursor
    );
    ok(state
        .service
        .list_followers(user_id, caller.as_ref(), &query)
        .await?)
}

/// Get the travelers a user follows
pub async fn get_following(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(user_id): Path<UserId>,
    Query(query): Query<FollowsQuery>,
) -> ApiResult<Page<FollowDetail, EdgeId>> {
    debug!(
        "Getting following for user {}, limit: {:?}, cursor: {:?}",
        user_id, query.limit, query.cursor
    );
    ok(state
        .service
        .list_following(user_id, caller.as_ref(), &query)
        .await?)
}

pub async fn get_follow_stats(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<FollowStats> {
    ok(state.service.follow_stats(user_id).await?)
}
