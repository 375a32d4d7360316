// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::State;

use super::{ok, ApiResult, LimitQuery};
use crate::api::auth::Caller;
use crate::api::extract::{Path, Query};
use crate::api::AppState;
use crate::models::activity::{FeedActivity, FeedPage, FeedQuery};
use crate::models::user::UserId;

/// Activity of everyone the caller follows, newest first
pub async fn get_feed(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(query): Query<FeedQuery>,
) -> ApiResult<FeedPage> {
    ok(state
        .service
        .get_feed(caller.as_ref(), query.limit, query.cursor)
        .await?)
}

pub async fn get_user_activities(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(user_id): Path<UserId>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Vec<FeedActivity>> {
    ok(state
        .service
        .get_user_activities(user_id, caller.as_ref(), query.limit)
        .await?)
}
