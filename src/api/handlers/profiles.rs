// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::State;
use serde::Deserialize;

use super::{ok, ApiResult};
use crate::api::auth::{Caller, Subject};
use crate::api::extract::{Json, Path};
use crate::api::AppState;
use crate::models::user::{ProfileUpdate, ProfileView, User, UserId};

#[derive(Debug, Deserialize)]
pub struct SyncUserRequest {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// First sign-in creates the user row; later calls return it as is
pub async fn sync_user(
    State(state): State<AppState>,
    Subject(subject): Subject,
    Json(request): Json<SyncUserRequest>,
) -> ApiResult<User> {
    ok(state
        .service
        .sync_user(subject.as_deref(), &request.display_name, request.avatar_url)
        .await?)
}

/// Get a profile; gated profiles come back as a restricted card
pub async fn get_profile(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(user_id): Path<UserId>,
) -> ApiResult<ProfileView> {
    ok(state.service.get_profile(user_id, caller.as_ref()).await?)
}

pub async fn update_my_profile(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<User> {
    ok(state.service.update_profile(caller.as_ref(), update).await?)
}
