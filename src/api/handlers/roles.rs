// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::State;
use serde::Deserialize;

use super::{ok, ApiResult};
use crate::api::auth::Caller;
use crate::api::extract::{Json, Path};
use crate::api::AppState;
use crate::models::user::{Role, User, UserId};
use crate::social::RoleSummary;

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

/// The caller's role and permissions; anonymous callers see the free tier
pub async fn get_my_role(State(state): State<AppState>, Caller(caller): Caller) -> ApiResult<RoleSummary> {
    ok(state.service.current_role(caller.as_ref()))
}

pub async fn set_user_role(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(user_id): Path<UserId>,
    Json(request): Json<SetRoleRequest>,
) -> ApiResult<User> {
    ok(state
        .service
        .set_user_role(caller.as_ref(), user_id, request.role)
        .await?)
}
