// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use tracing::info;

use super::{now, require_caller, SocialService};
use crate::error::{SocialError, SocialResult};
use crate::models::user::{ProfileUpdate, ProfileView, User, UserId};

impl SocialService {
    /// Full profile when the gate admits the viewer, the public card otherwise
    pub async fn get_profile(&self, target_id: UserId, viewer: Option<&User>) -> SocialResult<ProfileView> {
        let target = self
            .store
            .user_by_id(target_id)
            .await?
            .ok_or(SocialError::NotFound("User"))?;

        let visible = self.can_view_profile(&target, viewer).await?;
        Ok(ProfileView::new(&target, visible))
    }

    pub async fn update_profile(&self, caller: Option<&User>, update: ProfileUpdate) -> SocialResult<User> {
        let caller = require_caller(caller)?;
        update.validate().map_err(SocialError::InvalidInput)?;

        let updated = self
            .store
            .update_profile(caller.id, &update, now())
            .await?
            .ok_or(SocialError::NotFound("User"))?;

        if let Some(visibility) = update.visibility {
            info!("User {} set visibility to {}", caller.id, visibility.as_str());
        }
        Ok(updated)
    }
}
