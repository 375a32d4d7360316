// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use tracing::{debug, info};

use super::{now, SocialService};
use crate::error::{SocialError, SocialResult};
use crate::models::user::{NewUser, ProfileUpdate, User};

impl SocialService {
    /// Map the identity provider's subject to a user row.
    ///
    /// No subject, or a subject without a synced user, is an anonymous caller.
    pub async fn resolve_caller(&self, subject: Option<&str>) -> SocialResult<Option<User>> {
        let Some(subject) = subject.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        let user = self.store.user_by_subject(subject).await?;
        if user.is_none() {
            debug!("No user synced yet for presented subject");
        }
        Ok(user)
    }

    /// Create the caller's user row on first sign-in; later calls return it unchanged
    pub async fn sync_user(
        &self,
        subject: Option<&str>,
        display_name: &str,
        avatar_url: Option<String>,
    ) -> SocialResult<User> {
        let subject = subject
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(SocialError::Unauthenticated)?;

        if let Some(existing) = self.store.user_by_subject(subject).await? {
            return Ok(existing);
        }

        ProfileUpdate {
            display_name: Some(display_name.to_string()),
            ..Default::default()
        }
        .validate()
        .map_err(SocialError::InvalidInput)?;

        let user = self
            .store
            .create_user(NewUser::new(subject, display_name.trim(), avatar_url, now()))
            .await?;
        info!("Synced user {}", user.id);
        Ok(user)
    }
}
