// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use super::SocialService;
use crate::error::SocialResult;
use crate::models::user::{User, UserId, Visibility};

/// Three-state profile gate.
///
/// `friends` admits the target's followers (an edge viewer -> target), not the
/// users the target follows.
pub fn profile_visible(target: &User, viewer: Option<UserId>, viewer_follows_target: bool) -> bool {
    let is_self = viewer == Some(target.id);
    match target.visibility {
        Visibility::Public => true,
        Visibility::Private => is_self,
        Visibility::Friends => is_self || (viewer.is_some() && viewer_follows_target),
    }
}

/// Feed rule: private authors never surface, whatever the relationship
pub fn feed_visible(author: &User) -> bool {
    author.visibility != Visibility::Private
}

impl SocialService {
    /// Apply the profile gate, consulting the follow graph only when it matters
    pub async fn can_view_profile(&self, target: &User, viewer: Option<&User>) -> SocialResult<bool> {
        let viewer_id = viewer.map(|v| v.id);
        let needs_edge = target.visibility == Visibility::Friends
            && viewer_id.is_some()
            && viewer_id != Some(target.id);

        let viewer_follows_target = match (needs_edge, viewer_id) {
            (true, Some(id)) => self.store.follow_exists(id, target.id).await?,
            _ => false,
        };

        Ok(profile_visible(target, viewer_id, viewer_follows_target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: UserId, visibility: Visibility) -> User {
        let now = Utc::now();
        User {
            id,
            auth_subject: format!("auth|{}", id),
            display_name: format!("user {}", id),
            avatar_url: None,
            bio: None,
            home_location: None,
            travel_styles: vec![],
            languages: vec![],
            visibility,
            role: None,
            role_updated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn public_is_visible_to_anonymous() {
        assert!(profile_visible(&user(1, Visibility::Public), None, false));
    }

    #[test]
    fn private_is_visible_only_to_self() {
        let target = user(1, Visibility::Private);
        assert!(profile_visible(&target, Some(1), false));
        assert!(!profile_visible(&target, Some(2), true));
        assert!(!profile_visible(&target, None, false));
    }

    #[test]
    fn friends_requires_viewer_to_follow_target() {
        let target = user(1, Visibility::Friends);
        assert!(profile_visible(&target, Some(1), false));
        assert!(profile_visible(&target, Some(2), true));
        assert!(!profile_visible(&target, Some(2), false));
        assert!(!profile_visible(&target, None, true));
    }

    #[test]
    fn feed_excludes_private_only() {
        assert!(feed_visible(&user(1, Visibility::Public)));
        assert!(feed_visible(&user(1, Visibility::Friends)));
        assert!(!feed_visible(&user(1, Visibility::Private)));
    }
}
