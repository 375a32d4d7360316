// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use futures::future::try_join_all;
use tracing::{debug, info};

use super::pagination::{clamp_limit, resume_after, take_page, Page};
use super::{now, require_caller, SocialService};
use crate::error::{InvalidOperation, LimitKind, SocialError, SocialResult, StoreResult};
use crate::metrics;
use crate::models::follow::{
    EdgeId, FollowDetail, FollowEdge, FollowInsert, FollowStats, FollowsQuery, NewFollowEdge,
};
use crate::models::user::{User, UserId};
use crate::permissions::Capability;

/// Which side of the edge set a list walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Followers,
    Following,
}

impl Direction {
    /// The user on the far side of `edge` from the listed profile
    fn other_end(self, edge: &FollowEdge) -> UserId {
        match self {
            Direction::Followers => edge.follower_id,
            Direction::Following => edge.following_id,
        }
    }
}

impl SocialService {
    pub async fn follow(&self, caller: Option<&User>, target_id: UserId) -> SocialResult<FollowEdge> {
        let caller = require_caller(caller)?;

        if caller.id == target_id {
            return Err(SocialError::InvalidOperation(InvalidOperation::SelfFollow));
        }

        if self.store.user_by_id(target_id).await?.is_none() {
            return Err(SocialError::NotFound("User"));
        }

        let max_follows = (!self
            .permissions
            .grants(caller.role, Capability::UnlimitedFollows))
        .then(|| self.permissions.limits().max_follows);

        let edge = NewFollowEdge {
            follower_id: caller.id,
            following_id: target_id,
            created_at: now(),
        };

        match self.store.insert_follow(edge, max_follows).await? {
            FollowInsert::Created(edge) => {
                metrics::follow_created();
                info!("User {} followed {}", caller.id, target_id);
                Ok(edge)
            }
            FollowInsert::AlreadyExists => {
                debug!("User {} already follows {}", caller.id, target_id);
                Err(SocialError::InvalidOperation(InvalidOperation::AlreadyFollowing))
            }
            FollowInsert::LimitReached => Err(SocialError::LimitExceeded {
                kind: LimitKind::Follows,
                max: max_follows.unwrap_or_default(),
            }),
        }
    }

    pub async fn unfollow(&self, caller: Option<&User>, target_id: UserId) -> SocialResult<()> {
        let caller = require_caller(caller)?;

        if !self.store.delete_follow(caller.id, target_id).await? {
            return Err(SocialError::InvalidOperation(InvalidOperation::NotFollowing));
        }

        metrics::follow_removed();
        info!("User {} unfollowed {}", caller.id, target_id);
        Ok(())
    }

    /// False for anonymous callers
    pub async fn is_following(&self, caller: Option<&User>, target_id: UserId) -> SocialResult<bool> {
        Ok(self.viewer_follows(caller, target_id).await?)
    }

    pub async fn list_followers(
        &self,
        target_id: UserId,
        viewer: Option<&User>,
        query: &FollowsQuery,
    ) -> SocialResult<Page<FollowDetail, EdgeId>> {
        self.list_edges(target_id, viewer, query, Direction::Followers)
            .await
    }

    pub async fn list_following(
        &self,
        target_id: UserId,
        viewer: Option<&User>,
        query: &FollowsQuery,
    ) -> SocialResult<Page<FollowDetail, EdgeId>> {
        self.list_edges(target_id, viewer, query, Direction::Following)
            .await
    }

    pub async fn follow_stats(&self, target_id: UserId) -> SocialResult<FollowStats> {
        if self.store.user_by_id(target_id).await?.is_none() {
            return Err(SocialError::NotFound("User"));
        }

        let (followers_count, following_count) = futures::try_join!(
            self.store.count_followers(target_id),
            self.store.count_following(target_id),
        )?;

        Ok(FollowStats {
            user_id: target_id,
            followers_count,
            following_count,
        })
    }

    async fn list_edges(
        &self,
        target_id: UserId,
        viewer: Option<&User>,
        query: &FollowsQuery,
        direction: Direction,
    ) -> SocialResult<Page<FollowDetail, EdgeId>> {
        let target = self
            .store
            .user_by_id(target_id)
            .await?
            .ok_or(SocialError::NotFound("User"))?;

        if !self.can_view_profile(&target, viewer).await? {
            debug!("{:?} of user {} hidden from viewer", direction, target_id);
            return Ok(Page::empty());
        }

        let edges = match direction {
            Direction::Followers => self.store.followers_of(target_id).await?,
            Direction::Following => self.store.following_of(target_id).await?,
        };

        let remaining = resume_after(edges, query.cursor.as_ref(), |e| e.id);
        let page = take_page(remaining, clamp_limit(query.limit), |e| e.id);

        let details = try_join_all(
            page.items
                .iter()
                .map(|edge| self.follow_detail(edge, direction.other_end(edge), viewer)),
        )
        .await?;

        Ok(Page {
            items: details.into_iter().flatten().collect(),
            next_cursor: page.next_cursor,
            has_more: page.has_more,
        })
    }

    /// Profile fields plus the viewer's follow status, fetched concurrently
    async fn follow_detail(
        &self,
        edge: &FollowEdge,
        user_id: UserId,
        viewer: Option<&User>,
    ) -> StoreResult<Option<FollowDetail>> {
        let (user, is_following) = futures::try_join!(
            self.store.user_by_id(user_id),
            self.viewer_follows(viewer, user_id),
        )?;

        Ok(user.map(|user| FollowDetail {
            id: user.id,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            bio: user.bio,
            is_following,
            followed_at: edge.created_at,
            edge_id: edge.id,
        }))
    }

    async fn viewer_follows(&self, viewer: Option<&User>, target_id: UserId) -> StoreResult<bool> {
        match viewer {
            Some(viewer) => self.store.follow_exists(viewer.id, target_id).await,
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::user::Role;
    use crate::permissions::PermissionTable;
    use crate::store::MemoryStore;

    async fn setup(n: usize) -> (SocialService, Vec<User>) {
        let svc = SocialService::new(Arc::new(MemoryStore::new()), Arc::new(PermissionTable::default()));
        let mut users = Vec::new();
        for i in 0..n {
            users.push(
                svc.sync_user(Some(&format!("auth|{}", i)), &format!("Traveler {}", i), None)
                    .await
                    .unwrap(),
            );
        }
        (svc, users)
    }

    #[tokio::test]
    async fn follow_twice_is_rejected() {
        let (svc, users) = setup(2).await;
        svc.follow(Some(&users[0]), users[1].id).await.unwrap();
        let err = svc.follow(Some(&users[0]), users[1].id).await.unwrap_err();
        assert!(matches!(
            err,
            SocialError::InvalidOperation(InvalidOperation::AlreadyFollowing)
        ));
        assert_eq!(svc.store().count_following(users[0].id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn self_follow_is_rejected_for_every_role() {
        let (svc, users) = setup(1).await;
        for role in [Role::Free, Role::Pro, Role::Admin] {
            let mut me = users[0].clone();
            me.role = Some(role);
            assert!(matches!(
                svc.follow(Some(&me), me.id).await,
                Err(SocialError::InvalidOperation(InvalidOperation::SelfFollow))
            ));
        }
    }

    #[tokio::test]
    async fn follow_checks_caller_then_target() {
        let (svc, users) = setup(1).await;
        assert!(matches!(
            svc.follow(None, users[0].id).await,
            Err(SocialError::Unauthenticated)
        ));
        assert!(matches!(
            svc.follow(Some(&users[0]), 999).await,
            Err(SocialError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unfollow_without_edge_leaves_others_alone() {
        let (svc, users) = setup(3).await;
        svc.follow(Some(&users[0]), users[1].id).await.unwrap();

        assert!(matches!(
            svc.unfollow(Some(&users[0]), users[2].id).await,
            Err(SocialError::InvalidOperation(InvalidOperation::NotFollowing))
        ));
        assert!(svc.is_following(Some(&users[0]), users[1].id).await.unwrap());

        svc.unfollow(Some(&users[0]), users[1].id).await.unwrap();
        assert!(!svc.is_following(Some(&users[0]), users[1].id).await.unwrap());
    }

    #[tokio::test]
    async fn anonymous_is_never_following() {
        let (svc, users) = setup(1).await;
        assert!(!svc.is_following(None, users[0].id).await.unwrap());
    }

    #[tokio::test]
    async fn stats_count_both_directions() {
        let (svc, users) = setup(3).await;
        svc.follow(Some(&users[0]), users[1].id).await.unwrap();
        svc.follow(Some(&users[2]), users[1].id).await.unwrap();
        svc.follow(Some(&users[1]), users[0].id).await.unwrap();

        let stats = svc.follow_stats(users[1].id).await.unwrap();
        assert_eq!(stats.followers_count, 2);
        assert_eq!(stats.following_count, 1);
    }
}
