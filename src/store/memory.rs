// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::SocialStore;
use crate::error::{StoreError, StoreResult};
use crate::models::activity::{
    ActivityDetails, ActivityId, ActivityRange, ActivityRecord, ActivityType, NewActivity,
};
use crate::models::follow::{EdgeId, FollowEdge, FollowInsert, NewFollowEdge};
use crate::models::user::{NewUser, ProfileUpdate, Role, User, UserId};

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, User>,
    subjects: HashMap<String, UserId>,
    edges: HashMap<EdgeId, FollowEdge>,
    pairs: HashMap<(UserId, UserId), EdgeId>,
    activities: Vec<ActivityRecord>,
    next_user_id: UserId,
    next_edge_id: EdgeId,
    next_activity_id: ActivityId,
}

impl Inner {
    fn sorted_edges<F>(&self, keep: F) -> Vec<FollowEdge>
    where
        F: Fn(&FollowEdge) -> bool,
    {
        let mut edges: Vec<FollowEdge> = self.edges.values().filter(|e| keep(e)).cloned().collect();
        edges.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        edges
    }
}

/// In-process store; every operation runs under one lock so check-then-insert is atomic
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SocialStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn user_by_subject(&self, subject: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .subjects
            .get(subject)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner
            .subjects
            .get(&user.auth_subject)
            .and_then(|id| inner.users.get(id))
        {
            return Ok(existing.clone());
        }

        inner.next_user_id += 1;
        let created = User {
            id: inner.next_user_id,
            auth_subject: user.auth_subject,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            bio: None,
            home_location: None,
            travel_styles: Vec::new(),
            languages: Vec::new(),
            visibility: user.visibility.parse().map_err(StoreError::Corrupt)?,
            role: None,
            role_updated_at: None,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        inner.subjects.insert(created.auth_subject.clone(), created.id);
        inner.users.insert(created.id, created.clone());
        debug!("Created user {}", created.id);
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&id).map(|user| {
            update.apply_to(user, now);
            user.clone()
        }))
    }

    async fn set_role(&self, id: UserId, role: Role, now: DateTime<Utc>) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&id).map(|user| {
            user.role = Some(role);
            user.role_updated_at = Some(now);
            user.updated_at = now;
            user.clone()
        }))
    }

    async fn insert_follow(
        &self,
        edge: NewFollowEdge,
        max_follows: Option<u32>,
    ) -> StoreResult<FollowInsert> {
        let mut inner = self.inner.write().await;
        let pair = (edge.follower_id, edge.following_id);
        if inner.pairs.contains_key(&pair) {
            return Ok(FollowInsert::AlreadyExists);
        }

        if let Some(max) = max_follows {
            let outgoing = inner
                .edges
                .values()
                .filter(|e| e.follower_id == edge.follower_id)
                .count();
            if outgoing >= max as usize {
                return Ok(FollowInsert::LimitReached);
            }
        }

        inner.next_edge_id += 1;
        let created = FollowEdge {
            id: inner.next_edge_id,
            follower_id: edge.follower_id,
            following_id: edge.following_id,
            created_at: edge.created_at,
        };
        inner.pairs.insert(pair, created.id);
        inner.edges.insert(created.id, created.clone());
        Ok(FollowInsert::Created(created))
    }

    async fn delete_follow(&self, follower_id: UserId, following_id: UserId) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.pairs.remove(&(follower_id, following_id)) {
            Some(edge_id) => {
                inner.edges.remove(&edge_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn follow_exists(&self, follower_id: UserId, following_id: UserId) -> StoreResult<bool> {
        Ok(self
            .inner
            .read()
            .await
            .pairs
            .contains_key(&(follower_id, following_id)))
    }

    async fn followers_of(&self, user_id: UserId) -> StoreResult<Vec<FollowEdge>> {
        Ok(self
            .inner
            .read()
            .await
            .sorted_edges(|e| e.following_id == user_id))
    }

    async fn following_of(&self, user_id: UserId) -> StoreResult<Vec<FollowEdge>> {
        Ok(self
            .inner
            .read()
            .await
            .sorted_edges(|e| e.follower_id == user_id))
    }

    async fn count_followers(&self, user_id: UserId) -> StoreResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner.edges.values().filter(|e| e.following_id == user_id).count() as i64)
    }

    async fn count_following(&self, user_id: UserId) -> StoreResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner.edges.values().filter(|e| e.follower_id == user_id).count() as i64)
    }

    async fn insert_activity(&self, activity: NewActivity) -> StoreResult<ActivityRecord> {
        let kind: ActivityType = activity.activity_type.parse().map_err(StoreError::Corrupt)?;
        let details = ActivityDetails::from_parts(kind, activity.metadata)?;

        let mut inner = self.inner.write().await;
        inner.next_activity_id += 1;
        let record = ActivityRecord {
            id: inner.next_activity_id,
            user_id: activity.user_id,
            reference_id: activity.reference_id,
            details,
            created_at: activity.created_at,
        };
        inner.activities.push(record.clone());
        Ok(record)
    }

    async fn activities_of(
        &self,
        user_id: UserId,
        range: ActivityRange,
    ) -> StoreResult<Vec<ActivityRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<ActivityRecord> = inner
            .activities
            .iter()
            .filter(|a| a.user_id == user_id && range.contains(a.created_at))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        if let Some(limit) = range.limit {
            records.truncate(limit);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn user(store: &MemoryStore, subject: &str) -> User {
        store
            .create_user(NewUser::new(subject, subject, None, Utc::now()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_user_is_idempotent_per_subject() {
        let store = MemoryStore::new();
        let first = user(&store, "auth|ana").await;
        let again = store
            .create_user(NewUser::new("auth|ana", "Someone Else", None, Utc::now()))
            .await
            .unwrap();
        assert_eq!(first.id, again.id);
        assert_eq!(again.display_name, "auth|ana");
        assert_eq!(
            store.user_by_subject("auth|ana").await.unwrap().map(|u| u.id),
            Some(first.id)
        );
    }

    #[tokio::test]
    async fn insert_follow_checks_edge_before_limit() {
        let store = MemoryStore::new();
        let a = user(&store, "a").await;
        let b = user(&store, "b").await;
        let c = user(&store, "c").await;
        let edge = |to: UserId| NewFollowEdge {
            follower_id: a.id,
            following_id: to,
            created_at: Utc::now(),
        };

        assert!(matches!(
            store.insert_follow(edge(b.id), Some(1)).await.unwrap(),
            FollowInsert::Created(_)
        ));
        assert_eq!(
            store.insert_follow(edge(b.id), Some(1)).await.unwrap(),
            FollowInsert::AlreadyExists
        );
        assert_eq!(
            store.insert_follow(edge(c.id), Some(1)).await.unwrap(),
            FollowInsert::LimitReached
        );
        assert!(matches!(
            store.insert_follow(edge(c.id), None).await.unwrap(),
            FollowInsert::Created(_)
        ));
        assert_eq!(store.count_following(a.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn activities_come_back_newest_first_within_range() {
        let store = MemoryStore::new();
        let a = user(&store, "a").await;
        let now = Utc::now();
        let details = ActivityDetails::JournalPosted(crate::models::activity::JournalPosted {
            title: "Notes".into(),
            trip_id: None,
        });
        for days in [1, 5, 3, 9] {
            store
                .insert_activity(NewActivity::new(a.id, "j", &details, now - Duration::days(days)))
                .await
                .unwrap();
        }

        let range = ActivityRange {
            before: Some(now - Duration::days(1)),
            since: Some(now - Duration::days(7)),
            limit: None,
        };
        let days: Vec<i64> = store
            .activities_of(a.id, range)
            .await
            .unwrap()
            .iter()
            .map(|r| (now - r.created_at).num_days())
            .collect();
        assert_eq!(days, vec![3, 5]);
    }
}
