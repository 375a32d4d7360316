// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use futures::future::try_join_all;
use tracing::debug;

use super::pagination::{clamp_limit, take_page};
use super::visibility::feed_visible;
use super::{now, SocialService};
use crate::error::{SocialError, SocialResult};
use crate::metrics;
use crate::models::activity::{ActivityRange, ActivityRecord, FeedActivity, FeedPage};
use crate::models::user::{User, UserId};
use crate::permissions::Capability;

impl SocialService {
    /// Time-ordered activity of everyone the caller follows.
    ///
    /// `cursor` is an exclusive upper bound in epoch milliseconds.
    pub async fn get_feed(
        &self,
        caller: Option<&User>,
        limit: Option<usize>,
        cursor: Option<i64>,
    ) -> SocialResult<FeedPage> {
        metrics::feed_requested();

        let Some(caller) = caller else {
            return Ok(FeedPage::empty());
        };

        let edges = self.store.following_of(caller.id).await?;
        if edges.is_empty() {
            return Ok(FeedPage::empty());
        }

        let limit = clamp_limit(limit);
        let before = cursor.map(cursor_to_time).transpose()?;
        let range = ActivityRange {
            before,
            since: self.feed_cutoff(caller, now()),
            // enough per author to fill one page plus the probe item
            limit: Some(limit + 1),
        };

        let followed = try_join_all(edges.iter().map(|e| self.store.user_by_id(e.following_id))).await?;
        let authors: HashMap<UserId, User> = followed
            .into_iter()
            .flatten()
            .filter(feed_visible)
            .map(|user| (user.id, user))
            .collect();

        let batches = try_join_all(
            authors
                .keys()
                .map(|author_id| self.store.activities_of(*author_id, range)),
        )
        .await?;

        let mut merged: Vec<ActivityRecord> = batches.into_iter().flatten().collect();
        merged.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let page = take_page(merged, limit, |record| record.created_at.timestamp_millis());

        debug!(
            "Feed for user {}: {} authors, {} activities, more: {}",
            caller.id,
            authors.len(),
            page.items.len(),
            page.has_more
        );

        let activities = page
            .items
            .into_iter()
            .filter_map(|record| {
                let author = authors.get(&record.user_id)?;
                Some(FeedActivity::new(record, author))
            })
            .collect();

        Ok(FeedPage {
            activities,
            next_cursor: page.next_cursor,
        })
    }

    /// Oldest activity a caller may see, or `None` with the full-history capability
    pub fn feed_cutoff(&self, caller: &User, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.permissions.grants(caller.role, Capability::FullFeed) {
            return None;
        }
        let days = self.permissions.limits().feed_history_days;
        Some(now - Duration::days(i64::from(days)))
    }

    /// Latest activity of one user, behind the profile gate; no cutoff applies
    pub async fn get_user_activities(
        &self,
        target_id: UserId,
        viewer: Option<&User>,
        limit: Option<usize>,
    ) -> SocialResult<Vec<FeedActivity>> {
        let target = self
            .store
            .user_by_id(target_id)
            .await?
            .ok_or(SocialError::NotFound("User"))?;

        if !self.can_view_profile(&target, viewer).await? {
            debug!("Activity of user {} hidden from viewer", target_id);
            return Ok(Vec::new());
        }

        let records = self
            .store
            .activities_of(target_id, ActivityRange::latest(clamp_limit(limit)))
            .await?;

        Ok(records
            .into_iter()
            .map(|record| FeedActivity::new(record, &target))
            .collect())
    }
}

fn cursor_to_time(millis: i64) -> SocialResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| SocialError::InvalidInput(format!("invalid feed cursor {}", millis)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::user::Role;
    use crate::permissions::PermissionTable;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn cutoff_depends_on_full_feed() {
        let svc = SocialService::new(Arc::new(MemoryStore::new()), Arc::new(PermissionTable::default()));
        let mut caller = svc.sync_user(Some("auth|c"), "C", None).await.unwrap();
        let now = Utc::now();

        assert_eq!(svc.feed_cutoff(&caller, now), Some(now - Duration::days(7)));

        caller.role = Some(Role::Pro);
        assert_eq!(svc.feed_cutoff(&caller, now), None);
    }

    #[tokio::test]
    async fn anonymous_and_lonely_callers_get_empty_feeds() {
        let svc = SocialService::new(Arc::new(MemoryStore::new()), Arc::new(PermissionTable::default()));
        let caller = svc.sync_user(Some("auth|c"), "C", None).await.unwrap();

        let page = svc.get_feed(None, None, None).await.unwrap();
        assert!(page.activities.is_empty() && page.next_cursor.is_none());

        let page = svc.get_feed(Some(&caller), None, None).await.unwrap();
        assert!(page.activities.is_empty() && page.next_cursor.is_none());
    }

    #[test]
    fn rejects_unrepresentable_cursor() {
        assert!(cursor_to_time(i64::MAX).is_err());
        assert_eq!(cursor_to_time(0).unwrap().timestamp_millis(), 0);
    }
}
