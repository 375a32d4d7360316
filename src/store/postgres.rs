// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use super::SocialStore;
use crate::db::{Database, DbConnection};
use crate::error::StoreResult;
use crate::models::activity::{ActivityRange, ActivityRecord, ActivityRow, NewActivity};
use crate::models::follow::{FollowEdge, FollowInsert, NewFollowEdge};
use crate::models::user::{NewUser, ProfileChangeset, ProfileUpdate, Role, User, UserId, UserRow};
use crate::schema::{activities, follows, users};

/// Postgres-backed store over a pooled diesel-async connection
pub struct PgStore {
    db: Arc<Database>,
}

impl PgStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn conn(&self) -> StoreResult<DbConnection> {
        self.db.get_connection().await
    }

    async fn load_edges<F>(&self, filter: F) -> StoreResult<Vec<FollowEdge>>
    where
        F: FnOnce(follows::BoxedQuery<'static, diesel::pg::Pg>) -> follows::BoxedQuery<'static, diesel::pg::Pg>,
    {
        let mut conn = self.conn().await?;
        let edges = filter(follows::table.into_boxed())
            .order((follows::created_at.desc(), follows::id.desc()))
            .load::<FollowEdge>(&mut conn)
            .await?;
        Ok(edges)
    }
}

#[async_trait]
impl SocialStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>("1"))
            .get_result::<i32>(&mut conn)
            .await?;
        Ok(())
    }

    async fn user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let mut conn = self.conn().await?;
        users::table
            .find(id)
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    async fn user_by_subject(&self, subject: &str) -> StoreResult<Option<User>> {
        let mut conn = self.conn().await?;
        users::table
            .filter(users::auth_subject.eq(subject))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut conn = self.conn().await?;
        let inserted = diesel::insert_into(users::table)
            .values(&user)
            .on_conflict(users::auth_subject)
            .do_nothing()
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()?;

        let row = match inserted {
            Some(row) => row,
            None => {
                // Lost a race with a concurrent first sync
                debug!("User already exists for subject, re-reading");
                users::table
                    .filter(users::auth_subject.eq(&user.auth_subject))
                    .select(UserRow::as_select())
                    .first::<UserRow>(&mut conn)
                    .await?
            }
        };
        User::try_from(row)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let mut conn = self.conn().await?;
        diesel::update(users::table.find(id))
            .set(&ProfileChangeset::new(update, now))
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    async fn set_role(&self, id: UserId, role: Role, now: DateTime<Utc>) -> StoreResult<Option<User>> {
        let mut conn = self.conn().await?;
        diesel::update(users::table.find(id))
            .set((
                users::role.eq(Some(role.as_str())),
                users::role_updated_at.eq(Some(now)),
                users::updated_at.eq(now),
            ))
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    async fn insert_follow(
        &self,
        edge: NewFollowEdge,
        max_follows: Option<u32>,
    ) -> StoreResult<FollowInsert> {
        let mut conn = self.conn().await?;

        let outcome = conn
            .transaction::<_, diesel::result::Error, _>(move |conn| {
                async move {
                    // Lock the follower row so concurrent follows by the same user serialize
                    users::table
                        .find(edge.follower_id)
                        .select(users::id)
                        .for_update()
                        .get_result::<i32>(conn)
                        .await?;

                    let exists = diesel::select(diesel::dsl::exists(
                        follows::table
                            .filter(follows::follower_id.eq(edge.follower_id))
                            .filter(follows::following_id.eq(edge.following_id)),
                    ))
                    .get_result::<bool>(conn)
                    .await?;

                    if exists {
                        return Ok(FollowInsert::AlreadyExists);
                    }

                    if let Some(max) = max_follows {
                        let outgoing = follows::table
                            .filter(follows::follower_id.eq(edge.follower_id))
                            .count()
                            .get_result::<i64>(conn)
                            .await?;
                        if outgoing >= i64::from(max) {
                            return Ok(FollowInsert::LimitReached);
                        }
                    }

                    // The unique (follower_id, following_id) index is the backstop
                    let inserted = diesel::insert_into(follows::table)
                        .values(&edge)
                        .on_conflict((follows::follower_id, follows::following_id))
                        .do_nothing()
                        .returning(FollowEdge::as_returning())
                        .get_result::<FollowEdge>(conn)
                        .await
                        .optional()?;

                    Ok(match inserted {
                        Some(created) => FollowInsert::Created(created),
                        None => FollowInsert::AlreadyExists,
                    })
                }
                .scope_boxed()
            })
            .await?;

        Ok(outcome)
    }

    async fn delete_follow(&self, follower_id: UserId, following_id: UserId) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let deleted = diesel::delete(
            follows::table
                .filter(follows::follower_id.eq(follower_id))
                .filter(follows::following_id.eq(following_id)),
        )
        .execute(&mut conn)
        .await?;
        debug!("Deleted follow edge, rows affected: {}", deleted);
        Ok(deleted > 0)
    }

    async fn follow_exists(&self, follower_id: UserId, following_id: UserId) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let exists = diesel::select(diesel::dsl::exists(
            follows::table
                .filter(follows::follower_id.eq(follower_id))
                .filter(follows::following_id.eq(following_id)),
        ))
        .get_result::<bool>(&mut conn)
        .await?;
        Ok(exists)
    }

    async fn followers_of(&self, user_id: UserId) -> StoreResult<Vec<FollowEdge>> {
        self.load_edges(|q| q.filter(follows::following_id.eq(user_id)))
            .await
    }

    async fn following_of(&self, user_id: UserId) -> StoreResult<Vec<FollowEdge>> {
        self.load_edges(|q| q.filter(follows::follower_id.eq(user_id)))
            .await
    }

    async fn count_followers(&self, user_id: UserId) -> StoreResult<i64> {
        let mut conn = self.conn().await?;
        Ok(follows::table
            .filter(follows::following_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await?)
    }

    async fn count_following(&self, user_id: UserId) -> StoreResult<i64> {
        let mut conn = self.conn().await?;
        Ok(follows::table
            .filter(follows::follower_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await?)
    }

    async fn insert_activity(&self, activity: NewActivity) -> StoreResult<ActivityRecord> {
        let mut conn = self.conn().await?;
        let row = diesel::insert_into(activities::table)
            .values(&activity)
            .returning(ActivityRow::as_returning())
            .get_result::<ActivityRow>(&mut conn)
            .await?;
        ActivityRecord::try_from(row)
    }

    async fn activities_of(
        &self,
        user_id: UserId,
        range: ActivityRange,
    ) -> StoreResult<Vec<ActivityRecord>> {
        let mut conn = self.conn().await?;

        let mut query = activities::table
            .filter(activities::user_id.eq(user_id))
            .select(ActivityRow::as_select())
            .into_boxed::<diesel::pg::Pg>();
        if let Some(before) = range.before {
            query = query.filter(activities::created_at.lt(before));
        }
        if let Some(since) = range.since {
            query = query.filter(activities::created_at.ge(since));
        }
        if let Some(limit) = range.limit {
            query = query.limit(limit as i64);
        }

        query
            .order((activities::created_at.desc(), activities::id.desc()))
            .load::<ActivityRow>(&mut conn)
            .await?
            .into_iter()
            .map(ActivityRecord::try_from)
            .collect()
    }
}
