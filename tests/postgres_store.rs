// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

//! Runs against a live database: `DATABASE_URL=... cargo test -- --ignored`

use std::sync::Arc;

use chrono::{Duration, SubsecRound, Utc};
use futures::future::join_all;

use wanderlust_social::config::{DatabaseConfig, StoreBackend};
use wanderlust_social::db::init_database;
use wanderlust_social::models::activity::{ActivityDetails, ActivityRange, NewActivity, TripCreated};
use wanderlust_social::models::follow::{FollowInsert, NewFollowEdge};
use wanderlust_social::models::user::{NewUser, User};
use wanderlust_social::store::{PgStore, SocialStore};

async fn store() -> Option<Arc<PgStore>> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = DatabaseConfig {
        backend: StoreBackend::Postgres,
        url,
        max_connections: 8,
    };
    let db = init_database(&config).await.unwrap();
    Some(Arc::new(PgStore::new(Arc::new(db))))
}

async fn user(store: &PgStore, name: &str) -> User {
    let subject = format!("pgtest|{}|{}", name, Utc::now().timestamp_nanos_opt().unwrap_or_default());
    store
        .create_user(NewUser::new(subject, name, None, Utc::now()))
        .await
        .unwrap()
}

fn edge(follower: &User, following: &User) -> NewFollowEdge {
    NewFollowEdge {
        follower_id: follower.id,
        following_id: following.id,
        created_at: Utc::now(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn follow_insert_is_unique_and_capped_under_concurrency() {
    let Some(store) = store().await else {
        return;
    };
    let fan = user(&store, "fan").await;
    let star = user(&store, "star").await;

    let attempts = (0..10).map(|_| {
        let store = store.clone();
        let edge = edge(&fan, &star);
        tokio::spawn(async move { store.insert_follow(edge, Some(50)).await })
    });
    let results = join_all(attempts).await;
    let created = results
        .iter()
        .filter(|r| matches!(r, Ok(Ok(FollowInsert::Created(_)))))
        .count();
    assert_eq!(created, 1);
    assert_eq!(store.count_followers(star.id).await.unwrap(), 1);

    let mut targets = Vec::new();
    for i in 0..6 {
        targets.push(user(&store, &format!("target{}", i)).await);
    }
    let attempts = targets.iter().map(|target| {
        let store = store.clone();
        let edge = edge(&fan, target);
        tokio::spawn(async move { store.insert_follow(edge, Some(3)).await })
    });
    join_all(attempts).await;
    assert_eq!(store.count_following(fan.id).await.unwrap(), 3);

    assert!(store.delete_follow(fan.id, star.id).await.unwrap());
    assert!(!store.follow_exists(fan.id, star.id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn activities_of_applies_bounds_newest_first() {
    let Some(store) = store().await else {
        return;
    };
    let author = user(&store, "author").await;
    let base = Utc::now().trunc_subsecs(3);
    for days in 0..4 {
        let details = ActivityDetails::TripCreated(TripCreated {
            trip_name: format!("trip {}", days),
            destination: None,
        });
        store
            .insert_activity(NewActivity::new(author.id, format!("t{}", days), &details, base - Duration::days(days)))
            .await
            .unwrap();
    }

    let range = ActivityRange {
        before: Some(base),
        since: Some(base - Duration::days(2)),
        limit: Some(10),
    };
    let records = store.activities_of(author.id, range).await.unwrap();
    let times: Vec<_> = records.iter().map(|r| r.created_at).collect();
    assert_eq!(times, vec![base - Duration::days(1), base - Duration::days(2)]);

    let latest = store.activities_of(author.id, ActivityRange::latest(1)).await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].reference_id, "t0");
}
