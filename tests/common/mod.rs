// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};

use wanderlust_social::models::activity::{ActivityDetails, NewActivity, PlaceVisited, TripCreated};
use wanderlust_social::models::user::{ProfileUpdate, Role, User, Visibility};
use wanderlust_social::permissions::PermissionTable;
use wanderlust_social::social::SocialService;
use wanderlust_social::store::MemoryStore;

pub fn service() -> Arc<SocialService> {
    Arc::new(SocialService::new(
        Arc::new(MemoryStore::new()),
        Arc::new(PermissionTable::default()),
    ))
}

pub async fn traveler(svc: &SocialService, name: &str) -> User {
    svc.sync_user(Some(&format!("auth|{}", name)), name, None)
        .await
        .unwrap()
}

pub async fn with_role(svc: &SocialService, user: &User, role: Role) -> User {
    svc.store()
        .set_role(user.id, role, Utc::now())
        .await
        .unwrap()
        .unwrap()
}

pub async fn with_visibility(svc: &SocialService, user: &User, visibility: Visibility) -> User {
    let update = ProfileUpdate {
        visibility: Some(visibility),
        ..Default::default()
    };
    svc.update_profile(Some(user), update).await.unwrap()
}

pub fn trip(name: &str) -> ActivityDetails {
    ActivityDetails::TripCreated(TripCreated {
        trip_name: name.to_string(),
        destination: None,
    })
}

pub fn visit(place: &str) -> ActivityDetails {
    ActivityDetails::PlaceVisited(PlaceVisited {
        place_name: place.to_string(),
        rating: Some(4),
    })
}

/// Write an activity row at a fixed time, bypassing the recorder
pub async fn post_at(svc: &SocialService, author: &User, details: ActivityDetails, at: DateTime<Utc>) {
    svc.store()
        .insert_activity(NewActivity::new(author.id, format!("ref-{}", at.timestamp_millis()), &details, at))
        .await
        .unwrap();
}
