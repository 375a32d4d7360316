// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

// Import diesel table macros
use diesel::allow_tables_to_appear_in_same_query;
use diesel::joinable;
use diesel::table;

table! {
    users (id) {
        id -> Integer,
        auth_subject -> Varchar,
        display_name -> Varchar,
        avatar_url -> Nullable<Varchar>,
        bio -> Nullable<Text>,
        home_location -> Nullable<Varchar>,
        travel_styles -> Array<Text>,
        languages -> Array<Text>,
        visibility -> Varchar,
        role -> Nullable<Varchar>,
        role_updated_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    follows (id) {
        id -> Integer,
        follower_id -> Integer,
        following_id -> Integer,
        created_at -> Timestamptz,
    }
}

table! {
    activities (id) {
        id -> Integer,
        user_id -> Integer,
        activity_type -> Varchar,
        reference_id -> Varchar,
        metadata -> Jsonb,
        created_at -> Timestamptz,
    }
}

joinable!(activities -> users (user_id));

allow_tables_to_appear_in_same_query!(users, follows, activities);
