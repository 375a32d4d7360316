// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Build the HTTP surface over a shared service
pub fn router(state: AppState, enable_cors: bool) -> Router {
    let app = Router::new()
        // General routes
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::get_metrics))
        // Caller routes
        .route("/api/users/sync", post(handlers::profiles::sync_user))
        .route("/api/me/role", get(handlers::roles::get_my_role))
        .route("/api/me/profile", patch(handlers::profiles::update_my_profile))
        .route("/api/feed", get(handlers::feed::get_feed))
        // User routes
        .route("/api/users/:id", get(handlers::profiles::get_profile))
        .route("/api/users/:id/role", put(handlers::roles::set_user_role))
        .route(
            "/api/users/:id/follow",
            post(handlers::social_graph::follow_user).delete(handlers::social_graph::unfollow_user),
        )
        .route("/api/users/:id/is-following", get(handlers::social_graph::is_following))
        .route("/api/users/:id/followers", get(handlers::social_graph::get_followers))
        .route("/api/users/:id/following", get(handlers::social_graph::get_following))
        .route("/api/users/:id/stats", get(handlers::social_graph::get_follow_stats))
        .route("/api/users/:id/activities", get(handlers::feed::get_user_activities))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}
