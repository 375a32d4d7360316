// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

pub mod auth;
pub mod extract;
pub mod handlers;
mod routes;

pub use routes::router;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::{AuthConfig, ServerConfig};
use crate::social::SocialService;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SocialService>,
    pub subject_header: Arc<str>,
}

impl AppState {
    pub fn new(service: Arc<SocialService>, auth: &AuthConfig) -> Self {
        Self {
            service,
            subject_header: Arc::from(auth.subject_header.as_str()),
        }
    }
}

/// Start the API server and run until `shutdown` resolves
pub async fn start_api_server(
    state: AppState,
    config: &ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = router(state, config.enable_cors);

    let addr = format!("{}:{}", config.host, config.port)
        .parse::<SocketAddr>()
        .context("invalid listen address")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Starting API server on {}", addr);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;

    Ok(())
}
