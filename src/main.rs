// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wanderlust_social::api::{self, AppState};
use wanderlust_social::config::{Config, StoreBackend};
use wanderlust_social::db::init_database;
use wanderlust_social::permissions::PermissionTable;
use wanderlust_social::social::SocialService;
use wanderlust_social::store::{MemoryStore, PgStore, SocialStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,wanderlust_social=debug".into()),
    );
    let json_logs = std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false);
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = Config::from_env()?;
    info!("Initialized configuration");

    let store: Arc<dyn SocialStore> = match config.database.backend {
        StoreBackend::Postgres => {
            let db = Arc::new(init_database(&config.database).await?);
            info!("Connected to database");
            Arc::new(PgStore::new(db))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let permissions = Arc::new(PermissionTable::new(config.limits));
    let service = Arc::new(SocialService::new(store, permissions));
    let state = AppState::new(service, &config.auth);

    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received, initiating graceful shutdown"),
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
    };

    if let Err(e) = api::start_api_server(state, &config.server, shutdown).await {
        error!("API server error: {:#}", e);
        return Err(e);
    }

    info!("Wanderlust social service shutdown complete");
    Ok(())
}
