// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use anyhow::{anyhow, Context, Result};
use diesel::Connection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{StoreError, StoreResult};

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection = Object<AsyncPgConnection>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database manager for the social service
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database manager with connection pool
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);

        let pool = DbPool::builder(manager)
            .max_size(config.max_connections)
            .build()
            .context("failed to build database pool")?;

        let db = Self { pool };

        // Test connection and run migrations
        db.initialize(&config.url).await?;

        Ok(db)
    }

    async fn initialize(&self, url: &str) -> Result<()> {
        let _conn = self
            .get_connection()
            .await
            .context("failed to connect to the database")?;
        info!("Successfully connected to the database");

        self.run_migrations(url).await
    }

    /// Run embedded migrations on a blocking thread through the sync wrapper
    async fn run_migrations(&self, url: &str) -> Result<()> {
        let url = url.to_string();
        let applied = tokio::task::spawn_blocking(move || -> Result<usize> {
            let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&url)
                .context("failed to open migration connection")?;
            let versions = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(|e| anyhow!("failed to apply migrations: {}", e))?;
            Ok(versions.len())
        })
        .await
        .context("migration task panicked")??;

        info!("Database migrations applied successfully ({} new)", applied);
        Ok(())
    }

    /// Get a database connection from the pool
    pub async fn get_connection(&self) -> StoreResult<DbConnection> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))
    }
}

/// Initialize database connection pool and run migrations
pub async fn init_database(config: &DatabaseConfig) -> Result<Database> {
    Database::new(config).await
}
