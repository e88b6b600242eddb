//! Metadata store connection

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tubely_core::Config;

/// Open the pool and bring the `videos` schema up to date.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .connect(config.database_url())
        .await
        .context("Failed to connect to the metadata store")?;

    // Embedded at compile time from the workspace migrations/ directory.
    let migrator = sqlx::migrate!("../../migrations");
    migrator
        .run(&pool)
        .await
        .context("Failed to migrate the metadata store")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        migrations = migrator.iter().count(),
        "Metadata store ready"
    );

    Ok(pool)
}
