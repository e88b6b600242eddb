//! Service and repository wiring

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::PgVideoRepository;
use tubely_processing::FfmpegToolClient;
use tubely_storage::Storage;

use crate::auth::JwtPrincipalResolver;
use crate::state::AppState;

/// Construct every collaborator of the upload pipeline and the shared state.
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let repository = Arc::new(PgVideoRepository::new(pool));
    let tools = Arc::new(
        FfmpegToolClient::from_config(config).context("Invalid media tool configuration")?,
    );
    let principals = Arc::new(JwtPrincipalResolver::new(config.jwt_secret()));

    tracing::info!(
        max_concurrent_media_tools = config.max_concurrent_media_tools(),
        media_tool_timeout_secs = config.media_tool_timeout_secs(),
        "Media tools configured"
    );

    Ok(Arc::new(AppState::new(
        config.clone(),
        repository,
        storage,
        tools,
        principals,
    )))
}
