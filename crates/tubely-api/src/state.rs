//! Application state shared by every handler.

use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{IngestPolicy, MediaToolClient};
use tubely_storage::Storage;

use crate::auth::PrincipalResolver;

/// Collaborators of the upload pipeline. Constructed once at startup and never mutated.
#[derive(Clone)]
pub struct MediaState {
    pub repository: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn Storage>,
    pub tools: Arc<dyn MediaToolClient>,
    pub policy: IngestPolicy,
    pub thumbnail_policy: IngestPolicy,
}

#[derive(Clone)]
pub struct AppState {
    pub media: MediaState,
    pub principals: Arc<dyn PrincipalResolver>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        repository: Arc<dyn VideoRepository>,
        storage: Arc<dyn Storage>,
        tools: Arc<dyn MediaToolClient>,
        principals: Arc<dyn PrincipalResolver>,
    ) -> Self {
        let policy = IngestPolicy::from_config(&config);
        let thumbnail_policy = IngestPolicy::thumbnails_from_config(&config);
        Self {
            media: MediaState {
                repository,
                storage,
                tools,
                policy,
                thumbnail_policy,
            },
            principals,
            config,
        }
    }
}
