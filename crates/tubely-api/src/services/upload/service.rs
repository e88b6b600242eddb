//! Video upload service
//!
//! Runs one upload through every pipeline stage in order. Each failure is tagged with the
//! stage the pipeline had reached, so the caller can tell which step failed. Scratch
//! artifacts are owned by this function's scope and are removed on every exit path.

use std::sync::Arc;
use std::time::Instant;

use tokio::io::AsyncRead;
use tubely_core::models::{Video, VideoLocator};
use tubely_core::{AppError, LocatorMode, PipelineStage};
use tubely_processing::{classify_artifact, normalize_faststart, stage_upload};
use tubely_storage::{allocate_video_key, ObjectReader, StorageKey};
use uuid::Uuid;

use super::types::UploadOutcome;
use crate::error::storage_error;
use crate::state::AppState;

/// Tag an error with the stage the pipeline had reached when it occurred.
fn at<E: Into<AppError>>(stage: PipelineStage) -> impl FnOnce(E) -> AppError {
    move |err| err.into().at_stage(stage)
}

pub struct VideoUploadService {
    state: Arc<AppState>,
}

impl VideoUploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Fetch `video_id` and make sure `user_id` owns it.
    async fn owned_video(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        let video = self
            .state
            .media
            .repository
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        if !video.is_owned_by(user_id) {
            return Err(AppError::Forbidden(
                "You are not the owner of this video".to_string(),
            ));
        }

        Ok(video)
    }

    /// Complete upload workflow: stage → classify → normalize → allocate → upload → reconcile
    ///
    /// `body` is the raw upload and `content_type` the type declared for it by the client.
    #[tracing::instrument(skip(self, body), fields(video.id = %video_id, user.id = %user_id))]
    pub async fn upload<R>(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        content_type: &str,
        body: R,
    ) -> Result<UploadOutcome, AppError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let media = &self.state.media;
        let started = Instant::now();

        // 1. Authorize before touching scratch storage
        self.owned_video(video_id, user_id).await?;

        // 2. Stage the upload
        let staged = stage_upload(body, content_type, &media.policy)
            .await
            .map_err(at(PipelineStage::Received))?;
        tracing::debug!(bytes = staged.len(), "Upload staged");

        // 3. Classify geometry
        let geometry = classify_artifact(media.tools.as_ref(), &staged)
            .await
            .map_err(at(PipelineStage::Staged))?;

        // 4. Remux for fast start; the raw upload is no longer needed afterwards
        let normalized =
            normalize_faststart(media.tools.as_ref(), &staged, &media.policy.scratch_dir)
                .await
                .map_err(at(PipelineStage::Classified))?;
        staged.discard();

        // 5. Allocate a storage key
        let declared = normalized.content_type().to_string();
        let storage_key = allocate_video_key(geometry.class, &declared)
            .map_err(at(PipelineStage::Normalized))?;

        // 6. Upload the normalized artifact, then release it whatever the outcome
        let uploaded = self.put_artifact(&storage_key, &declared, &normalized).await;
        normalized.discard();
        let stored_bytes = uploaded.map_err(|e| e.at_stage(PipelineStage::KeyAllocated))?;

        // 7. Point the record at the new object
        let video = self
            .reconcile(video_id, user_id, &storage_key)
            .await
            .map_err(|e| {
                tracing::warn!(
                    storage_key = %storage_key,
                    error = %e,
                    "Object uploaded but record not updated; object is orphaned"
                );
                e.at_stage(PipelineStage::Uploaded)
            })?;

        tracing::info!(
            storage_key = %storage_key,
            geometry = %geometry.class,
            width = geometry.width,
            height = geometry.height,
            stored_bytes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Video upload completed"
        );

        Ok(UploadOutcome {
            video,
            storage_key,
            geometry,
            stored_bytes,
        })
    }

    async fn put_artifact(
        &self,
        storage_key: &StorageKey,
        content_type: &str,
        artifact: &tubely_processing::StagedArtifact,
    ) -> Result<u64, AppError> {
        let file = artifact.open().await?;
        let reader: ObjectReader = Box::pin(file);

        self.state
            .media
            .storage
            .put_stream(
                storage_key.as_str(),
                content_type,
                Some(artifact.len()),
                reader,
            )
            .await
            .map_err(storage_error)
    }

    /// Re-check ownership, then overwrite the record's locator and nothing else.
    async fn reconcile(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        storage_key: &StorageKey,
    ) -> Result<Video, AppError> {
        let storage = &self.state.media.storage;
        self.owned_video(video_id, user_id).await?;

        let locator = match self.state.config.locator_mode() {
            LocatorMode::Object => VideoLocator::Object {
                bucket: storage.bucket().to_string(),
                key: storage_key.as_str().to_string(),
            },
            LocatorMode::Url => VideoLocator::Url {
                url: storage.object_url(storage_key.as_str()),
            },
        };

        self.state
            .media
            .repository
            .set_video_locator(video_id, Some(&locator))
            .await
    }
}
