//! Thumbnail upload
//!
//! Stills skip probing and remuxing: the image is staged, stored under the
//! `thumbnails/` prefix, and its URL written to the record.

use tokio::io::AsyncRead;
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_processing::stage_upload;
use tubely_storage::{allocate_thumbnail_key, ObjectReader};
use uuid::Uuid;

use crate::error::storage_error;
use crate::state::MediaState;

pub struct ThumbnailUploadService {
    media: MediaState,
}

impl ThumbnailUploadService {
    pub fn new(media: MediaState) -> Self {
        Self { media }
    }

    #[tracing::instrument(skip(self, body), fields(video.id = %video_id, user.id = %user_id))]
    pub async fn upload<R>(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        content_type: &str,
        body: R,
    ) -> Result<Video, AppError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let video = self
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

        let staged = stage_upload(body, content_type, &self.media.thumbnail_policy).await?;
        let declared = staged.content_type().to_string();
        let key = allocate_thumbnail_key(&declared)?;

        let reader: ObjectReader = Box::pin(staged.open().await?);
        let stored = self
            .media
            .storage
            .put_stream(key.as_str(), &declared, Some(staged.len()), reader)
            .await
            .map_err(storage_error);
        staged.discard();
        let stored_bytes = stored?;

        let thumbnail_url = self.media.storage.object_url(key.as_str());
        let video = self
            .media
            .repository
            .set_thumbnail_url(video.id, &thumbnail_url)
            .await?;

        tracing::info!(storage_key = %key, stored_bytes, "Thumbnail upload completed");
        Ok(video)
    }
}
