//! Read-time resolution of a stored locator into a client-facing URL.

use std::time::Duration;
use tubely_core::models::{Video, VideoLocator, VideoResponse};
use tubely_core::AppError;
use tubely_storage::Storage;

use crate::error::storage_error;

/// Build the response form of `video`.
///
/// Bucket and key locators are signed for `ttl`; URL locators are returned as stored.
pub async fn resolve_video_response(
    storage: &dyn Storage,
    video: Video,
    ttl: Duration,
) -> Result<VideoResponse, AppError> {
    let video_url = match &video.locator {
        Some(VideoLocator::Object { key, .. }) => Some(
            storage
                .get_presigned_url(key, ttl)
                .await
                .map_err(storage_error)?,
        ),
        Some(VideoLocator::Url { url }) => Some(url.clone()),
        None => None,
    };

    Ok(VideoResponse::with_video_url(video, video_url))
}
