use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{resolve_video_response, VideoUploadService};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::io::StreamReader;
use tubely_core::models::VideoResponse;
use tubely_core::AppError;
use uuid::Uuid;

use super::parse_video_id;

/// Multipart field carrying the video body.
pub const VIDEO_FIELD: &str = "video";

#[utoipa::path(
    post,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = Uuid, Path, description = "ID of the video record to attach the upload to")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded successfully", body = VideoResponse),
        (status = 400, description = "Invalid video ID or content type", body = ErrorResponse),
        (status = 401, description = "Missing credentials or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let body = StreamReader::new(field.map_err(std::io::Error::other));
        tokio::pin!(body);

        let outcome = VideoUploadService::new(&state)
            .upload(user.user_id, video_id, &content_type, body)
            .await?;

        let ttl = Duration::from_secs(state.config.presigned_url_ttl_secs());
        let response =
            resolve_video_response(state.media.storage.as_ref(), outcome.video, ttl).await?;

        return Ok(Json(response).into_response());
    }

    Err(AppError::BadRequest(format!("Missing '{}' field in multipart body", VIDEO_FIELD)).into())
}
