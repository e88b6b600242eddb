use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::resolve_video_response;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use std::time::Duration;
use tubely_core::models::VideoResponse;
use tubely_core::AppError;
use uuid::Uuid;

use super::parse_video_id;

#[utoipa::path(
    get,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = VideoResponse),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 401, description = "Missing credentials or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, user),
    fields(user_id = %user.user_id, operation = "get_video")
)]
pub async fn get_video(
    user: AuthUser,
    Path(video_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_video_id(&video_id)?;

    let video = state
        .media
        .repository
        .get_video(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if !video.is_owned_by(user.user_id) {
        return Err(AppError::Forbidden("You are not the owner of this video".to_string()).into());
    }

    let ttl = Duration::from_secs(state.config.presigned_url_ttl_secs());
    let response = resolve_video_response(state.media.storage.as_ref(), video, ttl).await?;

    Ok(Json(response))
}
