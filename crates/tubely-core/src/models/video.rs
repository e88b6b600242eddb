use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Where the uploaded artifact of a video lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VideoLocator {
    /// Bucket and key inside the configured object store. Access URLs are signed at read time.
    Object { bucket: String, key: String },
    /// Fully-qualified reference to the object.
    Url { url: String },
}

impl VideoLocator {
    pub fn key(&self) -> Option<&str> {
        match self {
            VideoLocator::Object { key, .. } => Some(key),
            VideoLocator::Url { .. } => None,
        }
    }
}

/// How the reconciler records a freshly uploaded object on the video record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorMode {
    #[default]
    Object,
    Url,
}

impl FromStr for LocatorMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "object" | "bucket_key" => Ok(LocatorMode::Object),
            "url" => Ok(LocatorMode::Url),
            _ => Err(anyhow::anyhow!("Invalid video locator mode: {}", s)),
        }
    }
}

impl Display for LocatorMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LocatorMode::Object => write!(f, "object"),
            LocatorMode::Url => write!(f, "url"),
        }
    }
}

/// Video record owned by a user. Only the upload pipeline writes `locator`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub locator: Option<VideoLocator>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Time-limited access URL when the artifact is stored by bucket and key.
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoResponse {
    /// Build the response form of a record with an already resolved access URL.
    pub fn with_video_url(video: Video, video_url: Option<String>) -> Self {
        VideoResponse {
            id: video.id,
            user_id: video.user_id,
            title: video.title,
            description: video.description,
            thumbnail_url: video.thumbnail_url,
            video_url,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}
