use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres};
use tubely_core::models::{Video, VideoLocator};
use tubely_core::AppError;
use uuid::Uuid;

/// Trait for video record access
/// The upload paths consume exactly these operations. Each write touches only its own
/// columns, so a video upload and a thumbnail upload never revert each other.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Overwrite the stored locator of `id` and leave every other column alone.
    /// Fails with [`AppError::NotFound`] when the record no longer exists.
    async fn set_video_locator(
        &self,
        id: Uuid,
        locator: Option<&VideoLocator>,
    ) -> Result<Video, AppError>;

    /// Overwrite the thumbnail URL of `id` and leave every other column alone.
    async fn set_thumbnail_url(&self, id: Uuid, thumbnail_url: &str) -> Result<Video, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Row shape of the `videos` table.
#[derive(Debug, Clone, FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_bucket: Option<String>,
    pub video_key: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoRow {
    pub fn locator(&self) -> Option<VideoLocator> {
        match (&self.video_bucket, &self.video_key, &self.video_url) {
            (Some(bucket), Some(key), _) => Some(VideoLocator::Object {
                bucket: bucket.clone(),
                key: key.clone(),
            }),
            (_, _, Some(url)) => Some(VideoLocator::Url { url: url.clone() }),
            _ => None,
        }
    }

    pub fn into_video(self) -> Video {
        let locator = self.locator();
        Video {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            thumbnail_url: self.thumbnail_url,
            locator,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Column values for a locator: `(video_bucket, video_key, video_url)`.
fn locator_columns(
    locator: Option<&VideoLocator>,
) -> (Option<&str>, Option<&str>, Option<&str>) {
    match locator {
        Some(VideoLocator::Object { bucket, key }) => (Some(bucket.as_str()), Some(key.as_str()), None),
        Some(VideoLocator::Url { url }) => (None, None, Some(url.as_str())),
        None => (None, None, None),
    }
}

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let row: Option<VideoRow> =
            sqlx::query_as::<Postgres, VideoRow>("SELECT * FROM videos WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(VideoRow::into_video))
    }

    #[tracing::instrument(skip(self, locator), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn set_video_locator(
        &self,
        id: Uuid,
        locator: Option<&VideoLocator>,
    ) -> Result<Video, AppError> {
        let (bucket, key, url) = locator_columns(locator);

        // Single statement: concurrent updates serialize on the row, the last commit wins.
        let row: Option<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(
            r#"
            UPDATE videos
            SET video_bucket = $2,
                video_key = $3,
                video_url = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(bucket)
        .bind(key)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VideoRow::into_video)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }

    #[tracing::instrument(skip(self, thumbnail_url), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn set_thumbnail_url(&self, id: Uuid, thumbnail_url: &str) -> Result<Video, AppError> {
        let row: Option<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(
            r#"
            UPDATE videos
            SET thumbnail_url = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(thumbnail_url)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VideoRow::into_video)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> VideoRow {
        let now = Utc::now();
        VideoRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Boots in the rain".to_string(),
            description: None,
            thumbnail_url: None,
            video_bucket: None,
            video_key: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_without_locator() {
        let video = row().into_video();
        assert!(video.locator.is_none());
    }

    #[test]
    fn test_row_with_bucket_and_key() {
        let mut r = row();
        r.video_bucket = Some("tubely-videos".to_string());
        r.video_key = Some("landscape/abc.mp4".to_string());

        assert_eq!(
            r.into_video().locator,
            Some(VideoLocator::Object {
                bucket: "tubely-videos".to_string(),
                key: "landscape/abc.mp4".to_string(),
            })
        );
    }

    #[test]
    fn test_row_with_url() {
        let mut r = row();
        r.video_url = Some("https://cdn.example.com/portrait/abc.mp4".to_string());

        assert_eq!(
            r.into_video().locator,
            Some(VideoLocator::Url {
                url: "https://cdn.example.com/portrait/abc.mp4".to_string(),
            })
        );
    }

    #[test]
    fn test_locator_columns_clear_other_mode() {
        let object = VideoLocator::Object {
            bucket: "b".to_string(),
            key: "other/k.mp4".to_string(),
        };
        assert_eq!(
            locator_columns(Some(&object)),
            (Some("b"), Some("other/k.mp4"), None)
        );

        let url = VideoLocator::Url {
            url: "https://x/y.mp4".to_string(),
        };
        assert_eq!(locator_columns(Some(&url)), (None, None, Some("https://x/y.mp4")));
        assert_eq!(locator_columns(None), (None, None, None));
    }
}
