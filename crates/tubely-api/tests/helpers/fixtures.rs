//! Test fixtures: in-memory metadata store, scripted media tools, multipart bodies.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use std::sync::{Arc, Mutex};
use tubely_core::models::{Video, VideoLocator};
use tubely_core::{AppError, StorageBackend};
use tubely_db::VideoRepository;
use tubely_processing::{MediaToolClient, ProbeReport, ProbeStream, ToolError};
use tubely_storage::{ObjectReader, Storage, StorageError, StorageResult};
use uuid::Uuid;

pub const MAX_TEST_VIDEO_BYTES: usize = 64 * 1024;

/// Stand-in for an MP4 body; the scripted tools never parse it.
pub fn sample_video_bytes() -> Vec<u8> {
    let mut bytes = b"\x00\x00\x00\x18ftypmp42".to_vec();
    bytes.extend(std::iter::repeat(0xAB).take(4096));
    bytes
}

pub fn video_form(bytes: Vec<u8>, content_type: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", "ignored")
        .add_part(
            "video",
            Part::bytes(bytes)
                .file_name("clip.mp4")
                .mime_type(content_type),
        )
}

/// Minimal valid 1x1 PNG bytes.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

pub fn thumbnail_form(bytes: Vec<u8>, content_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "thumbnail",
        Part::bytes(bytes)
            .file_name("thumb.png")
            .mime_type(content_type),
    )
}

#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
    updates: AtomicUsize,
    fail_writes: AtomicBool,
}

impl InMemoryVideoRepository {
    /// Insert a record owned by `user_id` and return it.
    pub fn seed(&self, user_id: Uuid) -> Video {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            user_id,
            title: "Boots demo".to_string(),
            description: Some("Waterproof boots".to_string()),
            thumbnail_url: None,
            locator: None,
            created_at: now,
            updated_at: now,
        };
        self.videos
            .lock()
            .unwrap()
            .insert(video.id, video.clone());
        video
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Make every later write fail as a lost database connection would.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn write(&self, id: Uuid, apply: impl FnOnce(&mut Video)) -> Result<Video, AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut videos = self.videos.lock().unwrap();
        let stored = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;
        apply(stored);
        stored.updated_at = Utc::now();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(stored.clone())
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.get(id))
    }

    async fn set_video_locator(
        &self,
        id: Uuid,
        locator: Option<&VideoLocator>,
    ) -> Result<Video, AppError> {
        self.write(id, |video| video.locator = locator.cloned())
    }

    async fn set_thumbnail_url(&self, id: Uuid, thumbnail_url: &str) -> Result<Video, AppError> {
        self.write(id, |video| video.thumbnail_url = Some(thumbnail_url.to_string()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// [`Storage`] that delegates to another backend until told to fail uploads.
pub struct FaultyStorage {
    inner: Arc<dyn Storage>,
    fail_puts: AtomicBool,
}

impl FaultyStorage {
    pub fn new(inner: Arc<dyn Storage>) -> Self {
        Self {
            inner,
            fail_puts: AtomicBool::new(false),
        }
    }

    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for FaultyStorage {
    async fn put_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: ObjectReader,
    ) -> StorageResult<u64> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "connection reset by peer".to_string(),
            ));
        }
        self.inner
            .put_stream(storage_key, content_type, content_length, reader)
            .await
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        self.inner.exists(storage_key).await
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.inner.get_presigned_url(storage_key, expires_in).await
    }

    fn object_url(&self, storage_key: &str) -> String {
        self.inner.object_url(storage_key)
    }

    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.inner.health_check().await
    }
}

pub enum RemuxBehavior {
    Copy,
    Empty,
}

/// [`MediaToolClient`] that reports fixed streams and remuxes by copying.
pub struct ScriptedTools {
    streams: Vec<ProbeStream>,
    remux: RemuxBehavior,
    probes: AtomicUsize,
    remuxes: AtomicUsize,
}

impl ScriptedTools {
    pub fn new(streams: Vec<ProbeStream>, remux: RemuxBehavior) -> Self {
        Self {
            streams,
            remux,
            probes: AtomicUsize::new(0),
            remuxes: AtomicUsize::new(0),
        }
    }

    pub fn with_video(width: u32, height: u32) -> Self {
        Self::new(
            vec![
                ProbeStream {
                    index: Some(0),
                    codec_type: Some("video".to_string()),
                    codec_name: Some("h264".to_string()),
                    width: Some(width),
                    height: Some(height),
                },
                ProbeStream {
                    index: Some(1),
                    codec_type: Some("audio".to_string()),
                    codec_name: Some("aac".to_string()),
                    ..Default::default()
                },
            ],
            RemuxBehavior::Copy,
        )
    }

    pub fn without_streams() -> Self {
        Self::new(Vec::new(), RemuxBehavior::Copy)
    }

    pub fn with_empty_remux(width: u32, height: u32) -> Self {
        Self {
            remux: RemuxBehavior::Empty,
            ..Self::with_video(width, height)
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn remux_count(&self) -> usize {
        self.remuxes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaToolClient for ScriptedTools {
    async fn probe(&self, _path: &Path) -> Result<ProbeReport, ToolError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        Ok(ProbeReport {
            streams: self.streams.clone(),
        })
    }

    async fn remux_faststart(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        self.remuxes.fetch_add(1, Ordering::SeqCst);
        match self.remux {
            RemuxBehavior::Copy => {
                tokio::fs::copy(input, output)
                    .await
                    .map_err(|source| ToolError::Spawn {
                        tool: "ffmpeg",
                        source,
                    })?;
                Ok(())
            }
            RemuxBehavior::Empty => Ok(()),
        }
    }
}
