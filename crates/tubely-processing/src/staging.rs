//! Ingestion buffer: materializes an upload stream into a seekable scratch file.

use std::path::{Path, PathBuf};
use tempfile::TempPath;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tubely_core::{Config, ContentType, ContentTypeError};

const UPLOAD_PREFIX: &str = "tubely-upload-";

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    #[error(transparent)]
    ContentType(#[from] ContentTypeError),

    #[error("Failed to stage upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Limits applied to every upload before any processing starts.
#[derive(Debug, Clone)]
pub struct IngestPolicy {
    pub allowed_content_types: Vec<String>,
    pub max_bytes: u64,
    pub scratch_dir: PathBuf,
}

impl IngestPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            allowed_content_types: config.video_allowed_content_types().to_vec(),
            max_bytes: config.max_video_size_bytes() as u64,
            scratch_dir: config.scratch_dir().to_path_buf(),
        }
    }

    /// Limits for still-image thumbnails.
    pub fn thumbnails_from_config(config: &Config) -> Self {
        Self {
            allowed_content_types: config.thumbnail_allowed_content_types().to_vec(),
            max_bytes: config.max_thumbnail_size_bytes() as u64,
            scratch_dir: config.scratch_dir().to_path_buf(),
        }
    }
}

/// A uniquely named scratch file owned by one pipeline run.
///
/// The file is removed when the artifact is dropped.
#[derive(Debug)]
pub struct StagedArtifact {
    path: TempPath,
    len: u64,
    content_type: ContentType,
}

impl StagedArtifact {
    pub(crate) fn new(path: TempPath, len: u64, content_type: ContentType) -> Self {
        Self {
            path,
            len,
            content_type,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Open the artifact for reading from the start.
    pub async fn open(&self) -> std::io::Result<tokio::fs::File> {
        tokio::fs::File::open(&self.path).await
    }

    /// Remove the scratch file now, logging if removal fails.
    pub fn discard(self) {
        let path = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            tracing::warn!(path = %path, error = %e, "Failed to remove scratch file");
        }
    }
}

/// Create an empty, uniquely named file in `dir` that is removed on drop.
pub(crate) fn reserve_scratch(dir: &Path, prefix: &str) -> std::io::Result<TempPath> {
    let file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(".mp4")
        .tempfile_in(dir)?;
    Ok(file.into_temp_path())
}

/// Copy `reader` into a fresh scratch file.
///
/// The declared content type is checked against the policy before any file is created.
/// Streams longer than `policy.max_bytes` fail with [`StagingError::PayloadTooLarge`] and
/// leave nothing behind.
pub async fn stage_upload<R>(
    reader: R,
    content_type: &str,
    policy: &IngestPolicy,
) -> Result<StagedArtifact, StagingError>
where
    R: AsyncRead + Unpin,
{
    let content_type = ContentType::parse(content_type)?;
    content_type.ensure_allowed(&policy.allowed_content_types)?;

    let start = std::time::Instant::now();
    let named = tempfile::Builder::new()
        .prefix(UPLOAD_PREFIX)
        .suffix(&content_type.extension())
        .tempfile_in(&policy.scratch_dir)?;
    let (std_file, path) = named.into_parts();
    let mut file = tokio::fs::File::from_std(std_file);

    // One extra byte distinguishes "exactly at the limit" from "over it".
    let mut limited = reader.take(policy.max_bytes.saturating_add(1));
    let copied = tokio::io::copy(&mut limited, &mut file).await?;

    if copied > policy.max_bytes {
        tracing::warn!(
            limit_bytes = policy.max_bytes,
            "Upload rejected: exceeds size limit"
        );
        return Err(StagingError::PayloadTooLarge {
            limit: policy.max_bytes,
        });
    }

    file.flush().await?;
    file.sync_all().await?;

    tracing::debug!(
        path = %path.display(),
        size_bytes = copied,
        content_type = %content_type,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Upload staged"
    );

    Ok(StagedArtifact::new(path, copied, content_type))
}
