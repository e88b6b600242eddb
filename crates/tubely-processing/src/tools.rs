//! External media tools: probing and fast-start remuxing.
//!
//! The pipeline only depends on [`MediaToolClient`]. [`FfmpegToolClient`] drives local
//! `ffprobe`/`ffmpeg` binaries; tests substitute scripted clients.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tubely_core::Config;

/// Failure invoking an external media tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid {tool} executable path: {path}")]
    InvalidExecutable { tool: &'static str, path: String },

    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Exited {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("{tool} did not finish within {secs}s")]
    TimedOut { tool: &'static str, secs: u64 },

    #[error("Failed to parse {tool} output: {source}")]
    InvalidOutput {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{tool} is unavailable: {reason}")]
    Unavailable { tool: &'static str, reason: String },
}

/// Stream list reported by the probing tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeReport {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl ProbeStream {
    /// Streams without a reported codec type are treated as video when they carry dimensions.
    pub fn is_video(&self) -> bool {
        match self.codec_type.as_deref() {
            Some(kind) => kind.eq_ignore_ascii_case("video"),
            None => self.width.is_some() || self.height.is_some(),
        }
    }
}

impl ProbeReport {
    pub fn first_video_stream(&self) -> Option<&ProbeStream> {
        self.streams.iter().find(|s| s.is_video())
    }
}

/// Capability interface over the out-of-process media tools.
#[async_trait]
pub trait MediaToolClient: Send + Sync {
    /// Enumerate the streams of the media file at `path`.
    async fn probe(&self, path: &Path) -> Result<ProbeReport, ToolError>;

    /// Copy every stream of `input` into an MP4 container at `output` with the index moved
    /// to the front. Payload is not re-encoded. `output` is overwritten if it exists.
    async fn remux_faststart(&self, input: &Path, output: &Path) -> Result<(), ToolError>;
}

/// Reject executable paths carrying shell metacharacters.
fn validate_executable(tool: &'static str, path: &str) -> Result<(), ToolError> {
    let safe = !path.is_empty()
        && path.chars().all(|c| {
            c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
        });
    if !safe {
        return Err(ToolError::InvalidExecutable {
            tool,
            path: path.to_string(),
        });
    }
    Ok(())
}

/// [`MediaToolClient`] backed by local `ffprobe` and `ffmpeg` binaries.
///
/// Invocations share a semaphore so at most `max_concurrent` tool processes run at once,
/// and each process is killed when it exceeds `timeout`.
#[derive(Clone)]
pub struct FfmpegToolClient {
    ffmpeg_path: String,
    ffprobe_path: String,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl FfmpegToolClient {
    pub fn new(
        ffmpeg_path: String,
        ffprobe_path: String,
        max_concurrent: usize,
        timeout: Duration,
    ) -> Result<Self, ToolError> {
        validate_executable("ffmpeg", &ffmpeg_path)?;
        validate_executable("ffprobe", &ffprobe_path)?;

        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ToolError> {
        Self::new(
            config.ffmpeg_path().to_string(),
            config.ffprobe_path().to_string(),
            config.max_concurrent_media_tools(),
            Duration::from_secs(config.media_tool_timeout_secs()),
        )
    }

    async fn run(&self, tool: &'static str, mut command: Command) -> Result<Output, ToolError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| ToolError::Unavailable {
                tool,
                reason: e.to_string(),
            })?;

        command
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|source| ToolError::Spawn { tool, source })?,
            Err(_) => {
                return Err(ToolError::TimedOut {
                    tool,
                    secs: self.timeout.as_secs(),
                })
            }
        };

        if !output.status.success() {
            return Err(ToolError::Exited {
                tool,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl MediaToolClient for FfmpegToolClient {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<ProbeReport, ToolError> {
        let start = std::time::Instant::now();

        let mut command = Command::new(&self.ffprobe_path);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdout(Stdio::piped());

        let output = self.run("ffprobe", command).await?;

        let report: ProbeReport =
            serde_json::from_slice(&output.stdout).map_err(|source| ToolError::InvalidOutput {
                tool: "ffprobe",
                source,
            })?;

        tracing::debug!(
            streams = report.streams.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video probe completed"
        );

        Ok(report)
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux_faststart(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        let start = std::time::Instant::now();

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(output)
            .stdout(Stdio::null());

        self.run("ffmpeg", command).await?;

        tracing::debug!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fast-start remux completed"
        );

        Ok(())
    }
}
