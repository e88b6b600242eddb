//! Tubely Processing Library
//!
//! Local stages of the upload pipeline: staging an upload to scratch storage, probing and
//! classifying its geometry, and remuxing it for fast start. External tools are reached
//! through [`MediaToolClient`].

pub mod error;
pub mod faststart;
pub mod geometry;
pub mod staging;
pub mod tools;

pub use faststart::{normalize_faststart, NormalizeError};
pub use geometry::{classify, classify_artifact, classify_probe, ClassifyError, VideoGeometry};
pub use staging::{stage_upload, IngestPolicy, StagedArtifact, StagingError};
pub use tools::{FfmpegToolClient, MediaToolClient, ProbeReport, ProbeStream, ToolError};
