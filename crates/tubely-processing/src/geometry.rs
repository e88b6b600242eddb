//! Aspect-ratio classification of staged videos.

use crate::staging::StagedArtifact;
use crate::tools::{MediaToolClient, ProbeReport, ToolError};
use thiserror::Error;
use tubely_core::GeometryClass;

const LANDSCAPE_MIN_RATIO: f64 = 1.6;
const LANDSCAPE_MAX_RATIO: f64 = 1.8;
const PORTRAIT_MAX_RATIO: f64 = 0.6;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("No video stream found")]
    NoVideoStream,

    #[error("Invalid video geometry {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("Probe failed: {0}")]
    ProbeFailure(#[from] ToolError),
}

/// Dimensions of the first video stream and the class derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoGeometry {
    pub width: u32,
    pub height: u32,
    pub class: GeometryClass,
}

/// Classify `width / height`: (1.6, 1.8) is landscape, below 0.6 is portrait, the rest other.
///
/// Only a zero height is rejected; a zero width gives a ratio of 0 and classifies as portrait.
pub fn classify(width: u32, height: u32) -> Result<GeometryClass, ClassifyError> {
    if height == 0 {
        return Err(ClassifyError::InvalidGeometry { width, height });
    }

    let ratio = f64::from(width) / f64::from(height);
    let class = if ratio > LANDSCAPE_MIN_RATIO && ratio < LANDSCAPE_MAX_RATIO {
        GeometryClass::Landscape
    } else if ratio < PORTRAIT_MAX_RATIO {
        GeometryClass::Portrait
    } else {
        GeometryClass::Other
    };

    Ok(class)
}

pub fn classify_probe(report: &ProbeReport) -> Result<VideoGeometry, ClassifyError> {
    let stream = report
        .first_video_stream()
        .ok_or(ClassifyError::NoVideoStream)?;

    let width = stream.width.unwrap_or(0);
    let height = stream.height.unwrap_or(0);
    let class = classify(width, height)?;

    Ok(VideoGeometry {
        width,
        height,
        class,
    })
}

/// Probe a staged upload and classify its first video stream.
pub async fn classify_artifact(
    tools: &dyn MediaToolClient,
    artifact: &StagedArtifact,
) -> Result<VideoGeometry, ClassifyError> {
    let report = tools.probe(artifact.path()).await?;
    let geometry = classify_probe(&report)?;

    tracing::debug!(
        width = geometry.width,
        height = geometry.height,
        class = %geometry.class,
        "Video classified"
    );

    Ok(geometry)
}
