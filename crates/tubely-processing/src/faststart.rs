//! Fast-start normalizer: relocates the container index ahead of the payload.

use crate::staging::{reserve_scratch, StagedArtifact};
use crate::tools::{MediaToolClient, ToolError};
use std::path::Path;
use thiserror::Error;

const FASTSTART_PREFIX: &str = "tubely-faststart-";

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Remux failed: {0}")]
    RemuxFailure(#[from] ToolError),

    #[error("Remux produced an empty output file")]
    RemuxProducedEmptyOutput,

    #[error("Failed to prepare remux output: {0}")]
    Io(#[from] std::io::Error),
}

/// Remux `input` into a new scratch artifact with a front-loaded index.
///
/// The tool's exit status alone is not trusted: a missing or zero-length output is
/// reported as [`NormalizeError::RemuxProducedEmptyOutput`].
pub async fn normalize_faststart(
    tools: &dyn MediaToolClient,
    input: &StagedArtifact,
    scratch_dir: &Path,
) -> Result<StagedArtifact, NormalizeError> {
    let output = reserve_scratch(scratch_dir, FASTSTART_PREFIX)?;

    tools.remux_faststart(input.path(), &output).await?;

    let len = match tokio::fs::metadata(&output).await {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
        Err(e) => return Err(NormalizeError::Io(e)),
    };

    if len == 0 {
        tracing::error!(
            input = %input.path().display(),
            "Remux reported success but produced no output"
        );
        return Err(NormalizeError::RemuxProducedEmptyOutput);
    }

    tracing::debug!(
        input_bytes = input.len(),
        output_bytes = len,
        "Fast-start normalization completed"
    );

    Ok(StagedArtifact::new(output, len, input.content_type().clone()))
}
