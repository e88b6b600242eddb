use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Progress of one upload through the ingestion pipeline.
///
/// States advance strictly in declaration order. A failure is reported together with the
/// state the pipeline had reached, which identifies the step that could not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Received,
    Staged,
    Classified,
    Normalized,
    KeyAllocated,
    Uploaded,
    Reconciled,
}

impl PipelineStage {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Staged => "staged",
            PipelineStage::Classified => "classified",
            PipelineStage::Normalized => "normalized",
            PipelineStage::KeyAllocated => "key_allocated",
            PipelineStage::Uploaded => "uploaded",
            PipelineStage::Reconciled => "reconciled",
        }
    }

    /// Name of the step that runs when leaving this state.
    pub fn pending_step(self) -> &'static str {
        match self {
            PipelineStage::Received => "ingestion",
            PipelineStage::Staged => "classification",
            PipelineStage::Classified => "normalization",
            PipelineStage::Normalized => "key_allocation",
            PipelineStage::KeyAllocated => "upload",
            PipelineStage::Uploaded => "reconciliation",
            PipelineStage::Reconciled => "complete",
        }
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
