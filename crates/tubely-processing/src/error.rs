//! Conversions from stage errors into the application error taxonomy.

use crate::faststart::NormalizeError;
use crate::geometry::ClassifyError;
use crate::staging::StagingError;
use crate::tools::ToolError;
use tubely_core::AppError;

impl From<StagingError> for AppError {
    fn from(err: StagingError) -> Self {
        match err {
            StagingError::PayloadTooLarge { limit } => AppError::PayloadTooLarge(format!(
                "Upload exceeds the maximum size of {} MB",
                limit / (1024 * 1024)
            )),
            StagingError::ContentType(e) => e.into(),
            StagingError::Io(e) => AppError::Internal(format!("Failed to stage upload: {}", e)),
        }
    }
}

impl From<ToolError> for AppError {
    fn from(err: ToolError) -> Self {
        AppError::MediaProbe(err.to_string())
    }
}

impl From<ClassifyError> for AppError {
    fn from(err: ClassifyError) -> Self {
        AppError::MediaProbe(err.to_string())
    }
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Io(e) => {
                AppError::Internal(format!("Failed to prepare remux output: {}", e))
            }
            other => AppError::MediaRemux(other.to_string()),
        }
    }
}
