//! Error types module
//!
//! All errors surfaced to callers are unified under [`AppError`]. Failures raised while an
//! upload is moving through the ingestion pipeline are wrapped in [`AppError::Pipeline`] so
//! the caller can tell which step failed.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

use crate::content_type::ContentTypeError;
use crate::models::PipelineStage;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors like validation failures
    Debug,
    /// Recoverable issues
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DATABASE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Media probe failed: {0}")]
    MediaProbe(String),

    #[error("Media remux failed: {0}")]
    MediaRemux(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Upload failed during {}: {source}", .stage.pending_step())]
    Pipeline {
        stage: PipelineStage,
        #[source]
        source: Box<AppError>,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

impl From<ContentTypeError> for AppError {
    fn from(err: ContentTypeError) -> Self {
        match err {
            ContentTypeError::Malformed(_) => AppError::InvalidInput(err.to_string()),
            ContentTypeError::Unsupported { .. } => AppError::UnsupportedMediaType(err.to_string()),
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Storage(_) => (
            500,
            "STORAGE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::MediaProbe(_) => (
            500,
            "MEDIA_PROBE_FAILED",
            false,
            Some("Check that the file is a playable video"),
            true,
            LogLevel::Error,
        ),
        AppError::MediaRemux(_) => (
            500,
            "MEDIA_REMUX_FAILED",
            false,
            Some("Check that the file is a playable video"),
            true,
            LogLevel::Error,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnsupportedMediaType(_) => (
            400,
            "UNSUPPORTED_MEDIA_TYPE",
            false,
            Some("Upload an MP4 video"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Check the bearer token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Forbidden(_) => (
            401,
            "FORBIDDEN",
            false,
            Some("Only the owner of a video can upload to it"),
            false,
            LogLevel::Warn,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Pipeline { source, .. } => app_error_static_metadata(source),
    }
}

impl AppError {
    /// Attach the pipeline stage at which this error occurred. Already staged errors keep
    /// their original stage.
    pub fn at_stage(self, stage: PipelineStage) -> AppError {
        match self {
            AppError::Pipeline { .. } => self,
            other => AppError::Pipeline {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Pipeline stage reached before the failure, if the error came from the pipeline.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            AppError::Pipeline { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The error without any pipeline wrapper.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::Pipeline { source, .. } => source.root(),
            other => other,
        }
    }

    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::MediaProbe(_) => "MediaProbe",
            AppError::MediaRemux(_) => "MediaRemux",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
            AppError::Pipeline { source, .. } => source.error_type(),
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::MediaProbe(_) => "Failed to inspect video".to_string(),
            AppError::MediaRemux(_) => "Failed to prepare video for streaming".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::UnsupportedMediaType(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::Forbidden(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
            AppError::Pipeline { source, .. } => source.client_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Failed to access database");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_forbidden_maps_to_401() {
        let err = AppError::Forbidden("not the owner".to_string());
        assert_eq!(err.http_status_code(), 401);
        assert_eq!(err.error_code(), "FORBIDDEN");
        assert!(!err.is_sensitive());
    }

    #[test]
    fn test_content_type_errors_map_to_400() {
        let malformed: AppError = ContentTypeError::Malformed("mp4".to_string()).into();
        assert!(matches!(malformed, AppError::InvalidInput(_)));
        assert_eq!(malformed.http_status_code(), 400);

        let unsupported: AppError = ContentTypeError::Unsupported {
            content_type: "image/png".to_string(),
            allowed: vec!["video/mp4".to_string()],
        }
        .into();
        assert_eq!(unsupported.error_code(), "UNSUPPORTED_MEDIA_TYPE");
        assert_eq!(unsupported.http_status_code(), 400);
        assert!(unsupported.client_message().contains("image/png"));
    }

    #[test]
    fn test_pipeline_wrapper_delegates_metadata() {
        let err = AppError::MediaRemux("ffmpeg exited with status 1".to_string())
            .at_stage(PipelineStage::Classified);

        assert_eq!(err.stage(), Some(PipelineStage::Classified));
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "MEDIA_REMUX_FAILED");
        assert_eq!(err.error_type(), "MediaRemux");
        assert!(matches!(err.root(), AppError::MediaRemux(_)));
        assert!(err.to_string().contains("normalization"));
        assert!(err.detailed_message().contains("Caused by"));
    }

    #[test]
    fn test_at_stage_keeps_first_stage() {
        let err = AppError::Storage("timeout".to_string())
            .at_stage(PipelineStage::KeyAllocated)
            .at_stage(PipelineStage::Uploaded);
        assert_eq!(err.stage(), Some(PipelineStage::KeyAllocated));
    }

    #[test]
    fn test_error_metadata_suggested_actions() {
        let err = AppError::NotFound("test".to_string());
        assert_eq!(err.suggested_action(), Some("Verify the resource ID exists"));

        let err = AppError::PayloadTooLarge("test".to_string());
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.suggested_action(), Some("Reduce file size and try again"));
    }
}
