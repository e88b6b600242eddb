//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that converts into
//! `AppError` converts into `HttpAppError` and renders as an [`ErrorResponse`].
//! [`redact_error_details`] strips diagnostic fields from those bodies when the configured
//! environment does not expose them.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tubely_core::{AppError, ErrorMetadata, LogLevel};
use tubely_storage::StorageError;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Upload step that failed (e.g. "classification", "upload")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            error_type: None,
            code: code.into(),
            recoverable: false,
            stage: None,
            suggested_action: None,
        }
    }

    /// Drop the diagnostic fields, keeping what a client needs to react.
    pub fn without_details(mut self) -> Self {
        self.details = None;
        self.error_type = None;
        self
    }
}

/// Whether error bodies carry diagnostic details. Derived from the configured environment.
#[derive(Debug, Clone, Copy)]
pub struct ErrorDetails {
    pub expose: bool,
}

impl ErrorDetails {
    pub fn from_config(config: &tubely_core::Config) -> Self {
        Self {
            expose: !config.is_production(),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: IntoResponse and AppError are both foreign here)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_error(err))
    }
}

/// Map a storage failure into the application taxonomy.
pub fn storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::UploadFailed(msg) => AppError::Storage(format!("Upload failed: {}", msg)),
        StorageError::Unavailable(msg) => {
            AppError::Storage(format!("Storage unavailable: {}", msg))
        }
        StorageError::BackendError(msg) => AppError::Storage(msg),
        StorageError::InvalidKey(msg) => AppError::Internal(format!("Invalid storage key: {}", msg)),
        StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
        StorageError::ConfigError(msg) => AppError::Internal(msg),
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let stage = error.stage().map(|s| s.pending_step()).unwrap_or("none");
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, stage = stage, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, stage = stage, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, stage = stage, "Error occurred");
        }
    }
}

impl HttpAppError {
    fn to_error_response(&self) -> ErrorResponse {
        let app_error = &self.0;
        let (details, error_type) = if app_error.is_sensitive() {
            (None, None)
        } else {
            (
                Some(app_error.detailed_message()),
                Some(app_error.error_type().to_string()),
            )
        };

        ErrorResponse {
            error: app_error.client_message(),
            details,
            error_type,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            stage: app_error.stage().map(|s| s.pending_step().to_string()),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.0);

        let body = self.to_error_response();
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Re-render error bodies without details unless the environment exposes them.
pub async fn redact_error_details(
    State(policy): State<ErrorDetails>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    if policy.expose {
        return response;
    }
    match response.extensions_mut().remove::<ErrorResponse>() {
        Some(body) => (response.status(), Json(body.without_details())).into_response(),
        None => response,
    }
}
