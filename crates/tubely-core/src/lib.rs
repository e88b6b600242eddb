//! Tubely Core Library
//!
//! This crate provides the domain models, error types, configuration and content-type
//! parsing shared by every Tubely component.

pub mod config;
pub mod content_type;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, VideoServiceConfig};
pub use content_type::{ContentType, ContentTypeError};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{GeometryClass, LocatorMode, PipelineStage};
pub use storage_types::StorageBackend;
