//! Tubely API Library
//!
//! This crate provides the HTTP handlers, bearer authentication, the upload pipeline
//! service and application setup.

mod api_doc;
mod handlers;
mod services;
pub mod setup;
mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::{ThumbnailUploadService, UploadOutcome, VideoUploadService};
pub use state::{AppState, MediaState};
