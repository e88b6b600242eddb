//! Video upload pipeline
//!
//! Stage, classify, normalize, allocate a key, upload, then reconcile the owning record.

mod service;
mod types;

pub use service::VideoUploadService;
pub use types::UploadOutcome;
