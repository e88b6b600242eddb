//! Tubely Storage Library
//!
//! Object storage abstraction for normalized video artifacts, with S3 and local
//! filesystem implementations.
//!
//! # Storage key format
//!
//! Video keys are partitioned by geometry class: `{landscape|portrait|other}/{token}{ext}`,
//! where `token` is 32 bytes from a cryptographically strong source, URL-safe base64 encoded
//! without padding. Keys must not contain `..` or a leading `/`. Key allocation lives in the
//! `keys` module so every backend sees the same layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{allocate_thumbnail_key, allocate_video_key, StorageKey, THUMBNAIL_PREFIX};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectReader, Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
