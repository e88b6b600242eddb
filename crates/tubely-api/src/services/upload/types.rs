//! Types used by the video upload service

use tubely_core::models::Video;
use tubely_processing::VideoGeometry;
use tubely_storage::StorageKey;

/// Result of a completed pipeline run
pub struct UploadOutcome {
    /// The record as persisted by the reconciler
    pub video: Video,
    /// Key the normalized artifact was stored under
    pub storage_key: StorageKey,
    pub geometry: VideoGeometry,
    /// Bytes written to the object store
    pub stored_bytes: u64,
}
