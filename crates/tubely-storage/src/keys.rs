//! Storage key allocation for uploaded videos and thumbnails.
//!
//! Key format: `{prefix}/{token}{extension}`, where the prefix is the geometry class for
//! videos and `thumbnails` for still images. The token carries 256 bits from the
//! thread-local CSPRNG. Uniqueness is probabilistic; no existence check is made before use.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use std::fmt::{Display, Formatter, Result as FmtResult};
use tubely_core::{ContentType, ContentTypeError, GeometryClass};

use crate::traits::{StorageError, StorageResult};

/// Random bytes per key token.
pub const KEY_TOKEN_BYTES: usize = 32;

/// Prefix for thumbnail images.
pub const THUMBNAIL_PREFIX: &str = "thumbnails";

/// An allocated object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    key: String,
    prefix_len: usize,
}

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn prefix(&self) -> &str {
        &self.key[..self.prefix_len]
    }

    /// Final path segment: token plus extension.
    pub fn file_name(&self) -> &str {
        &self.key[self.prefix_len + 1..]
    }

    pub fn into_string(self) -> String {
        self.key
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

fn random_token() -> String {
    let mut bytes = [0u8; KEY_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn allocate(prefix: &str, content_type: &str) -> Result<StorageKey, ContentTypeError> {
    let content_type = ContentType::parse(content_type)?;

    Ok(StorageKey {
        key: format!("{}/{}{}", prefix, random_token(), content_type.extension()),
        prefix_len: prefix.len(),
    })
}

/// Allocate a fresh key for a video of the given geometry class and declared content type.
///
/// Fails with [`ContentTypeError::Malformed`] when `content_type` is not a `type/subtype` pair.
pub fn allocate_video_key(
    class: GeometryClass,
    content_type: &str,
) -> Result<StorageKey, ContentTypeError> {
    allocate(class.canonical_name(), content_type)
}

/// Allocate a fresh key for a thumbnail image.
pub fn allocate_thumbnail_key(content_type: &str) -> Result<StorageKey, ContentTypeError> {
    allocate(THUMBNAIL_PREFIX, content_type)
}

/// Reject keys that could escape a backend's namespace.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') || storage_key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
