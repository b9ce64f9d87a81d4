//! # Blob Storage
//!
//! Opaque storage for listing images. Callers get a [`BlobHandle`] back from
//! `store` and hand it to `resolve` for display.
//!
//! Uploaded names are sanitized and prefixed with a sequence number, so two
//! uploads called `photo.png` end up as `blobs/0001_photo.png` and
//! `blobs/0002_photo.png`.
//!
//! The demo catalog and profile point at `images/*.png` handles. Those are
//! not uploads: they resolve only once the demo images have been copied into
//! the [`SEED_IMAGE_DIR`] directory under the store root, and are `NotFound`
//! until then. `switchd init` creates the empty directory.

mod fs;
mod memory;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

use crate::error::{Result, SwapError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directory under the store root holding the demo listing images
pub const SEED_IMAGE_DIR: &str = "images";

/// Relative path of a stored blob
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobHandle(String);

impl BlobHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Reject handles that could escape the store root
    pub(crate) fn checked_path(&self) -> Result<&str> {
        let path = self.0.as_str();
        let escapes = path.is_empty()
            || path.starts_with('/')
            || path.starts_with('\\')
            || path.contains(':')
            || path.split(['/', '\\']).any(|part| part == "..");
        if escapes {
            return Err(SwapError::not_found(format!("no blob at '{}'", path)));
        }
        Ok(path)
    }
}

impl fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes`, deriving the stored name from `suggested_name`
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<BlobHandle>;

    /// Read back a stored blob
    async fn resolve(&self, handle: &BlobHandle) -> Result<Vec<u8>>;
}

/// Reduce an uploaded file name to a safe single path component
pub fn sanitize_name(suggested: &str) -> String {
    let base = suggested.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

pub(crate) fn blob_path(seq: u64, suggested_name: &str) -> String {
    format!("blobs/{:04}_{}", seq, sanitize_name(suggested_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_name("C:\\Users\\me\\red shirt.png"), "red_shirt.png");
        assert_eq!(sanitize_name(".hidden"), "hidden");
        assert_eq!(sanitize_name(""), "upload");
    }

    #[test]
    fn test_blob_path_prefix() {
        assert_eq!(blob_path(7, "hat.png"), "blobs/0007_hat.png");
    }

    #[test]
    fn test_checked_path_rejects_escapes() {
        assert!(BlobHandle::new("../secret").checked_path().is_err());
        assert!(BlobHandle::new("/etc/passwd").checked_path().is_err());
        assert!(BlobHandle::new("images/redshirt.png").checked_path().is_ok());
    }
}
