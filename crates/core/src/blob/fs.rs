//! Blob store backed by the runtime directory.

use super::{blob_path, BlobHandle, BlobStore};
use crate::error::{Result, SwapError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

pub struct FsBlobStore {
    root: PathBuf,
    seq: AtomicU64,
}

impl FsBlobStore {
    /// Store rooted at `root`; blobs land in `root/blobs/`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            seq: AtomicU64::new(1),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn next_free_path(&self, suggested_name: &str) -> (BlobHandle, PathBuf) {
        loop {
            let seq = self.seq.fetch_add(1, Ordering::SeqCst);
            let handle = BlobHandle::new(blob_path(seq, suggested_name));
            let path = self.root.join(handle.as_str());
            // Files from an earlier run keep their names
            if !fs::try_exists(&path).await.unwrap_or(false) {
                return (handle, path);
            }
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<BlobHandle> {
        let (handle, path) = self.next_free_path(suggested_name).await;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                SwapError::Storage(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&path, &bytes)
            .await
            .map_err(|e| SwapError::Storage(format!("failed to write {}: {}", path.display(), e)))?;

        tracing::debug!(handle = %handle, size = bytes.len(), "Blob stored");
        Ok(handle)
    }

    async fn resolve(&self, handle: &BlobHandle) -> Result<Vec<u8>> {
        let path = self.root.join(handle.checked_path()?);
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SwapError::not_found(format!("no blob at '{}'", handle)))
            }
            Err(e) => Err(SwapError::Storage(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
