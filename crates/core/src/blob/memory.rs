//! In-process blob store, used by tests and offline demos.

use super::{blob_path, BlobHandle, BlobStore};
use crate::error::{Result, SwapError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<BlobHandle, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<BlobHandle> {
        let mut blobs = self.blobs.write().await;
        let handle = BlobHandle::new(blob_path(blobs.len() as u64 + 1, suggested_name));
        blobs.insert(handle.clone(), bytes);
        Ok(handle)
    }

    async fn resolve(&self, handle: &BlobHandle) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(handle)
            .cloned()
            .ok_or_else(|| SwapError::not_found(format!("no blob at '{}'", handle)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_uploads_with_same_name_are_kept_apart() {
        let store = MemoryBlobStore::new();
        let a = store.store(vec![1], "hat.png").await.unwrap();
        let b = store.store(vec![2], "hat.png").await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.resolve(&a).await.unwrap(), vec![1]);
        assert_eq!(store.len().await, 2);
    }
}
