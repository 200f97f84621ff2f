/// In-memory implementation of the asset store
///
/// Backs handler and pipeline tests; mirrors the overwrite and not-found
/// semantics of the S3 implementation without the network.
use crate::error::{AppError, Result};
use crate::storage::{AssetStore, AssetStream};
use bytes::Bytes;
use futures::stream;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Clone, Debug)]
struct StoredObject {
    bytes: Bytes,
    content_type: String,
}

/// Asset store held entirely in process memory
#[derive(Default)]
pub struct MemoryAssetStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content type recorded for a key, if present
    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .ok()?
            .get(key)
            .map(|o| o.content_type.clone())
    }

    /// Raw stored bytes for a key, if present
    pub fn bytes_of(&self, key: &str) -> Option<Bytes> {
        self.objects.read().ok()?.get(key).map(|o| o.bytes.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl AssetStore for MemoryAssetStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| AppError::Store("memory store poisoned".to_string()))?;

        // Overwrite semantics: last write wins
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let objects = self
            .objects
            .read()
            .map_err(|_| AppError::Store("memory store poisoned".to_string()))?;
        Ok(objects.contains_key(key))
    }

    async fn open_read_stream(&self, key: &str) -> Result<AssetStream> {
        let bytes = self.bytes_of(key).ok_or(AppError::NotFound)?;

        // Yield in chunks so consumers exercise real multi-chunk streaming
        let chunks: Vec<Result<Bytes>> = bytes
            .chunks(16 * 1024)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();

        Ok(Box::pin(stream::iter(chunks)))
    }
}
