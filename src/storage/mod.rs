/// Storage layer - the seam between the pipelines and durable object storage
///
/// All durable state lives behind the `AssetStore` trait. The production
/// implementation targets S3-compatible storage; tests inject the in-memory
/// implementation. The store is built once at startup and shared as
/// `Arc<dyn AssetStore>`.
pub mod memory;
pub mod s3;

use crate::error::Result;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

pub use memory::MemoryAssetStore;
pub use s3::S3AssetStore;

/// Canonical extension all identifier-keyed assets are stored under
pub const CANONICAL_EXT: &str = "png";

/// Prefix under which all objects live in the backing bucket
const OBJECT_PREFIX: &str = "uploads";

/// Chunked byte stream over a stored object
pub type AssetStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Derive the asset key for a caller-supplied identifier
///
/// Deterministic: the same identifier always maps to the same key, so a new
/// upload overwrites the previous object (last write wins).
pub fn asset_key(identifier: &str) -> String {
    format!("{identifier}.{CANONICAL_EXT}")
}

/// Map an asset key to its object name in the backing store
pub fn object_name(key: &str) -> String {
    format!("{OBJECT_PREFIX}/{key}")
}

/// Contract the pipelines require from the blob-storage collaborator
///
/// Implementations must be safe under concurrent calls from unrelated keys;
/// concurrent puts to the same key race and the last completed put wins.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    /// Write an object, overwriting any previous object under the key.
    /// The content type is persisted alongside the bytes as metadata.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()>;

    /// Whether an object exists under the key, reflecting the most recent
    /// completed `put`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Open a chunked read stream over the object.
    ///
    /// Callers check `exists` first, but the object may vanish in between;
    /// implementations may return `AppError::NotFound` here instead and the
    /// retrieval pipeline handles both.
    async fn open_read_stream(&self, key: &str) -> Result<AssetStream>;
}

/// Collect a full asset stream into one buffer. Test helper; the retrieval
/// path itself never buffers whole objects.
#[cfg(test)]
pub(crate) async fn collect_stream(mut stream: AssetStream) -> Result<Vec<u8>> {
    use futures::StreamExt;

    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.extend_from_slice(&chunk?);
    }
    Ok(out)
}
