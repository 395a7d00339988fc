//! # Object Store Traits
//!
//! Capability surface over the remote blob service. No protocol knowledge:
//! the bridge translates WebDAV semantics onto these five operations.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use super::errors::StoreResult;
use super::record::{ObjectMeta, ObjectRecord};

/// A stream of body chunks flowing to or from an object URL.
pub type ByteStream = BoxStream<'static, StoreResult<Bytes>>;

/// The five store operations. Implementations hold no per-request state
/// and are shared by reference across concurrent requests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create or overwrite the object at `key`. With `data: None` the call
    /// only mints a write target: the returned record's URL accepts a
    /// subsequent byte transfer (see [`ByteRelay::upload`]).
    async fn put(
        &self,
        key: &str,
        data: Option<Bytes>,
        content_type: &str,
    ) -> StoreResult<ObjectRecord>;

    /// Resolve a key to its current fetch locator and metadata.
    async fn fetch(&self, key: &str) -> StoreResult<ObjectRecord>;

    /// Idempotent: deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    async fn stat(&self, key: &str) -> StoreResult<ObjectMeta>;

    /// Full flat listing of live objects. Implementations exhaust any
    /// service-side pagination before returning.
    async fn list(&self) -> StoreResult<Vec<ObjectRecord>>;
}

/// URL-addressed byte transfer, separate from the key-addressed operations
/// above because the service splits "allocate a write target" from
/// "transfer bytes".
#[async_trait]
pub trait ByteRelay: Send + Sync {
    /// Open a pass-through download stream from a resolved object URL.
    async fn open_download(&self, url: &str) -> StoreResult<ByteStream>;

    /// Stream a request body to a minted upload URL. Consumes the inbound
    /// stream incrementally; a mid-stream error aborts the transfer.
    async fn upload(&self, url: &str, content_type: &str, body: ByteStream) -> StoreResult<()>;
}
