//! # In-Process Store
//!
//! Implements the store traits over a `HashMap`, with `mem://` URLs
//! standing in for the service's fetch locators. Models the
//! mint-then-transfer split: an object minted with `put(key, None, …)`
//! stays invisible to `fetch`/`stat`/`list` until its bytes arrive via
//! [`ByteRelay::upload`]. Used by the test suites.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use chrono::Utc;
use futures_util::StreamExt;

use super::client::{ByteRelay, ByteStream, ObjectStore};
use super::errors::{StoreError, StoreResult};
use super::record::{ObjectMeta, ObjectRecord};

#[derive(Debug, Clone)]
struct StoredObject {
    record: ObjectRecord,
    data: Bytes,
    content_type: String,
    /// Minted but not yet written; hidden from lookups and listings.
    pending: bool,
}

/// In-memory object store
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn url_for(key: &str) -> String {
        format!("mem://{}", key)
    }

    fn key_from_url(url: &str) -> StoreResult<String> {
        url.strip_prefix("mem://")
            .map(str::to_string)
            .ok_or_else(|| StoreError::Protocol(format!("not a mem:// url: {}", url)))
    }

    /// Content type recorded for a stored key, for assertions in tests.
    pub fn content_type_of(&self, key: &str) -> Option<String> {
        let objects = self.objects.read().ok()?;
        objects
            .get(key)
            .filter(|o| !o.pending)
            .map(|o| o.content_type.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        data: Option<Bytes>,
        content_type: &str,
    ) -> StoreResult<ObjectRecord> {
        let pending = data.is_none();
        let data = data.unwrap_or_default();
        let record = ObjectRecord {
            key: key.to_string(),
            url: Self::url_for(key),
            size: data.len() as u64,
            uploaded_at: Utc::now(),
        };

        let mut objects = self
            .objects
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                record: record.clone(),
                data,
                content_type: content_type.to_string(),
                pending,
            },
        );

        Ok(record)
    }

    async fn fetch(&self, key: &str) -> StoreResult<ObjectRecord> {
        let objects = self
            .objects
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        objects
            .get(key)
            .filter(|o| !o.pending)
            .map(|o| o.record.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        objects.remove(key);
        Ok(())
    }

    async fn stat(&self, key: &str) -> StoreResult<ObjectMeta> {
        let record = self.fetch(key).await?;
        Ok(ObjectMeta::from(&record))
    }

    async fn list(&self) -> StoreResult<Vec<ObjectRecord>> {
        let objects = self
            .objects
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        let mut records: Vec<ObjectRecord> = objects
            .values()
            .filter(|o| !o.pending)
            .map(|o| o.record.clone())
            .collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(records)
    }
}

#[async_trait]
impl ByteRelay for MemoryStore {
    async fn open_download(&self, url: &str) -> StoreResult<ByteStream> {
        let key = Self::key_from_url(url)?;
        let data = {
            let objects = self
                .objects
                .read()
                .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
            objects
                .get(&key)
                .filter(|o| !o.pending)
                .map(|o| o.data.clone())
                .ok_or(StoreError::NotFound(key))?
        };
        Ok(Box::pin(futures_util::stream::once(async move { Ok(data) })))
    }

    async fn upload(&self, url: &str, content_type: &str, mut body: ByteStream) -> StoreResult<()> {
        let key = Self::key_from_url(url)?;

        let mut buf = BytesMut::new();
        while let Some(chunk) = body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        let data = buf.freeze();

        let mut objects = self
            .objects
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        let entry = objects
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        entry.record.size = data.len() as u64;
        entry.record.uploaded_at = Utc::now();
        entry.data = data;
        entry.content_type = content_type.to_string();
        entry.pending = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_fetch_roundtrip() {
        let store = MemoryStore::new();
        store
            .put("a.jpg", Some(Bytes::from_static(b"abc")), "image/jpeg")
            .await
            .unwrap();

        let record = store.fetch("a.jpg").await.unwrap();
        assert_eq!(record.size, 3);
        assert_eq!(record.url, "mem://a.jpg");
    }

    #[tokio::test]
    async fn test_minted_object_hidden_until_upload() {
        let store = MemoryStore::new();
        let record = store.put("b.mp4", None, "video/mp4").await.unwrap();

        assert!(store.fetch("b.mp4").await.unwrap_err().is_not_found());
        assert!(store.list().await.unwrap().is_empty());

        let body: ByteStream =
            Box::pin(futures_util::stream::once(async { Ok(Bytes::from_static(b"chunk")) }));
        store.upload(&record.url, "video/mp4", body).await.unwrap();

        let fetched = store.fetch("b.mp4").await.unwrap();
        assert_eq!(fetched.size, 5);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_idempotent() {
        let store = MemoryStore::new();
        store
            .put("c.png", Some(Bytes::from_static(b"x")), "image/png")
            .await
            .unwrap();

        store.delete("c.png").await.unwrap();
        store.delete("c.png").await.unwrap();
        assert!(store.stat("c.png").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_download_stream() {
        let store = MemoryStore::new();
        store
            .put("d.gif", Some(Bytes::from_static(b"gifdata")), "image/gif")
            .await
            .unwrap();

        let mut stream = store.open_download("mem://d.gif").await.unwrap();
        let chunk = stream.next().await.unwrap().unwrap();
        assert_eq!(&chunk[..], b"gifdata");
    }
}
