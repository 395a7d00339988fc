//! # Remote Blob Service Client
//!
//! reqwest-backed implementation of [`ObjectStore`] and [`ByteRelay`]
//! against the blob service REST surface:
//!
//! - `PUT    {base}/{key}` — create/overwrite; an empty body with the
//!   `x-defer-body` header mints a write target instead of storing bytes
//! - `GET    {base}/{key}` — metadata record as JSON (bytes live at the
//!   record's URL, not here)
//! - `DELETE {base}/{key}` — 404 is not an error
//! - `GET    {base}/?cursor=…` — paginated listing
//!
//! All requests carry the service token as a bearer credential.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::TryStreamExt;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Body, Client, StatusCode};
use serde::Deserialize;

use super::client::{ByteRelay, ByteStream, ObjectStore};
use super::errors::{StoreError, StoreResult};
use super::record::{ObjectMeta, ObjectRecord};

/// Characters escaped when a key is embedded in a request path. Embedded
/// `/` separators are kept as-is: the store namespace is flat, but keys
/// may carry them.
const KEY_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'%');

#[derive(Debug, Deserialize)]
struct ListPage {
    blobs: Vec<ObjectRecord>,
    #[serde(default)]
    cursor: Option<String>,
}

/// Client for the remote blob service
#[derive(Debug, Clone)]
pub struct HttpStore {
    http: Client,
    base_url: String,
    token: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn key_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            utf8_percent_encode(key, KEY_ESCAPE)
        )
    }

    /// Decode a JSON record body, mapping malformed payloads to a
    /// protocol error rather than a transport one.
    async fn decode_record(resp: reqwest::Response) -> StoreResult<ObjectRecord> {
        resp.json::<ObjectRecord>()
            .await
            .map_err(|e| StoreError::Protocol(format!("malformed record: {}", e)))
    }

    fn unexpected(status: StatusCode) -> StoreError {
        StoreError::Unavailable(format!("blob service returned {}", status))
    }
}

#[async_trait]
impl ObjectStore for HttpStore {
    async fn put(
        &self,
        key: &str,
        data: Option<Bytes>,
        content_type: &str,
    ) -> StoreResult<ObjectRecord> {
        let mut req = self
            .http
            .put(self.key_url(key))
            .bearer_auth(&self.token)
            .header("content-type", content_type);

        req = match data {
            Some(bytes) => req.body(bytes),
            // No body: the service allocates the object and returns a
            // record whose URL accepts the bytes later.
            None => req.header("x-defer-body", "1"),
        };

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(Self::unexpected(resp.status()));
        }
        Self::decode_record(resp).await
    }

    async fn fetch(&self, key: &str) -> StoreResult<ObjectRecord> {
        let resp = self
            .http
            .get(self.key_url(key))
            .bearer_auth(&self.token)
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(key.to_string())),
            s if s.is_success() => Self::decode_record(resp).await,
            s => Err(Self::unexpected(s)),
        }
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let resp = self
            .http
            .delete(self.key_url(key))
            .bearer_auth(&self.token)
            .send()
            .await?;

        match resp.status() {
            // Deleting an absent key is success per the idempotence contract.
            StatusCode::NOT_FOUND => Ok(()),
            s if s.is_success() => Ok(()),
            s => Err(Self::unexpected(s)),
        }
    }

    async fn stat(&self, key: &str) -> StoreResult<ObjectMeta> {
        let record = self.fetch(key).await?;
        Ok(ObjectMeta::from(&record))
    }

    async fn list(&self) -> StoreResult<Vec<ObjectRecord>> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        // The service paginates; callers get the exhaustive flat set.
        loop {
            let mut req = self
                .http
                .get(format!("{}/", self.base_url))
                .bearer_auth(&self.token);
            if let Some(c) = &cursor {
                req = req.query(&[("cursor", c.as_str())]);
            }

            let resp = req.send().await?;
            if !resp.status().is_success() {
                return Err(Self::unexpected(resp.status()));
            }

            let page: ListPage = resp
                .json()
                .await
                .map_err(|e| StoreError::Protocol(format!("malformed listing: {}", e)))?;
            records.extend(page.blobs);

            match page.cursor {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl ByteRelay for HttpStore {
    async fn open_download(&self, url: &str) -> StoreResult<ByteStream> {
        let resp = self.http.get(url).send().await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(url.to_string())),
            s if s.is_success() => {
                let stream = resp.bytes_stream().map_err(StoreError::from);
                Ok(Box::pin(stream))
            }
            s => Err(Self::unexpected(s)),
        }
    }

    async fn upload(&self, url: &str, content_type: &str, body: ByteStream) -> StoreResult<()> {
        let resp = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .header("content-type", content_type)
            .body(Body::wrap_stream(body))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::unexpected(resp.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_url_escapes() {
        let store = HttpStore::new("https://blob.example/v1/", "tok");
        assert_eq!(store.key_url("a.jpg"), "https://blob.example/v1/a.jpg");
        assert_eq!(
            store.key_url("my photo.jpg"),
            "https://blob.example/v1/my%20photo.jpg"
        );
        // Embedded separators pass through unescaped.
        assert_eq!(
            store.key_url("trips/rome.mp4"),
            "https://blob.example/v1/trips/rome.mp4"
        );
    }

    #[test]
    fn test_list_page_decodes() {
        let json = r#"{"blobs":[{"key":"a.jpg","url":"u","size":1,"uploadedAt":"2024-05-01T10:00:00Z"}],"cursor":null}"#;
        let page: ListPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.blobs.len(), 1);
        assert!(page.cursor.is_none());
    }
}
