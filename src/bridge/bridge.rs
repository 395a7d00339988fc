//! # Protocol Bridge
//!
//! Translates the file-protocol operation set (read-stream, write-stream,
//! delete, stat, list-directory) into object-store calls, applying the
//! type policy on writes and presenting the flat key space as a
//! single-level directory tree under the mount prefix.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::policy;
use crate::store::{ByteRelay, ByteStream, ObjectRecord, ObjectStore};

use super::errors::{BridgeError, BridgeResult};
use super::path::Mount;

/// What a stat reports for a protocol path.
#[derive(Debug, Clone)]
pub enum ResourceStat {
    /// The synthetic root, or any path with no backing object. Nonexistent
    /// paths deliberately stat as directories so clients probing for
    /// subdirectories keep working; see [`Bridge::stat`].
    Directory,
    File {
        size: u64,
        modified: DateTime<Utc>,
        created: DateTime<Utc>,
    },
}

impl ResourceStat {
    pub fn is_directory(&self) -> bool {
        matches!(self, ResourceStat::Directory)
    }
}

/// A listed child of the mount root.
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// Full protocol path (mount prefix included).
    pub path: String,
    pub key: String,
    pub url: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// The protocol bridge. Holds no per-request state; one instance is
/// shared by reference across concurrent requests.
pub struct Bridge<S> {
    store: Arc<S>,
    mount: Mount,
}

impl<S: ObjectStore + ByteRelay> Bridge<S> {
    pub fn new(store: Arc<S>, mount_prefix: &str) -> Self {
        Self {
            store,
            mount: Mount::new(mount_prefix),
        }
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    /// Key for a path that must name an object (not the root).
    fn object_key(&self, path: &str) -> BridgeResult<String> {
        match self.mount.key_of(path) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(BridgeError::NotFound(path.to_string())),
        }
    }

    /// Open a pass-through read stream for the object at `path`.
    pub async fn open_read(&self, path: &str) -> BridgeResult<ByteStream> {
        let key = self.object_key(path)?;
        let record = self.store.fetch(&key).await?;
        Ok(self.store.open_download(&record.url).await?)
    }

    /// Stream an inbound body into the object at `path`.
    ///
    /// The extension is validated before any store call, so a rejected
    /// write never creates a partial object. A path without an extension
    /// gets one inferred from the content-type hint when possible. The
    /// store's native overwrite applies to existing keys (last write
    /// wins); the bridge adds no serialization.
    pub async fn write(
        &self,
        path: &str,
        content_type: Option<&str>,
        body: ByteStream,
    ) -> BridgeResult<ObjectRecord> {
        let key = self.object_key(path)?;
        let key = resolve_write_key(&key, content_type)?;
        let content_type = content_type.unwrap_or("application/octet-stream");

        // Mint the write target, then relay chunks as they arrive. A
        // mid-stream failure surfaces here; the store-side state of the
        // aborted object is the store's business, not ours.
        let record = self.store.put(&key, None, content_type).await?;
        self.store.upload(&record.url, content_type, body).await?;

        // Re-resolve for the final size and timestamp.
        Ok(self.store.fetch(&key).await?)
    }

    /// Delete the object at `path`. Always succeeds for absent keys.
    pub async fn remove(&self, path: &str) -> BridgeResult<()> {
        let key = match self.mount.key_of(path) {
            Some(key) if !key.is_empty() => key,
            // Root or out-of-mount: nothing to delete, and delete never
            // reports NotFound.
            _ => return Ok(()),
        };
        Ok(self.store.delete(&key).await?)
    }

    /// Stat a protocol path.
    ///
    /// The root is always a directory. A path with a backing object is a
    /// file (modified = store upload time; the store keeps no separate
    /// creation time, so created = now). A path with no backing object is
    /// reported as an empty directory rather than an error.
    pub async fn stat(&self, path: &str) -> BridgeResult<ResourceStat> {
        let key = self
            .mount
            .key_of(path)
            .ok_or_else(|| BridgeError::NotFound(path.to_string()))?;
        if key.is_empty() {
            return Ok(ResourceStat::Directory);
        }

        match self.store.stat(&key).await {
            Ok(meta) => Ok(ResourceStat::File {
                size: meta.size,
                modified: meta.uploaded_at,
                created: Utc::now(),
            }),
            Err(e) if e.is_not_found() => {
                debug!(key = %key, "stat miss remapped to synthetic directory");
                Ok(ResourceStat::Directory)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List every object as a direct child of the mount root. Keys with
    /// embedded separators are still reported flat; the store has no
    /// directory concept to mirror.
    pub async fn list(&self) -> BridgeResult<Vec<DirEntry>> {
        let records = self.store.list().await?;
        Ok(records
            .into_iter()
            .map(|r| DirEntry {
                path: self.mount.path_of(&r.key),
                key: r.key,
                url: r.url,
                size: r.size,
                modified: r.uploaded_at,
            })
            .collect())
    }
}

/// Apply the extension policy to a write key, inferring a suffix from the
/// content type when the key has none.
fn resolve_write_key(key: &str, content_type: Option<&str>) -> BridgeResult<String> {
    match policy::extension_of(key) {
        Some(ext) if policy::is_allowed_extension(ext) => Ok(key.to_string()),
        Some(ext) => Err(BridgeError::DisallowedType(ext.to_string())),
        None => {
            let inferred = content_type
                .and_then(policy::infer_extension)
                .filter(|ext| policy::is_allowed_extension(ext))
                .ok_or_else(|| BridgeError::DisallowedType(key.to_string()))?;
            Ok(format!("{}{}", key, inferred))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_write_key_allowed() {
        assert_eq!(resolve_write_key("a.jpg", None).unwrap(), "a.jpg");
        assert_eq!(
            resolve_write_key("clip.MOV", Some("video/quicktime")).unwrap(),
            "clip.MOV"
        );
    }

    #[test]
    fn test_resolve_write_key_rejected() {
        let err = resolve_write_key("evil.exe", None).unwrap_err();
        assert!(matches!(err, BridgeError::DisallowedType(_)));
    }

    #[test]
    fn test_resolve_write_key_infers_from_content_type() {
        assert_eq!(
            resolve_write_key("photo", Some("image/jpeg")).unwrap(),
            "photo.jpeg"
        );
        assert_eq!(
            resolve_write_key("clip", Some("video/quicktime")).unwrap(),
            "clip.mov"
        );
    }

    #[test]
    fn test_resolve_write_key_no_hint_rejected() {
        assert!(resolve_write_key("photo", None).is_err());
        assert!(resolve_write_key("doc", Some("application/pdf")).is_err());
    }
}
