//! Protocol Bridge Operation Tests
//!
//! Exercises the bridge's contract over the in-memory store:
//! - rejected writes never create objects
//! - write/read round trips
//! - delete idempotence
//! - the root and nonexistent paths stat as directories
//! - listings agree with per-key stats

use std::sync::Arc;

use blobdav::bridge::{Bridge, BridgeError, ResourceStat};
use blobdav::store::{ByteStream, MemoryStore, ObjectStore, StoreError};
use bytes::Bytes;
use futures_util::StreamExt;

// =============================================================================
// Test Utilities
// =============================================================================

fn setup() -> (Arc<MemoryStore>, Bridge<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let bridge = Bridge::new(store.clone(), "/blob");
    (store, bridge)
}

fn body(data: &'static [u8]) -> ByteStream {
    Box::pin(futures_util::stream::once(async move {
        Ok(Bytes::from_static(data))
    }))
}

/// A body arriving in several chunks, as a streaming client would send it.
fn chunked_body(chunks: Vec<&'static [u8]>) -> ByteStream {
    Box::pin(futures_util::stream::iter(
        chunks
            .into_iter()
            .map(|c| Ok::<_, StoreError>(Bytes::from_static(c))),
    ))
}

async fn collect(mut stream: ByteStream) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.extend_from_slice(&chunk.unwrap());
    }
    out
}

// =============================================================================
// Write policy
// =============================================================================

#[tokio::test]
async fn disallowed_extension_creates_no_object() {
    let (store, bridge) = setup();

    let err = bridge
        .write("/blob/evil.exe", None, body(b"payload"))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::DisallowedType(_)));

    assert!(store.list().await.unwrap().is_empty());
    assert!(store.stat("evil.exe").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn extensionless_write_without_hint_is_rejected() {
    let (store, bridge) = setup();

    let err = bridge.write("/blob/photo", None, body(b"x")).await.unwrap_err();
    assert!(matches!(err, BridgeError::DisallowedType(_)));
    assert!(store.list().await.unwrap().is_empty());
}

// =============================================================================
// Round trips
// =============================================================================

#[tokio::test]
async fn write_then_read_round_trips() {
    let (store, bridge) = setup();

    bridge
        .write("/blob/a.jpg", Some("image/jpeg"), body(b"jpeg bytes"))
        .await
        .unwrap();

    let stream = bridge.open_read("/blob/a.jpg").await.unwrap();
    assert_eq!(collect(stream).await, b"jpeg bytes");
    assert_eq!(store.content_type_of("a.jpg").as_deref(), Some("image/jpeg"));
}

#[tokio::test]
async fn chunked_write_preserves_order() {
    let (_, bridge) = setup();

    bridge
        .write(
            "/blob/clip.mp4",
            Some("video/mp4"),
            chunked_body(vec![b"first ", b"second ", b"third"]),
        )
        .await
        .unwrap();

    let stream = bridge.open_read("/blob/clip.mp4").await.unwrap();
    assert_eq!(collect(stream).await, b"first second third");
}

#[tokio::test]
async fn overwrite_replaces_contents() {
    let (_, bridge) = setup();

    bridge
        .write("/blob/a.jpg", Some("image/jpeg"), body(b"old"))
        .await
        .unwrap();
    bridge
        .write("/blob/a.jpg", Some("image/jpeg"), body(b"new bytes"))
        .await
        .unwrap();

    let stream = bridge.open_read("/blob/a.jpg").await.unwrap();
    assert_eq!(collect(stream).await, b"new bytes");
}

#[tokio::test]
async fn read_of_missing_key_is_not_found() {
    let (_, bridge) = setup();
    let err = bridge
        .open_read("/blob/missing.jpg")
        .await
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(err, BridgeError::NotFound(_)));
}

// =============================================================================
// Delete idempotence
// =============================================================================

#[tokio::test]
async fn delete_is_idempotent() {
    let (_, bridge) = setup();

    bridge
        .write("/blob/a.jpg", Some("image/jpeg"), body(b"x"))
        .await
        .unwrap();

    bridge.remove("/blob/a.jpg").await.unwrap();
    // Second delete with no intervening write must also succeed.
    bridge.remove("/blob/a.jpg").await.unwrap();
    // As must deleting a key that never existed.
    bridge.remove("/blob/never.png").await.unwrap();
}

// =============================================================================
// Stat semantics
// =============================================================================

#[tokio::test]
async fn root_always_stats_as_directory() {
    let (_, bridge) = setup();
    assert!(bridge.stat("/blob").await.unwrap().is_directory());
    assert!(bridge.stat("/blob/").await.unwrap().is_directory());

    bridge
        .write("/blob/a.jpg", Some("image/jpeg"), body(b"x"))
        .await
        .unwrap();
    assert!(bridge.stat("/blob").await.unwrap().is_directory());
}

#[tokio::test]
async fn nonexistent_path_stats_as_directory() {
    let (_, bridge) = setup();
    // Documented quirk: a missing key is reported as an empty directory,
    // not an error, so probing clients keep working.
    assert!(bridge.stat("/blob/no-such-file.jpg").await.unwrap().is_directory());
    assert!(bridge.stat("/blob/fake-subdir").await.unwrap().is_directory());
}

#[tokio::test]
async fn existing_key_stats_as_file_with_size() {
    let (_, bridge) = setup();
    bridge
        .write("/blob/a.jpg", Some("image/jpeg"), body(b"0123456789"))
        .await
        .unwrap();

    match bridge.stat("/blob/a.jpg").await.unwrap() {
        ResourceStat::File { size, .. } => assert_eq!(size, 10),
        ResourceStat::Directory => panic!("expected file"),
    }
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn list_matches_stat_file_set() {
    let (_, bridge) = setup();

    bridge
        .write("/blob/a.jpg", Some("image/jpeg"), body(b"a"))
        .await
        .unwrap();
    bridge
        .write("/blob/b.mp4", Some("video/mp4"), body(b"b"))
        .await
        .unwrap();

    let entries = bridge.list().await.unwrap();
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["/blob/a.jpg", "/blob/b.mp4"]);

    // Every listed path stats as a file.
    for entry in &entries {
        assert!(!bridge.stat(&entry.path).await.unwrap().is_directory());
    }

    bridge.remove("/blob/a.jpg").await.unwrap();
    let entries = bridge.list().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "/blob/b.mp4");
}

#[tokio::test]
async fn keys_with_separators_list_flat() {
    let (_, bridge) = setup();
    bridge
        .write("/blob/trips/rome.mp4", Some("video/mp4"), body(b"v"))
        .await
        .unwrap();

    let entries = bridge.list().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, "trips/rome.mp4");
    assert_eq!(entries[0].path, "/blob/trips/rome.mp4");
}

// =============================================================================
// Extension inference scenario
// =============================================================================

#[tokio::test]
async fn extensionless_write_infers_key_from_content_type() {
    let (store, bridge) = setup();

    let record = bridge
        .write("/blob/photo", Some("image/jpg"), body(b"twelve bytes"))
        .await
        .unwrap();
    assert_eq!(record.key, "photo.jpg");

    let stream = bridge.open_read("/blob/photo.jpg").await.unwrap();
    assert_eq!(collect(stream).await, b"twelve bytes");

    let entries = bridge.list().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, "photo.jpg");
    assert_eq!(entries[0].size, 12);

    // The original extensionless path does not exist as a file.
    assert!(store.stat("photo").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn quicktime_upload_gets_mov_suffix() {
    let (_, bridge) = setup();
    let record = bridge
        .write("/blob/clip", Some("video/quicktime"), body(b"qt"))
        .await
        .unwrap();
    assert_eq!(record.key, "clip.mov");
}
