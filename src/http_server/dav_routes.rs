//! WebDAV Routes
//!
//! Serves the mount as a WebDAV collection. PROPFIND is not a method
//! axum's routers know, so every request under the mount lands in one
//! handler that dispatches on the method string after basic auth.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use futures_util::TryStreamExt;
use tracing::{debug, warn};

use crate::bridge::{Bridge, BridgeError, ResourceStat};
use crate::store::{ByteRelay, ObjectStore, StoreError};

use super::auth;
use super::config::Credentials;
use super::xml::{self, DavResource};

/// State shared by the DAV handlers
pub struct DavState<S> {
    pub bridge: Bridge<S>,
    pub credentials: Credentials,
}

/// Create the DAV routes for the bridge's mount prefix.
pub fn dav_routes<S>(state: Arc<DavState<S>>) -> Router
where
    S: ObjectStore + ByteRelay + 'static,
{
    let prefix = state.bridge.mount().prefix().to_string();
    // Clients address the collection both with and without a trailing
    // slash; the wildcard route does not match the bare "{prefix}/".
    Router::new()
        .route(&prefix, any(dav_handler::<S>))
        .route(&format!("{}/", prefix), any(dav_handler::<S>))
        .route(&format!("{}/*rest", prefix), any(dav_handler::<S>))
        .with_state(state)
}

async fn dav_handler<S>(State(state): State<Arc<DavState<S>>>, req: Request) -> Response
where
    S: ObjectStore + ByteRelay + 'static,
{
    if !auth::authorized(req.headers(), &state.credentials) {
        return auth::challenge();
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    debug!(%method, path = %path, "dav request");

    match method.as_str() {
        "OPTIONS" => options_response(),
        "PROPFIND" => propfind(&state, &path, depth_of(req.headers())).await,
        "GET" => read_object(&state, &path).await,
        "HEAD" => head_object(&state, &path).await,
        "PUT" => write_object(&state, &path, req).await,
        "DELETE" => delete_object(&state, &path).await,
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

/// PROPFIND Depth header; anything but an explicit `0` lists children.
fn depth_of(headers: &HeaderMap) -> u8 {
    match headers.get("depth").and_then(|v| v.to_str().ok()) {
        Some("0") => 0,
        _ => 1,
    }
}

fn options_response() -> Response {
    (
        StatusCode::OK,
        [
            (header::ALLOW, "OPTIONS, GET, HEAD, PUT, DELETE, PROPFIND"),
            (header::HeaderName::from_static("dav"), "1"),
        ],
    )
        .into_response()
}

fn error_response(err: BridgeError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        warn!(error = %err, "dav operation failed");
    }
    (status, err.to_string()).into_response()
}

fn multistatus_response(resources: &[DavResource]) -> Response {
    (
        StatusCode::MULTI_STATUS,
        [(header::CONTENT_TYPE, r#"application/xml; charset="utf-8""#)],
        xml::multistatus(resources),
    )
        .into_response()
}

async fn propfind<S>(state: &DavState<S>, path: &str, depth: u8) -> Response
where
    S: ObjectStore + ByteRelay,
{
    let stat = match state.bridge.stat(path).await {
        Ok(stat) => stat,
        Err(e) => return error_response(e),
    };

    match stat {
        ResourceStat::File {
            size,
            modified,
            created,
        } => multistatus_response(&[DavResource::file(path, size, modified, created)]),
        ResourceStat::Directory => {
            let mut resources = vec![DavResource::directory(path)];
            let is_root = state
                .bridge
                .mount()
                .key_of(path)
                .map(|k| k.is_empty())
                .unwrap_or(false);

            // Only the real root has children; synthetic directories
            // (nonexistent paths statting as collections) are empty.
            if depth >= 1 && is_root {
                let entries = match state.bridge.list().await {
                    Ok(entries) => entries,
                    Err(e) => return error_response(e),
                };
                for entry in entries {
                    resources.push(DavResource::file(
                        entry.path,
                        entry.size,
                        entry.modified,
                        entry.modified,
                    ));
                }
            }
            multistatus_response(&resources)
        }
    }
}

async fn read_object<S>(state: &DavState<S>, path: &str) -> Response
where
    S: ObjectStore + ByteRelay,
{
    match state.bridge.open_read(path).await {
        Ok(stream) => Body::from_stream(stream).into_response(),
        Err(e) => error_response(e),
    }
}

async fn head_object<S>(state: &DavState<S>, path: &str) -> Response
where
    S: ObjectStore + ByteRelay,
{
    match state.bridge.stat(path).await {
        Ok(ResourceStat::File { size, .. }) => (
            StatusCode::OK,
            [(header::CONTENT_LENGTH, size.to_string())],
        )
            .into_response(),
        Ok(ResourceStat::Directory) => StatusCode::OK.into_response(),
        Err(e) => error_response(e),
    }
}

async fn write_object<S>(state: &DavState<S>, path: &str, req: Request) -> Response
where
    S: ObjectStore + ByteRelay,
{
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    // Relay the request body chunk by chunk; nothing is buffered here.
    let body = req
        .into_body()
        .into_data_stream()
        .map_err(|e| StoreError::Unavailable(format!("client stream: {}", e)));

    match state
        .bridge
        .write(path, content_type.as_deref(), Box::pin(body))
        .await
    {
        Ok(_) => StatusCode::CREATED.into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_object<S>(state: &DavState<S>, path: &str) -> Response
where
    S: ObjectStore + ByteRelay,
{
    match state.bridge.remove(path).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
