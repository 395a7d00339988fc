//! Direct Upload Route
//!
//! `POST /api/upload` — single-file upload for the gallery page. The
//! caller names the file through the `x-filename` header and the body is
//! the raw bytes; the MIME allow-list is checked before any store call.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use futures_util::TryStreamExt;
use serde::Serialize;
use tracing::warn;

use crate::policy;
use crate::store::{ByteRelay, ObjectStore, StoreError};

/// Request body size ceiling: media uploads up to 100 MB.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// State shared by the upload handler
pub struct UploadState<S> {
    pub store: Arc<S>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

/// Create the upload routes
pub fn upload_routes<S>(state: Arc<UploadState<S>>) -> Router
where
    S: ObjectStore + ByteRelay + 'static,
{
    Router::new()
        .route("/api/upload", post(upload_handler::<S>))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

fn reject(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: status.as_u16(),
        }),
    )
        .into_response()
}

async fn upload_handler<S>(State(state): State<Arc<UploadState<S>>>, req: Request) -> Response
where
    S: ObjectStore + ByteRelay + 'static,
{
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    // Reject before touching the store.
    if !policy::is_allowed_content_type(&content_type) {
        return reject(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("File type not allowed: {}", content_type),
        );
    }

    let filename = req
        .headers()
        .get("x-filename")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("file_{}", Utc::now().timestamp_millis()));

    let key = if filename.contains('.') {
        filename
    } else {
        match policy::infer_extension(&content_type) {
            Some(ext) => format!("{}{}", filename, ext),
            None => filename,
        }
    };

    match store_body(&state, &key, &content_type, req.into_body()).await {
        Ok(url) => (StatusCode::OK, Json(UploadResponse { url })).into_response(),
        Err(e) => {
            warn!(key = %key, error = %e, "upload failed");
            reject(StatusCode::INTERNAL_SERVER_ERROR, "Upload failed")
        }
    }
}

/// Mint a write target and relay the request body into it, streaming.
async fn store_body<S>(
    state: &UploadState<S>,
    key: &str,
    content_type: &str,
    body: Body,
) -> Result<String, StoreError>
where
    S: ObjectStore + ByteRelay,
{
    let record = state.store.put(key, None, content_type).await?;
    let stream = body
        .into_data_stream()
        .map_err(|e| StoreError::Unavailable(format!("client stream: {}", e)));
    state
        .store
        .upload(&record.url, content_type, Box::pin(stream))
        .await?;
    Ok(record.url)
}
