//! Gallery Route
//!
//! `GET /` — a server-rendered page showing the stored media, newest
//! first. Images render inline, videos get a player element.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::warn;

use crate::store::{ObjectRecord, ObjectStore};

use super::xml::escape_text;

const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".mov", ".avi", ".mkv", ".webm", ".flv", ".wmv", ".m4v", ".3gp", ".mpeg", ".mpg",
];

/// State shared by the gallery handler
pub struct GalleryState<S> {
    pub store: Arc<S>,
}

/// Create the gallery routes
pub fn gallery_routes<S>(state: Arc<GalleryState<S>>) -> Router
where
    S: ObjectStore + 'static,
{
    Router::new()
        .route("/", get(gallery_handler::<S>))
        .with_state(state)
}

async fn gallery_handler<S>(State(state): State<Arc<GalleryState<S>>>) -> Response
where
    S: ObjectStore + 'static,
{
    let mut records = match state.store.list().await {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "gallery listing failed");
            return (StatusCode::BAD_GATEWAY, "Listing failed").into_response();
        }
    };
    records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

    Html(render_page(&records)).into_response()
}

fn is_video(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn render_page(records: &[ObjectRecord]) -> String {
    let mut out = String::with_capacity(1024 + 256 * records.len());
    out.push_str(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>Media Gallery</title>\
         <style>body{font-family:sans-serif;margin:2rem}\
         .grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(240px,1fr));gap:1rem}\
         .card img,.card video{width:100%;border-radius:4px}\
         .card p{margin:.25rem 0;font-size:.85rem;color:#444}</style>\
         </head><body><h1>Media Gallery</h1><div class=\"grid\">",
    );

    for record in records {
        out.push_str("<div class=\"card\">");
        let mut url = String::new();
        escape_text(&mut url, &record.url);
        if is_video(&record.key) {
            out.push_str(&format!("<video src=\"{}\" controls></video>", url));
        } else {
            out.push_str(&format!("<img src=\"{}\" loading=\"lazy\">", url));
        }
        out.push_str("<p>");
        escape_text(&mut out, &record.key);
        out.push_str("</p></div>");
    }

    out.push_str("</div></body></html>");
    out
}
