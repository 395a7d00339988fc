//! # HTTP Server
//!
//! Combines the gallery page, the direct upload endpoint, and the WebDAV
//! mount into one axum router and serves it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::bridge::Bridge;
use crate::store::{ByteRelay, HttpStore, ObjectStore};

use super::config::{AppConfig, Credentials, ServerConfig};
use super::dav_routes::{dav_routes, DavState};
use super::gallery_routes::{gallery_routes, GalleryState};
use super::upload_routes::{upload_routes, UploadState};

/// HTTP server for the blob bridge
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server wired to the remote blob service from `app`.
    pub fn new(config: ServerConfig, app: AppConfig) -> Self {
        let store = Arc::new(HttpStore::new(&app.blob_api_url, &app.blob_token));
        let router = build_router(&config, store, app.credentials, &app.mount);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address: {}", e),
            )
        })?;

        info!(%addr, "starting blobdav server");
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

/// Build the combined router over any store implementation. Integration
/// tests feed this an in-memory store.
pub fn build_router<S>(
    config: &ServerConfig,
    store: Arc<S>,
    credentials: Credentials,
    mount: &str,
) -> Router
where
    S: ObjectStore + ByteRelay + 'static,
{
    let dav_state = Arc::new(DavState {
        bridge: Bridge::new(store.clone(), mount),
        credentials,
    });
    let upload_state = Arc::new(UploadState {
        store: store.clone(),
    });
    let gallery_state = Arc::new(GalleryState { store });

    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(gallery_routes(gallery_state))
        .merge(upload_routes(upload_state))
        .merge(dav_routes(dav_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
