//! # HTTP Server Module
//!
//! The session/transport shell: accepts inbound requests, authenticates
//! the WebDAV mount, and dispatches to the bridge and store.
//!
//! # Endpoints
//!
//! - `/` - Gallery page
//! - `/api/upload` - Direct single-file upload
//! - `/blob/*` - WebDAV mount (basic auth)

pub mod auth;
pub mod config;
pub mod dav_routes;
pub mod gallery_routes;
pub mod server;
pub mod upload_routes;
pub mod xml;

pub use config::{AppConfig, ConfigError, Credentials, ServerConfig};
pub use server::{build_router, HttpServer};
