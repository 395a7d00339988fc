//! blobdav - WebDAV bridge exposing a remote blob store as a browsable
//! filesystem, with a direct upload endpoint and a gallery page.

pub mod bridge;
pub mod cli;
pub mod http_server;
pub mod policy;
pub mod store;
