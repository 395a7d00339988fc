//! # Object Store Client
//!
//! Thin capability surface over the remote blob service: put, fetch,
//! delete, stat, list, plus URL-addressed byte transfer. No protocol
//! knowledge lives here.

pub mod client;
pub mod errors;
pub mod http;
pub mod memory;
pub mod record;

pub use client::{ByteRelay, ByteStream, ObjectStore};
pub use errors::{StoreError, StoreResult};
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use record::{ObjectMeta, ObjectRecord};
