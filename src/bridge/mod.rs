//! # Protocol Bridge
//!
//! The core of the system: maps the five file-protocol operations onto
//! the object store, with type-policy enforcement and the flat-to-
//! hierarchical illusion (one synthetic root, every key a direct child).

#[allow(clippy::module_inception)]
mod bridge;
pub mod errors;
pub mod path;

pub use bridge::{Bridge, DirEntry, ResourceStat};
pub use errors::{BridgeError, BridgeResult};
pub use path::Mount;
