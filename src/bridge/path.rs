//! # Mount Path Handling
//!
//! The store namespace is flat; the protocol namespace hangs every key
//! under one mount prefix. Stripping the prefix from a protocol path
//! yields exactly the store key, and the empty remainder denotes the
//! synthetic root directory.

use percent_encoding::percent_decode_str;

/// The mount prefix under which the bridge exposes the store.
#[derive(Debug, Clone)]
pub struct Mount {
    prefix: String,
}

impl Mount {
    /// Normalizes to a leading slash and no trailing slash
    /// (`"blob/"` → `"/blob"`).
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim_matches('/');
        Self {
            prefix: format!("/{}", trimmed),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Store key for a protocol path: percent-decoded, prefix stripped.
    /// Returns `None` for paths outside the mount; `Some("")` is the root.
    pub fn key_of(&self, path: &str) -> Option<String> {
        let decoded = percent_decode_str(path).decode_utf8().ok()?;
        let decoded = decoded.trim_end_matches('/');

        if decoded == self.prefix {
            return Some(String::new());
        }
        decoded
            .strip_prefix(&self.prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(str::to_string)
    }

    /// Protocol path for a store key.
    pub fn path_of(&self, key: &str) -> String {
        format!("{}/{}", self.prefix, key)
    }
}
