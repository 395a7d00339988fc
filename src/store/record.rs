//! # Object Records
//!
//! Wire types shared by the store client and the bridge. The blob service
//! speaks camelCase JSON; timestamps are RFC 3339.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A live object in the store: the flat key doubles as the protocol path,
/// the URL is the service-assigned fetch locator, immutable once minted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    pub key: String,
    pub url: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Metadata subset returned by `stat`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&ObjectRecord> for ObjectMeta {
    fn from(record: &ObjectRecord) -> Self {
        Self {
            size: record.size,
            uploaded_at: record.uploaded_at,
        }
    }
}
