//! # Bridge Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Failures surfaced by the protocol bridge
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// Rejected by the type policy before any store call.
    #[error("File type not allowed: {0}")]
    DisallowedType(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store failure: {0}")]
    Store(StoreError),
}

impl BridgeError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            BridgeError::DisallowedType(_) => 415,
            BridgeError::NotFound(_) => 404,
            BridgeError::Store(e) => e.status_code(),
        }
    }
}

impl From<StoreError> for BridgeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => BridgeError::NotFound(key),
            other => BridgeError::Store(other),
        }
    }
}
