//! # Object Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the object store client
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Transport-level failure talking to the blob service.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The service answered, but not with what the wire contract promises.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl StoreError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound(_) => 404,
            StoreError::Unavailable(_) => 502,
            StoreError::Protocol(_) => 502,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StoreError::NotFound("a.jpg".into()).status_code(), 404);
        assert_eq!(StoreError::Unavailable("timeout".into()).status_code(), 502);
        assert_eq!(StoreError::Protocol("bad json".into()).status_code(), 502);
    }

    #[test]
    fn test_is_not_found() {
        assert!(StoreError::NotFound("x".into()).is_not_found());
        assert!(!StoreError::Unavailable("x".into()).is_not_found());
    }
}
