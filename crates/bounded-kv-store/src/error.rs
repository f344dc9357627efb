//! Error types for cache stores

use std::fmt;

/// Errors returned by a [`crate::CacheStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The key is not present (never written, evicted or expired)
    CacheMiss,
    /// The value exceeds the store's per-item ceiling
    ValueTooLarge {
        key: String,
        size: usize,
        max: usize,
    },
    /// The key is empty, too long or contains forbidden characters
    InvalidKey(String),
    /// Any other failure reported by the underlying backend
    Backend(String),
}

impl StoreError {
    /// Whether this is the not-found sentinel
    pub fn is_miss(&self) -> bool {
        matches!(self, StoreError::CacheMiss)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::CacheMiss => write!(f, "cache miss"),
            StoreError::ValueTooLarge { key, size, max } => write!(
                f,
                "value for key {} is {} bytes, exceeding the {} byte item limit",
                key, size, max
            ),
            StoreError::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),
            StoreError::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type Result<T> = std::result::Result<T, StoreError>;
