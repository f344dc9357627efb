//! Cache entry types

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-item ceiling of the memcache service the stores model
pub const DEFAULT_MAX_ITEM_SIZE: usize = 900 * 1000;

/// Longest key a store accepts, in bytes
pub const MAX_KEY_LEN: usize = 250;

/// A single store entry together with its store-level metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheItem {
    pub key: String,
    pub value: Vec<u8>,
    /// Opaque flags stored alongside the value
    pub flags: u32,
    /// Time to live from the moment of the write; `None` uses the store default
    pub expiration: Option<Duration>,
}

impl CacheItem {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            flags: 0,
            expiration: None,
        }
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = Some(expiration);
        self
    }
}

/// Statistics about a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub entries: usize,
    /// Sum of key and value lengths over all entries, in bytes
    pub total_size: u64,
}

/// Check a key against memcache key rules
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("key is empty".to_string()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(StoreError::InvalidKey(format!(
            "key is {} bytes, limit is {}",
            key.len(),
            MAX_KEY_LEN
        )));
    }
    if key
        .bytes()
        .any(|b| b.is_ascii_whitespace() || b.is_ascii_control())
    {
        return Err(StoreError::InvalidKey(
            "key contains whitespace or control characters".to_string(),
        ));
    }
    Ok(())
}

/// Reject items a store could not hold
pub(crate) fn check_item(item: &CacheItem, max_item_size: usize) -> Result<()> {
    validate_key(&item.key)?;
    if item.value.len() > max_item_size {
        return Err(StoreError::ValueTooLarge {
            key: item.key.clone(),
            size: item.value.len(),
            max: max_item_size,
        });
    }
    Ok(())
}
