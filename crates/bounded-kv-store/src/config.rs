use crate::types::DEFAULT_MAX_ITEM_SIZE;
use std::env;
use std::time::Duration;

/// Configuration for a [`crate::MokaStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MokaStoreConfig {
    /// Total bytes of keys and values the store keeps before evicting
    pub capacity_bytes: u64,
    /// Per-item ceiling
    pub max_item_size: usize,
    /// TTL applied to items written without an expiration
    pub default_ttl: Option<Duration>,
}

impl Default for MokaStoreConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: 256 * 1024 * 1024, // 256MB
            max_item_size: DEFAULT_MAX_ITEM_SIZE,
            default_ttl: None,
        }
    }
}

impl MokaStoreConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let capacity_bytes = env::var("BLOBCACHE_CAPACITY_BYTES")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.capacity_bytes);

        let max_item_size = env::var("BLOBCACHE_MAX_ITEM_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.max_item_size);

        let default_ttl = env::var("BLOBCACHE_DEFAULT_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .or(defaults.default_ttl);

        Self {
            capacity_bytes,
            max_item_size,
            default_ttl,
        }
    }
}
