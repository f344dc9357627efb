//! Byte-bounded in-process store on top of moka

use crate::config::MokaStoreConfig;
use crate::error::{Result, StoreError};
use crate::store::CacheStore;
use crate::types::{check_item, CacheItem, StoreStats};
use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Per-entry expiry: the item's own expiration, else the store default
struct ItemExpiry {
    default_ttl: Option<Duration>,
}

impl ItemExpiry {
    fn ttl_for(&self, item: &CacheItem) -> Option<Duration> {
        item.expiration.or(self.default_ttl)
    }
}

impl Expiry<String, Arc<CacheItem>> for ItemExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<CacheItem>,
        _created_at: Instant,
    ) -> Option<Duration> {
        self.ttl_for(value)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Arc<CacheItem>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // An overwrite restarts the clock with the new item's TTL
        self.ttl_for(value)
    }
}

/// A cache store that evicts by total value size and honours per-item TTLs
///
/// Eviction is independent per key, so any entry may disappear while others
/// written alongside it survive.
pub struct MokaStore {
    cache: Cache<String, Arc<CacheItem>>,
    max_item_size: usize,
}

impl MokaStore {
    pub fn new(config: MokaStoreConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.capacity_bytes)
            .weigher(|key: &String, item: &Arc<CacheItem>| -> u32 {
                u32::try_from(key.len() + item.value.len()).unwrap_or(u32::MAX)
            })
            .expire_after(ItemExpiry {
                default_ttl: config.default_ttl,
            })
            .build();

        info!(
            capacity_bytes = config.capacity_bytes,
            max_item_size = config.max_item_size,
            default_ttl_secs = config.default_ttl.map(|d| d.as_secs()),
            "Moka store initialized"
        );

        Self {
            cache,
            max_item_size: config.max_item_size,
        }
    }

    /// Remove an entry
    pub async fn remove(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    /// Get current store statistics, after applying pending evictions
    pub async fn stats(&self) -> StoreStats {
        self.cache.run_pending_tasks().await;
        StoreStats {
            entries: self.cache.entry_count() as usize,
            total_size: self.cache.weighted_size(),
        }
    }
}

impl Default for MokaStore {
    fn default() -> Self {
        Self::new(MokaStoreConfig::default())
    }
}

#[async_trait]
impl CacheStore for MokaStore {
    async fn get(&self, key: &str) -> Result<CacheItem> {
        match self.cache.get(key).await {
            Some(item) => Ok(item.as_ref().clone()),
            None => Err(StoreError::CacheMiss),
        }
    }

    async fn set(&self, item: &CacheItem) -> Result<()> {
        check_item(item, self.max_item_size)?;
        self.cache
            .insert(item.key.clone(), Arc::new(item.clone()))
            .await;
        debug!(key = %item.key, size = item.value.len(), "Stored item");
        Ok(())
    }

    fn max_item_size(&self) -> usize {
        self.max_item_size
    }
}
