//! The store contract

use crate::error::Result;
use crate::types::CacheItem;
use async_trait::async_trait;
use std::sync::Arc;

/// A flat key/value cache with a per-item size ceiling
///
/// Every entry is independent: the store may evict or expire any key at any
/// time and offers no multi-key transactions.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read one entry, failing with [`crate::StoreError::CacheMiss`] when absent
    async fn get(&self, key: &str) -> Result<CacheItem>;

    /// Write one entry, replacing any previous value under the same key
    async fn set(&self, item: &CacheItem) -> Result<()>;

    /// Largest value, in bytes, a single entry may hold
    fn max_item_size(&self) -> usize;
}

#[async_trait]
impl<S: CacheStore + ?Sized> CacheStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<CacheItem> {
        (**self).get(key).await
    }

    async fn set(&self, item: &CacheItem) -> Result<()> {
        (**self).set(item).await
    }

    fn max_item_size(&self) -> usize {
        (**self).max_item_size()
    }
}
