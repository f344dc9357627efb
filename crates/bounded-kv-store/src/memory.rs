//! In-memory store that never evicts

use crate::error::{Result, StoreError};
use crate::store::CacheStore;
use crate::types::{check_item, CacheItem, StoreStats, DEFAULT_MAX_ITEM_SIZE};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// A `HashMap`-backed store enforcing the per-item ceiling
///
/// Entries stay until removed or overwritten; expirations are stored but not
/// acted upon, which keeps test scenarios deterministic.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheItem>>,
    max_item_size: usize,
}

impl MemoryStore {
    /// Create a store with the given per-item ceiling
    pub fn new(max_item_size: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_item_size,
        }
    }

    /// Remove an entry, returning it if present
    pub async fn remove(&self, key: &str) -> Option<CacheItem> {
        self.entries.write().await.remove(key)
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// All keys currently present, sorted
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn stats(&self) -> StoreStats {
        let entries = self.entries.read().await;
        StoreStats {
            entries: entries.len(),
            total_size: entries
                .values()
                .map(|e| (e.key.len() + e.value.len()) as u64)
                .sum(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEM_SIZE)
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<CacheItem> {
        let entries = self.entries.read().await;
        entries.get(key).cloned().ok_or(StoreError::CacheMiss)
    }

    async fn set(&self, item: &CacheItem) -> Result<()> {
        check_item(item, self.max_item_size)?;
        self.entries
            .write()
            .await
            .insert(item.key.clone(), item.clone());
        debug!(key = %item.key, size = item.value.len(), "Stored item");
        Ok(())
    }

    fn max_item_size(&self) -> usize {
        self.max_item_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::default();
        let item = CacheItem::new("greeting", b"Hello, world!".to_vec())
            .with_flags(3)
            .with_expiration(Duration::from_secs(3600));

        store.set(&item).await.unwrap();

        let got = store.get("greeting").await.unwrap();
        assert_eq!(got, item);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_cache_miss() {
        let store = MemoryStore::default();
        assert_eq!(store.get("absent").await, Err(StoreError::CacheMiss));
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::default();
        store.set(&CacheItem::new("k", b"one".to_vec())).await.unwrap();
        store.set(&CacheItem::new("k", b"two".to_vec())).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().value, b"two");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_rejects_oversized_value() {
        let store = MemoryStore::new(16);
        let err = store
            .set(&CacheItem::new("big", vec![1u8; 17]))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::ValueTooLarge { size: 17, max: 16, .. }));
        assert!(store.is_empty().await);

        // Exactly at the ceiling is fine
        store.set(&CacheItem::new("big", vec![1u8; 16])).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_invalid_key() {
        let store = MemoryStore::default();
        let err = store.set(&CacheItem::new("", b"x".to_vec())).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_remove_keys_and_stats() {
        let store = MemoryStore::default();
        store.set(&CacheItem::new("b", vec![0u8; 5])).await.unwrap();
        store.set(&CacheItem::new("a", vec![0u8; 4])).await.unwrap();

        assert_eq!(store.keys().await, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            store.stats().await,
            StoreStats {
                entries: 2,
                // keys count towards the size: 1 + 5 + 1 + 4
                total_size: 11,
            }
        );

        let removed = store.remove("a").await.unwrap();
        assert_eq!(removed.value.len(), 4);
        assert!(!store.contains("a").await);
        assert!(store.remove("a").await.is_none());
    }

    #[tokio::test]
    async fn test_shared_through_arc() {
        let store = Arc::new(MemoryStore::new(1024));
        let shared: Arc<dyn CacheStore> = store.clone();

        shared.set(&CacheItem::new("k", b"v".to_vec())).await.unwrap();
        assert_eq!(shared.max_item_size(), 1024);
        assert!(store.contains("k").await);
    }
}
