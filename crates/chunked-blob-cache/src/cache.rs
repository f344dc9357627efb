//! Splitting blobs into chunks on write and reassembling them on read

use crate::codec::{
    checksum, chunk_key, chunk_offsets, expected_chunk_len, is_small, MasterRecord,
};
use crate::config::ChunkedBlobCacheConfig;
use crate::error::{CacheError, Phase, Result};
use bounded_kv_store::{validate_key, CacheItem, CacheStore, StoreError};
use tracing::{debug, error, warn};

/// A blob cache layered on a size-limited [`CacheStore`]
///
/// Values that fit in one entry are stored verbatim. Larger values, and
/// values of exactly 32 bytes, are written as chunks followed by a master
/// record under the caller's key. Reads that find a master record but cannot
/// rebuild the blob report [`CacheError::CacheMiss`].
pub struct ChunkedBlobCache<S> {
    store: S,
    config: ChunkedBlobCacheConfig,
}

impl<S: CacheStore> ChunkedBlobCache<S> {
    /// Create a cache whose chunks fill the store's per-item limit
    pub fn new(store: S) -> Result<Self> {
        let config = ChunkedBlobCacheConfig {
            max_chunk_size: store.max_item_size(),
            ..ChunkedBlobCacheConfig::default()
        };
        Self::with_config(store, config)
    }

    pub fn with_config(store: S, config: ChunkedBlobCacheConfig) -> Result<Self> {
        config.validate(store.max_item_size())?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ChunkedBlobCacheConfig {
        &self.config
    }

    /// Store a blob of any size under `item.key`
    ///
    /// Chunks are written in offset order and the master record last. A failed
    /// write stops the operation immediately; chunks already written are left
    /// in place, unreferenced.
    pub async fn set(&self, item: &CacheItem) -> Result<()> {
        let size = item.value.len();

        if is_small(size, self.config.max_chunk_size) {
            return self.store.set(item).await.map_err(|e| {
                error!(key = %item.key, size, error = %e, "Failed to store item");
                CacheError::store(&item.key, Phase::WriteMaster, e)
            });
        }

        // Reject the logical key before any chunk is written under it
        if let Err(e) = validate_key(&item.key) {
            error!(key = %item.key, error = %e, "Refusing to store blob");
            return Err(CacheError::store(&item.key, Phase::WriteMaster, e));
        }

        let checksum = checksum(&item.value);
        let total_size = size as u64;
        let chunk_size = self.config.max_chunk_size as u64;

        for (index, offset) in chunk_offsets(total_size, chunk_size).enumerate() {
            let end = (offset + chunk_size).min(total_size);
            let chunk = CacheItem {
                key: chunk_key(checksum, offset, &item.key),
                value: item.value[offset as usize..end as usize].to_vec(),
                flags: item.flags,
                expiration: item.expiration,
            };

            if let Err(e) = self.store.set(&chunk).await {
                error!(
                    key = %item.key,
                    chunk_key = %chunk.key,
                    offset,
                    end,
                    error = %e,
                    "Failed to store chunk"
                );
                let phase = Phase::WriteChunk {
                    index: index as u64,
                    offset,
                    end,
                };
                return Err(CacheError::store(chunk.key, phase, e));
            }
        }

        let master = CacheItem {
            key: item.key.clone(),
            value: MasterRecord {
                checksum,
                total_size,
            }
            .encode()
            .into_bytes(),
            flags: item.flags,
            expiration: item.expiration,
        };

        self.store.set(&master).await.map_err(|e| {
            error!(key = %item.key, error = %e, "Failed to store master record");
            CacheError::store(&item.key, Phase::WriteMaster, e)
        })?;

        debug!(
            key = %item.key,
            size,
            checksum = %format!("{:016X}", checksum),
            "Stored chunked blob"
        );
        Ok(())
    }

    /// Fetch the blob stored under `key`
    ///
    /// The returned item carries the master entry's key, flags and expiration
    /// whether or not the value was chunked.
    pub async fn get(&self, key: &str) -> Result<CacheItem> {
        let master = match self.store.get(key).await {
            Ok(item) => item,
            Err(StoreError::CacheMiss) => return Err(CacheError::CacheMiss),
            Err(e) => {
                error!(key = %key, error = %e, "Failed to read master entry");
                return Err(CacheError::store(key, Phase::ReadMaster, e));
            }
        };

        if is_small(master.value.len(), self.config.max_chunk_size) {
            debug!(key = %key, size = master.value.len(), "Cache hit");
            return Ok(master);
        }

        let Some(record) = MasterRecord::decode(&master.value) else {
            warn!(
                key = %key,
                size = master.value.len(),
                "Malformed master record, treating as a miss"
            );
            return Err(CacheError::CacheMiss);
        };

        let value = self.read_chunks(key, record).await?;

        if self.config.verify_checksum {
            let actual = checksum(&value);
            if actual != record.checksum {
                warn!(
                    key = %key,
                    expected = %format!("{:016X}", record.checksum),
                    actual = %format!("{:016X}", actual),
                    "Reassembled blob failed checksum verification"
                );
                return Err(CacheError::CacheMiss);
            }
        }

        debug!(key = %key, size = value.len(), "Cache hit (chunked)");
        Ok(CacheItem { value, ..master })
    }

    /// Read every chunk of `record` in offset order, failing on the first
    /// missing or wrongly sized one
    async fn read_chunks(&self, key: &str, record: MasterRecord) -> Result<Vec<u8>> {
        let chunk_size = self.config.max_chunk_size as u64;
        let mut value = Vec::new();

        for offset in chunk_offsets(record.total_size, chunk_size) {
            let chunk_key = chunk_key(record.checksum, offset, key);
            let chunk = match self.store.get(&chunk_key).await {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!(
                        key = %key,
                        chunk_key = %chunk_key,
                        offset,
                        error = %e,
                        "Failed to read chunk"
                    );
                    return Err(CacheError::CacheMiss);
                }
            };

            let expected = expected_chunk_len(offset, record.total_size, chunk_size);
            if chunk.value.len() as u64 != expected {
                warn!(
                    key = %key,
                    chunk_key = %chunk_key,
                    offset,
                    actual = chunk.value.len(),
                    expected,
                    "Unexpected chunk length"
                );
                return Err(CacheError::CacheMiss);
            }

            value.extend_from_slice(&chunk.value);
        }

        Ok(value)
    }
}
