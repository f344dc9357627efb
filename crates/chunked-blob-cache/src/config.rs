use crate::codec::{MASTER_RECORD_LEN, MAX_CHUNK_SIZE};
use crate::error::{CacheError, Result};
use std::env;

/// Configuration for a [`crate::ChunkedBlobCache`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedBlobCacheConfig {
    /// Bytes per chunk; values up to this size (other than 32) are stored verbatim
    pub max_chunk_size: usize,
    /// Recompute the CRC-64 of reassembled blobs and treat a mismatch as a miss
    pub verify_checksum: bool,
}

impl Default for ChunkedBlobCacheConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: MAX_CHUNK_SIZE,
            verify_checksum: false,
        }
    }
}

impl ChunkedBlobCacheConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_chunk_size = env::var("BLOBCACHE_MAX_CHUNK_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.max_chunk_size);

        let verify_checksum = env::var("BLOBCACHE_VERIFY_CHECKSUM")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.verify_checksum);

        Self {
            max_chunk_size,
            verify_checksum,
        }
    }

    /// Check the chunk size against the master record width and the store limit
    pub fn validate(&self, max_item_size: usize) -> Result<()> {
        if self.max_chunk_size < MASTER_RECORD_LEN {
            return Err(CacheError::Config(format!(
                "max_chunk_size must be at least {}, got {}",
                MASTER_RECORD_LEN, self.max_chunk_size
            )));
        }
        if self.max_chunk_size > max_item_size {
            return Err(CacheError::Config(format!(
                "max_chunk_size {} exceeds the store item limit {}",
                self.max_chunk_size, max_item_size
            )));
        }
        Ok(())
    }
}
