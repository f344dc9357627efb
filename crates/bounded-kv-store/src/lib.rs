//! Size-limited key/value cache stores
//!
//! Defines the [`CacheStore`] contract used by memcache-style caches: a flat
//! key space, `get`/`set` of single entries, a hard ceiling on the size of any
//! one value and no cross-key atomicity. Two in-process implementations are
//! provided: [`MemoryStore`], a deterministic map that never evicts, and
//! [`MokaStore`], a byte-bounded cache with per-entry expiry.

mod config;
mod error;
mod memory;
mod moka_store;
mod store;
mod types;

pub use config::MokaStoreConfig;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use moka_store::MokaStore;
pub use store::CacheStore;
pub use types::{validate_key, CacheItem, StoreStats, DEFAULT_MAX_ITEM_SIZE, MAX_KEY_LEN};
