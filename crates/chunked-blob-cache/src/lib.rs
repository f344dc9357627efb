//! Chunked blob cache
//!
//! Stores byte blobs of any size in a key/value cache whose entries are capped
//! at a fixed size. Small values pass straight through; larger ones are split
//! into chunks addressed by the blob's CRC-64 and byte offset, with a fixed
//! width master record under the caller's key pointing at them.
//!
//! # Example
//!
//! ```no_run
//! use bounded_kv_store::{CacheItem, MokaStore};
//! use chunked_blob_cache::ChunkedBlobCache;
//!
//! # async fn example() -> Result<(), chunked_blob_cache::CacheError> {
//! let cache = ChunkedBlobCache::new(MokaStore::default())?;
//!
//! let image = vec![0u8; 2_000_000];
//! cache
//!     .set(&CacheItem::new("https://example.com/cat.jpg", image))
//!     .await?;
//!
//! match cache.get("https://example.com/cat.jpg").await {
//!     Ok(item) => println!("{} bytes", item.value.len()),
//!     Err(e) if e.is_miss() => println!("not cached"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
pub mod codec;
mod config;
mod error;

pub use cache::ChunkedBlobCache;
pub use config::ChunkedBlobCacheConfig;
pub use error::{CacheError, Phase, Result};
