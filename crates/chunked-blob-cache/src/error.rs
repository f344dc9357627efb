//! Error types for the chunked blob cache

use bounded_kv_store::StoreError;
use std::fmt;

/// Which store call of a cache operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Writing chunk `index`, covering bytes `offset..end` of the blob
    WriteChunk { index: u64, offset: u64, end: u64 },
    /// Writing the entry under the logical key (master record or small value)
    WriteMaster,
    /// Reading the entry under the logical key
    ReadMaster,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::WriteChunk { index, offset, end } => {
                write!(f, "writing chunk {} [{}..{}]", index, offset, end)
            }
            Phase::WriteMaster => write!(f, "writing master entry"),
            Phase::ReadMaster => write!(f, "reading master entry"),
        }
    }
}

#[derive(Debug)]
pub enum CacheError {
    /// The blob is absent, or present but incomplete or unreadable
    CacheMiss,
    /// The backing store failed a call
    Store {
        key: String,
        phase: Phase,
        source: StoreError,
    },
    /// The cache was built with an unusable configuration
    Config(String),
}

impl CacheError {
    /// Whether the caller should treat this as "not cached"
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::CacheMiss)
    }

    pub(crate) fn store(key: impl Into<String>, phase: Phase, source: StoreError) -> Self {
        CacheError::Store {
            key: key.into(),
            phase,
            source,
        }
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::CacheMiss => write!(f, "cache miss"),
            CacheError::Store { key, phase, source } => {
                write!(f, "Store error {} under key={}: {}", phase, key, source)
            }
            CacheError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Store { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_cache_miss_display() {
        let err = CacheError::CacheMiss;
        assert_eq!(format!("{}", err), "cache miss");
        assert!(err.is_miss());
    }

    #[test]
    fn test_store_error_display() {
        let err = CacheError::store(
            "0000000000ABCDEF00000000000DBBA0photo",
            Phase::WriteChunk {
                index: 1,
                offset: 900_000,
                end: 1_800_000,
            },
            StoreError::Backend("server unavailable".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Store error writing chunk 1 [900000..1800000] under key=0000000000ABCDEF00000000000DBBA0photo: Backend error: server unavailable"
        );
        assert!(!err.is_miss());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_error_display() {
        let err = CacheError::Config("max_chunk_size must be at least 32".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: max_chunk_size must be at least 32"
        );
        assert!(err.source().is_none());
    }
}
