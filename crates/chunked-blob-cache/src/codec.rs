//! Chunk addressing and master record encoding
//!
//! A blob too large for one entry is stored as a master record under its
//! logical key plus one entry per chunk. The master record is 32 ASCII
//! characters: the CRC-64 of the whole blob followed by its length, each as
//! 16 zero-padded upper-case hex digits. Chunk keys are the same checksum,
//! the chunk's byte offset (16 hex digits) and the logical key, concatenated.

use crc::{Crc, CRC_64_XZ};

/// Largest chunk written to the backing store, matching its per-item limit
pub const MAX_CHUNK_SIZE: usize = 900 * 1000;

/// Width of an encoded master record
pub const MASTER_RECORD_LEN: usize = 32;

const HEX_FIELD_LEN: usize = 16;

// ECMA-182 polynomial, reflected, with all-ones init and final xor.
const CRC64_ECMA: Crc<u64> = Crc::<u64>::new(&CRC_64_XZ);

/// CRC-64 (ECMA) of a whole blob
pub fn checksum(data: &[u8]) -> u64 {
    CRC64_ECMA.checksum(data)
}

/// Whether a value of `size` bytes is stored verbatim under its key
///
/// A 32-byte value is never small: on read it could not be told apart from an
/// encoded master record.
pub fn is_small(size: usize, max_chunk_size: usize) -> bool {
    size <= max_chunk_size && size != MASTER_RECORD_LEN
}

/// Physical key of the chunk starting at `offset`
pub fn chunk_key(checksum: u64, offset: u64, logical_key: &str) -> String {
    format!("{:016X}{:016X}{}", checksum, offset, logical_key)
}

/// Byte offsets of every chunk of a `total_size` blob
pub fn chunk_offsets(total_size: u64, chunk_size: u64) -> impl Iterator<Item = u64> {
    (0..total_size).step_by(chunk_size as usize)
}

/// Length the chunk at `offset` must have
pub fn expected_chunk_len(offset: u64, total_size: u64, chunk_size: u64) -> u64 {
    chunk_size.min(total_size.saturating_sub(offset))
}

/// Pointer from a logical key to its chunk set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterRecord {
    pub checksum: u64,
    pub total_size: u64,
}

impl MasterRecord {
    pub fn encode(&self) -> String {
        format!("{:016X}{:016X}", self.checksum, self.total_size)
    }

    /// Parse an encoded record; `None` unless it is exactly 32 hex digits
    pub fn decode(raw: &[u8]) -> Option<Self> {
        if raw.len() != MASTER_RECORD_LEN || !raw.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        // All bytes are ASCII hex digits, so both halves are valid UTF-8
        let text = std::str::from_utf8(raw).ok()?;
        let (checksum, total_size) = text.split_at(HEX_FIELD_LEN);

        Some(Self {
            checksum: u64::from_str_radix(checksum, 16).ok()?,
            total_size: u64::from_str_radix(total_size, 16).ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_matches_crc64_ecma_check_value() {
        assert_eq!(checksum(b"123456789"), 0x995D_C9BB_DF19_39FA);
        assert_eq!(checksum(b""), 0);
    }

    #[test]
    fn test_is_small() {
        assert!(is_small(0, MAX_CHUNK_SIZE));
        assert!(is_small(31, MAX_CHUNK_SIZE));
        assert!(!is_small(32, MAX_CHUNK_SIZE));
        assert!(is_small(33, MAX_CHUNK_SIZE));
        assert!(is_small(MAX_CHUNK_SIZE, MAX_CHUNK_SIZE));
        assert!(!is_small(MAX_CHUNK_SIZE + 1, MAX_CHUNK_SIZE));
    }

    #[test]
    fn test_chunk_key_format() {
        let key = chunk_key(0x995D_C9BB_DF19_39FA, 900_000, "https://example.com/cat.jpg");
        assert_eq!(
            key,
            "995DC9BBDF1939FA00000000000DBBA0https://example.com/cat.jpg"
        );
    }

    #[test]
    fn test_chunk_key_is_deterministic_and_distinct() {
        let a = chunk_key(42, 0, "img");
        let b = chunk_key(42, 0, "img");
        assert_eq!(a, b);

        assert_ne!(chunk_key(42, 0, "img"), chunk_key(42, 900_000, "img"));
        assert_ne!(chunk_key(42, 0, "img"), chunk_key(43, 0, "img"));
        assert_ne!(chunk_key(42, 0, "img"), chunk_key(42, 0, "img2"));
    }

    #[test]
    fn test_chunk_offsets() {
        assert_eq!(chunk_offsets(0, 10).count(), 0);
        assert_eq!(chunk_offsets(10, 10).collect::<Vec<_>>(), vec![0]);
        assert_eq!(chunk_offsets(20, 10).collect::<Vec<_>>(), vec![0, 10]);
        assert_eq!(chunk_offsets(21, 10).collect::<Vec<_>>(), vec![0, 10, 20]);
    }

    #[test]
    fn test_expected_chunk_len() {
        // Exact multiple: last chunk is full, not empty
        assert_eq!(expected_chunk_len(10, 20, 10), 10);
        assert_eq!(expected_chunk_len(20, 21, 10), 1);
        assert_eq!(expected_chunk_len(0, 32, 900_000), 32);
    }

    #[test]
    fn test_master_record_encode() {
        let record = MasterRecord {
            checksum: 0xABCDEF,
            total_size: 2_700_001,
        };
        let encoded = record.encode();
        assert_eq!(encoded, "0000000000ABCDEF00000000002932E1");
        assert_eq!(encoded.len(), MASTER_RECORD_LEN);
        assert_eq!(MasterRecord::decode(encoded.as_bytes()), Some(record));
    }

    #[test]
    fn test_master_record_decode_accepts_lower_case() {
        let record = MasterRecord::decode(b"00000000000000ff0000000000000010").unwrap();
        assert_eq!(record.checksum, 0xFF);
        assert_eq!(record.total_size, 16);
    }

    #[test]
    fn test_master_record_decode_rejects_malformed() {
        assert_eq!(MasterRecord::decode(b""), None);
        assert_eq!(MasterRecord::decode(b"0000000000ABCDEF00000000002932E"), None);
        assert_eq!(MasterRecord::decode(b"0000000000ABCDEF00000000002932E10"), None);
        assert_eq!(MasterRecord::decode(b"0000000000ABCDEG00000000002932E1"), None);
        assert_eq!(MasterRecord::decode(b"+000000000ABCDEF+0000000002932E1"), None);
        assert_eq!(MasterRecord::decode(b"this is not a master record!!!!!"), None);
    }
}
