//! The garbled-table artifact and its byte-level transport contract.

use anyhow::{Result, ensure};

/// Magic bytes prefixing a serialized table.
const MAGIC: [u8; 4] = *b"GNTB";
/// Serialization format version.
const VERSION: u8 = 1;
/// Bytes preceding the rows: magic, version, row count.
const HEADER_SIZE: usize = 4 + 1 + 8;
/// Two 16-byte ciphertexts per row.
const ROW_SIZE: usize = 32;
/// Trailing BLAKE3 checksum.
const CHECKSUM_SIZE: usize = 32;

/// Ciphertext rows produced by garbling one circuit instance.
///
/// Each AND-family gate contributes one row per cycle — two ciphertexts, the
/// generator and evaluator half-gate rows — in gate order; free gates
/// contribute nothing. A table belongs to exactly one garbling run: reusing
/// a topology means producing a fresh table from fresh labels.
///
/// [`to_bytes`](Self::to_bytes)/[`from_bytes`](Self::from_bytes) define the
/// transport contract: the bytes the garbler serializes must be exactly the
/// bytes the evaluator deserializes, and the trailing checksum catches
/// corruption before an evaluation run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarbledTable {
    rows: Vec<[[u8; 16]; 2]>,
}

impl GarbledTable {
    /// Wraps rows produced by a garbling run.
    pub fn new(rows: Vec<[[u8; 16]; 2]>) -> Self {
        GarbledTable { rows }
    }

    /// The ciphertext rows, in gate order, cycle-major.
    pub fn rows(&self) -> &[[[u8; 16]; 2]] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows (a free-gates-only circuit).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serializes the table: magic, version, row count (u64 LE), rows, and a
    /// BLAKE3 checksum over everything preceding it.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_SIZE + self.rows.len() * ROW_SIZE + CHECKSUM_SIZE);
        buf.extend_from_slice(&MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&(self.rows.len() as u64).to_le_bytes());
        for row in &self.rows {
            buf.extend_from_slice(&row[0]);
            buf.extend_from_slice(&row[1]);
        }
        let checksum = blake3::hash(&buf);
        buf.extend_from_slice(checksum.as_bytes());
        buf
    }

    /// Deserializes and verifies a table produced by
    /// [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure!(
            bytes.len() >= HEADER_SIZE + CHECKSUM_SIZE,
            "table truncated: {} bytes",
            bytes.len()
        );
        ensure!(bytes[0..4] == MAGIC, "bad table magic");
        ensure!(
            bytes[4] == VERSION,
            "unsupported table version {}",
            bytes[4]
        );

        let count = u64::from_le_bytes(bytes[5..13].try_into().expect("8 bytes")) as usize;
        let expected_len = HEADER_SIZE + count * ROW_SIZE + CHECKSUM_SIZE;
        ensure!(
            bytes.len() == expected_len,
            "table length {} does not match row count {count}",
            bytes.len()
        );

        let payload_end = bytes.len() - CHECKSUM_SIZE;
        let checksum = blake3::hash(&bytes[..payload_end]);
        ensure!(
            checksum.as_bytes()[..] == bytes[payload_end..],
            "table checksum mismatch"
        );

        let mut rows = Vec::with_capacity(count);
        for chunk in bytes[HEADER_SIZE..payload_end].chunks_exact(ROW_SIZE) {
            let mut row = [[0u8; 16]; 2];
            row[0].copy_from_slice(&chunk[0..16]);
            row[1].copy_from_slice(&chunk[16..32]);
            rows.push(row);
        }
        Ok(GarbledTable { rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GarbledTable {
        GarbledTable::new(vec![[[1u8; 16], [2u8; 16]], [[3u8; 16], [4u8; 16]]])
    }

    #[test]
    fn test_roundtrip() {
        let table = sample();
        let restored = GarbledTable::from_bytes(&table.to_bytes()).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_empty_roundtrip() {
        let table = GarbledTable::new(vec![]);
        let restored = GarbledTable::from_bytes(&table.to_bytes()).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_rejects_flipped_row_bit() {
        let mut bytes = sample().to_bytes();
        bytes[HEADER_SIZE] ^= 1;
        assert!(GarbledTable::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_rejects_truncation() {
        let bytes = sample().to_bytes();
        assert!(GarbledTable::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = sample().to_bytes();
        bytes[0] = b'X';
        assert!(GarbledTable::from_bytes(&bytes).is_err());
    }
}
