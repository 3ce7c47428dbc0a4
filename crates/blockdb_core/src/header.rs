//! On-disk file header.

use crate::error::{CoreError, CoreResult};

/// Size of the file header in bytes.
pub const HEADER_SIZE: u64 = 16;

/// The file header: record count and record size.
///
/// Layout (little-endian):
///
/// ```text
/// offset 0: length      u64   number of records
/// offset 8: block_size  u64   bytes per record
/// ```
///
/// The header is encoded and written as a single 16-byte unit, so the
/// two fields cannot disagree with each other after a completed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Number of records in the store.
    pub length: u64,
    /// Size of each record in bytes.
    pub block_size: u64,
}

impl Header {
    /// Creates a header for an empty store with the given block size.
    #[must_use]
    pub fn new(block_size: u64) -> Self {
        Self {
            length: 0,
            block_size,
        }
    }

    /// Encodes the header into its on-disk form.
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_SIZE as usize] {
        let mut buf = [0u8; HEADER_SIZE as usize];
        buf[0..8].copy_from_slice(&self.length.to_le_bytes());
        buf[8..16].copy_from_slice(&self.block_size.to_le_bytes());
        buf
    }

    /// Decodes a header from its on-disk form.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is shorter than [`HEADER_SIZE`]
    /// or the recorded block size is zero.
    pub fn decode(data: &[u8]) -> CoreResult<Self> {
        if data.len() < HEADER_SIZE as usize {
            return Err(CoreError::invalid_header(format!(
                "header too short: {} bytes",
                data.len()
            )));
        }

        let mut length = [0u8; 8];
        length.copy_from_slice(&data[0..8]);
        let mut block_size = [0u8; 8];
        block_size.copy_from_slice(&data[8..16]);

        let header = Self {
            length: u64::from_le_bytes(length),
            block_size: u64::from_le_bytes(block_size),
        };

        if header.block_size == 0 {
            return Err(CoreError::invalid_header("block size is zero"));
        }

        Ok(header)
    }

    /// Returns the byte offset of record `index`.
    #[must_use]
    pub fn record_offset(&self, index: u64) -> u64 {
        HEADER_SIZE + index * self.block_size
    }
}
