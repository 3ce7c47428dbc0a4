//! Error types for blockdb core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in blockdb core operations.
///
/// A search that does not find its key is not an error; see
/// [`crate::SearchResult::NotFound`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] blockdb_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record range fell outside the store.
    ///
    /// Range checks run before any I/O, so a rejected call leaves the
    /// file untouched.
    #[error("index out of range: index {index}, count {count}, length {length}")]
    OutOfRange {
        /// The first requested record index.
        index: u64,
        /// The number of records requested.
        count: u64,
        /// The store length at the time of the call.
        length: u64,
    },

    /// A buffer or record type disagreed with the store's block size.
    #[error("block size mismatch: expected {expected} bytes, got {actual}")]
    BlockSizeMismatch {
        /// The block size the operation required.
        expected: u64,
        /// The size actually supplied.
        actual: u64,
    },

    /// The file header is invalid or inconsistent with the file.
    #[error("invalid header: {message}")]
    InvalidHeader {
        /// Description of the problem.
        message: String,
    },

    /// A block size of zero was requested at creation.
    #[error("invalid block size: {0}")]
    InvalidBlockSize(u64),

    /// A search key type is wider than one record.
    #[error("key too wide: key is {key_width} bytes, block size is {block_size}")]
    KeyTooWide {
        /// Width of the key type in bytes.
        key_width: u64,
        /// The store's block size.
        block_size: u64,
    },

    /// A record failed to decode.
    #[error("invalid record: {message}")]
    InvalidRecord {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates an out-of-range error.
    pub fn out_of_range(index: u64, count: u64, length: u64) -> Self {
        Self::OutOfRange {
            index,
            count,
            length,
        }
    }

    /// Creates a block size mismatch error.
    pub fn block_size_mismatch(expected: u64, actual: u64) -> Self {
        Self::BlockSizeMismatch { expected, actual }
    }

    /// Creates an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Creates an invalid record error.
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }
}
