//! Storage backend trait definition.

use crate::error::StorageResult;

/// A low-level storage backend for blockdb.
///
/// Storage backends are **opaque byte stores**. They provide positional
/// reads and writes plus durability control. blockdb owns all file format
/// interpretation - backends do not understand headers, records, or keys.
///
/// # Invariants
///
/// - Every operation takes an explicit byte offset; no cursor state
///   survives between calls
/// - `read_at` returns exactly the bytes previously written at that offset
/// - `write_at` past the current end extends the store; bytes skipped over
///   read back as zero
/// - `sync` ensures all previously written data is durable
/// - Backends must be `Send + Sync` so handles can move across threads
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The offset is beyond the current size
    /// - The read would extend beyond the current size
    /// - An I/O error occurs
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>>;

    /// Writes `data` starting at `offset`.
    ///
    /// Writing at or past the current end extends the store. A write that
    /// begins beyond the end leaves the intervening bytes zeroed.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<()>;

    /// Returns the current size of the storage in bytes.
    ///
    /// The size is queried from the store itself, never from a cached
    /// value, so it always reflects the last completed write.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Syncs all data and metadata to durable storage.
    ///
    /// After this returns successfully, all previously written data is
    /// guaranteed to survive process termination.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;
}
