//! The raw record store.

use crate::error::{CoreError, CoreResult};
use crate::header::{Header, HEADER_SIZE};
use crate::options::Options;
use crate::record::RecordKey;
use crate::search::SearchResult;
use blockdb_storage::{FileBackend, InMemoryBackend, StorageBackend};
use std::path::Path;
use tracing::{debug, trace};

/// A flat file of fixed-size records.
///
/// The file is a 16-byte [`Header`] followed by `length` contiguous
/// records of `block_size` bytes each. `Store` works on whole records:
/// byte buffers passed in and out are always a multiple of the block
/// size, and positions are record indexes, not byte offsets.
///
/// # Contract
///
/// - Single writer; the store takes no locks and coordinates nothing
/// - I/O is synchronous and unbuffered; a returned call has reached the
///   OS
/// - Nothing is cached between calls: the header is re-read on every
///   operation and rewritten after every mutation
/// - Sort order by key is the caller's invariant; only [`Store::search_by_key`]
///   relies on it
///
/// A crash between a record write and the header write can leave the
/// two inconsistent. Opening a store validates that the declared extent
/// fits the file, which catches the truncated case.
///
/// # Example
///
/// ```rust
/// use blockdb_core::{SearchResult, Store};
///
/// let mut store = Store::in_memory(8).unwrap();
/// store.append(&42i64.to_le_bytes()).unwrap();
///
/// assert_eq!(store.length().unwrap(), 1);
/// assert_eq!(store.search_by_key(42i64).unwrap(), SearchResult::Found(0));
/// ```
pub struct Store {
    backend: Box<dyn StorageBackend>,
    options: Options,
}

impl Store {
    /// Creates a new store file, truncating any existing file at `path`.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::InvalidBlockSize`] if `block_size` is
    /// zero, or with an I/O error if the file cannot be created.
    pub fn create(path: &Path, block_size: u64) -> CoreResult<Self> {
        Self::create_with(path, block_size, Options::default())
    }

    /// Creates a new store file with explicit options.
    ///
    /// With [`Options::error_if_exists`] set, an existing file at `path`
    /// is an error instead of being truncated.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::InvalidBlockSize`] if `block_size` is
    /// zero, or with an I/O error if the file cannot be created.
    pub fn create_with(path: &Path, block_size: u64, options: Options) -> CoreResult<Self> {
        if block_size == 0 {
            return Err(CoreError::InvalidBlockSize(0));
        }

        let backend: Box<dyn StorageBackend> = if options.error_if_exists {
            Box::new(FileBackend::create_new(path)?)
        } else {
            Box::new(FileBackend::create(path)?)
        };

        debug!(path = %path.display(), block_size, "created store");

        Self::init(backend, block_size, options)
    }

    /// Opens an existing store file.
    ///
    /// # Errors
    ///
    /// Fails with an I/O error if the file does not exist, or with
    /// [`CoreError::InvalidHeader`] if the header is malformed or
    /// declares more records than the file holds.
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::open_with(path, Options::default())
    }

    /// Opens an existing store file with explicit options.
    ///
    /// # Errors
    ///
    /// Fails with an I/O error if the file does not exist, or with
    /// [`CoreError::InvalidHeader`] if the header is malformed or
    /// declares more records than the file holds.
    pub fn open_with(path: &Path, options: Options) -> CoreResult<Self> {
        let backend = FileBackend::open(path)?;
        let store = Self::from_backend(Box::new(backend), options)?;

        debug!(path = %path.display(), "opened store");

        Ok(store)
    }

    /// Creates an ephemeral in-memory store.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::InvalidBlockSize`] if `block_size` is
    /// zero.
    pub fn in_memory(block_size: u64) -> CoreResult<Self> {
        if block_size == 0 {
            return Err(CoreError::InvalidBlockSize(0));
        }

        Self::init(
            Box::new(InMemoryBackend::new()),
            block_size,
            Options::default(),
        )
    }

    /// Opens a store over a pre-configured backend.
    ///
    /// The backend must already hold a valid store image (for a fresh
    /// one, use [`Store::create`] or [`Store::in_memory`] instead). This
    /// is a lower-level constructor; it validates the header the same
    /// way [`Store::open`] does.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::InvalidHeader`] if the backend does not
    /// hold a valid store image.
    pub fn from_backend(backend: Box<dyn StorageBackend>, options: Options) -> CoreResult<Self> {
        let store = Self { backend, options };

        let size = store.backend.size()?;
        if size < HEADER_SIZE {
            return Err(CoreError::invalid_header(format!(
                "file too small for a header: {size} bytes"
            )));
        }

        let header = store.read_header()?;
        store.validate_extent(&header)?;

        Ok(store)
    }

    /// Returns the number of records in the store.
    ///
    /// The header is re-read from storage on every call, so the value
    /// always reflects the last completed mutation.
    ///
    /// # Errors
    ///
    /// Fails if the header cannot be read.
    pub fn length(&self) -> CoreResult<u64> {
        Ok(self.read_header()?.length)
    }

    /// Returns `true` if the store holds no records.
    ///
    /// # Errors
    ///
    /// Fails if the header cannot be read.
    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.length()? == 0)
    }

    /// Returns the size of each record in bytes.
    ///
    /// # Errors
    ///
    /// Fails if the header cannot be read.
    pub fn block_size(&self) -> CoreResult<u64> {
        Ok(self.read_header()?.block_size)
    }

    /// Returns the options this store was opened with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Reads `count` records starting at `index`.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::OutOfRange`], before any I/O, if the
    /// range extends past the end of the store.
    pub fn read(&self, index: u64, count: u64) -> CoreResult<Vec<u8>> {
        let header = self.read_header()?;
        Self::check_read_range(&header, index, count)?;

        trace!(index, count, "read records");

        let len = (count * header.block_size) as usize;
        Ok(self.backend.read_at(header.record_offset(index), len)?)
    }

    /// Reads records starting at `index` into a caller buffer.
    ///
    /// The buffer must be a whole number of records long; exactly that
    /// many records are read.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::BlockSizeMismatch`] if the buffer is not
    /// a multiple of the block size, or [`CoreError::OutOfRange`] if the
    /// implied range extends past the end. Both are checked before any
    /// I/O.
    pub fn read_into(&self, index: u64, buf: &mut [u8]) -> CoreResult<()> {
        let header = self.read_header()?;
        let count = Self::block_count(&header, buf.len())?;
        Self::check_read_range(&header, index, count)?;

        trace!(index, count, "read records");

        let data = self.backend.read_at(header.record_offset(index), buf.len())?;
        buf.copy_from_slice(&data);
        Ok(())
    }

    /// Overwrites records starting at `index`, extending the store when
    /// the range passes the current end.
    ///
    /// `index` may be at most the current length, so a write can append
    /// but never create a gap. Existing records in the range are
    /// replaced; records before and after are untouched.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::OutOfRange`] if `index > length`, or
    /// [`CoreError::BlockSizeMismatch`] if the buffer is not a whole
    /// number of records. Both are checked before any I/O.
    pub fn write(&mut self, index: u64, blocks: &[u8]) -> CoreResult<()> {
        let mut header = self.read_header()?;
        let count = Self::block_count(&header, blocks.len())?;

        if index > header.length {
            return Err(CoreError::out_of_range(index, count, header.length));
        }
        let end = index
            .checked_add(count)
            .ok_or_else(|| CoreError::out_of_range(index, count, header.length))?;

        trace!(index, count, "write records");

        self.backend.write_at(header.record_offset(index), blocks)?;

        if end > header.length {
            header.length = end;
        }
        self.write_header(header)?;
        self.maybe_sync()?;

        Ok(())
    }

    /// Appends records at the end of the store.
    ///
    /// Returns the index of the first appended record. Positioning is
    /// O(1); existing records are never touched.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::BlockSizeMismatch`] if the buffer is not
    /// a whole number of records.
    pub fn append(&mut self, blocks: &[u8]) -> CoreResult<u64> {
        let mut header = self.read_header()?;
        let count = Self::block_count(&header, blocks.len())?;
        let index = header.length;
        let new_length = index
            .checked_add(count)
            .ok_or_else(|| CoreError::out_of_range(index, count, header.length))?;

        trace!(index, count, "append records");

        self.backend.write_at(header.record_offset(index), blocks)?;

        header.length = new_length;
        self.write_header(header)?;
        self.maybe_sync()?;

        Ok(index)
    }

    /// Inserts records at `index`, shifting the suffix toward the end.
    ///
    /// Records at `index..length` move up by the number of inserted
    /// records; nothing is overwritten. The shifted suffix passes
    /// through a transient heap buffer, so the call costs
    /// O(length - index) in both I/O and memory.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::OutOfRange`] if `index > length`, or
    /// [`CoreError::BlockSizeMismatch`] if the buffer is not a whole
    /// number of records. Both are checked before any I/O.
    pub fn insert(&mut self, index: u64, blocks: &[u8]) -> CoreResult<()> {
        let mut header = self.read_header()?;
        let count = Self::block_count(&header, blocks.len())?;

        if index > header.length {
            return Err(CoreError::out_of_range(index, count, header.length));
        }
        let new_length = header
            .length
            .checked_add(count)
            .ok_or_else(|| CoreError::out_of_range(index, count, header.length))?;

        if count == 0 {
            return Ok(());
        }

        let suffix_count = header.length - index;

        trace!(index, count, shifted = suffix_count, "insert records");

        // Lift the suffix into memory, then lay the new records and the
        // shifted suffix back down.
        let suffix = if suffix_count > 0 {
            self.backend.read_at(
                header.record_offset(index),
                (suffix_count * header.block_size) as usize,
            )?
        } else {
            Vec::new()
        };

        self.backend.write_at(header.record_offset(index), blocks)?;
        if !suffix.is_empty() {
            self.backend
                .write_at(header.record_offset(index + count), &suffix)?;
        }

        header.length = new_length;
        self.write_header(header)?;
        self.maybe_sync()?;

        Ok(())
    }

    /// Binary-searches the store for `key`, comparing against the
    /// leading key field of each probed record.
    ///
    /// Records must already be sorted by key; nothing here verifies it.
    /// Each probe reads only the key prefix of a single record, so a
    /// search costs O(log n) reads. When the key occurs more than once,
    /// the leftmost match is returned. A miss reports the insertion
    /// point that keeps the store sorted; on an empty store that is
    /// index 0.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::KeyTooWide`] if the key type is wider
    /// than one record.
    pub fn search_by_key<K: RecordKey>(&self, key: K) -> CoreResult<SearchResult> {
        let header = self.read_header()?;

        if K::WIDTH as u64 > header.block_size {
            return Err(CoreError::KeyTooWide {
                key_width: K::WIDTH as u64,
                block_size: header.block_size,
            });
        }

        let mut lo = 0u64;
        let mut hi = header.length;

        // Lower-bound loop: converges on the first record whose key is
        // not less than the target.
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let probe = self.read_key::<K>(&header, mid)?;

            if probe < key {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        if lo < header.length && self.read_key::<K>(&header, lo)? == key {
            return Ok(SearchResult::Found(lo));
        }

        Ok(SearchResult::NotFound(lo))
    }

    /// Closes the store, syncing all data to durable storage.
    ///
    /// Consuming the handle makes use-after-close unrepresentable.
    /// Dropping a store without closing it loses nothing already
    /// written, but skips the final sync.
    ///
    /// # Errors
    ///
    /// Fails if the sync fails.
    pub fn close(mut self) -> CoreResult<()> {
        self.backend.sync()?;
        debug!("closed store");
        Ok(())
    }

    fn init(
        mut backend: Box<dyn StorageBackend>,
        block_size: u64,
        options: Options,
    ) -> CoreResult<Self> {
        let header = Header::new(block_size);
        backend.write_at(0, &header.encode())?;

        let mut store = Self { backend, options };
        store.maybe_sync()?;
        Ok(store)
    }

    fn read_header(&self) -> CoreResult<Header> {
        let data = self.backend.read_at(0, HEADER_SIZE as usize)?;
        Header::decode(&data)
    }

    fn write_header(&mut self, header: Header) -> CoreResult<()> {
        self.backend.write_at(0, &header.encode())?;
        Ok(())
    }

    fn maybe_sync(&mut self) -> CoreResult<()> {
        if self.options.sync_on_write {
            self.backend.sync()?;
        }
        Ok(())
    }

    fn read_key<K: RecordKey>(&self, header: &Header, index: u64) -> CoreResult<K> {
        let data = self.backend.read_at(header.record_offset(index), K::WIDTH)?;
        Ok(K::read_from(&data))
    }

    fn validate_extent(&self, header: &Header) -> CoreResult<()> {
        let size = self.backend.size()?;
        let extent = header
            .length
            .checked_mul(header.block_size)
            .and_then(|bytes| bytes.checked_add(HEADER_SIZE))
            .ok_or_else(|| CoreError::invalid_header("declared extent overflows"))?;

        if extent > size {
            return Err(CoreError::invalid_header(format!(
                "file truncated: header declares {} records of {} bytes, file is {} bytes",
                header.length, header.block_size, size
            )));
        }

        Ok(())
    }

    fn check_read_range(header: &Header, index: u64, count: u64) -> CoreResult<()> {
        let end = index
            .checked_add(count)
            .ok_or_else(|| CoreError::out_of_range(index, count, header.length))?;

        if end > header.length {
            return Err(CoreError::out_of_range(index, count, header.length));
        }

        Ok(())
    }

    fn block_count(header: &Header, bytes: usize) -> CoreResult<u64> {
        let bytes = bytes as u64;
        if bytes % header.block_size != 0 {
            return Err(CoreError::block_size_mismatch(header.block_size, bytes));
        }
        Ok(bytes / header.block_size)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
