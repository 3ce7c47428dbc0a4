//! Typed store handles.

use crate::error::{CoreError, CoreResult};
use crate::options::Options;
use crate::record::Record;
use crate::search::SearchResult;
use crate::store::Store;
use std::marker::PhantomData;
use std::path::Path;

/// A typed handle over a [`Store`].
///
/// `Series<R>` fixes the block size to `R::WIDTH` and moves encoding
/// and decoding behind the [`Record`] trait, so callers deal in values
/// instead of byte slices. Opening a file whose block size disagrees
/// with `R::WIDTH` fails instead of reinterpreting bytes.
///
/// All operations delegate to the raw store and share its contract:
/// single writer, unbuffered I/O, caller-maintained sort order.
///
/// # Example
///
/// ```rust,ignore
/// let mut series = Series::<Point>::create(Path::new("points.bin"))?;
///
/// series.append(&[Point { time: 4, value: 8.0 }])?;
/// series.insert(0, &[Point { time: 2, value: 4.0 }])?;
///
/// match series.search(4)? {
///     SearchResult::Found(index) => println!("hit at {index}"),
///     SearchResult::NotFound(point) => println!("would insert at {point}"),
/// }
/// ```
pub struct Series<R: Record> {
    store: Store,
    _marker: PhantomData<R>,
}

impl<R: Record> Series<R> {
    /// Creates a new series file, truncating any existing file at
    /// `path`. The block size is fixed to `R::WIDTH`.
    ///
    /// # Errors
    ///
    /// Fails with an I/O error if the file cannot be created.
    pub fn create(path: &Path) -> CoreResult<Self> {
        Self::create_with(path, Options::default())
    }

    /// Creates a new series file with explicit options.
    ///
    /// # Errors
    ///
    /// Fails with an I/O error if the file cannot be created.
    pub fn create_with(path: &Path, options: Options) -> CoreResult<Self> {
        let store = Store::create_with(path, R::WIDTH as u64, options)?;
        Ok(Self {
            store,
            _marker: PhantomData,
        })
    }

    /// Opens an existing series file.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::BlockSizeMismatch`] if the file's block
    /// size differs from `R::WIDTH`, or with the errors of
    /// [`Store::open`].
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::open_with(path, Options::default())
    }

    /// Opens an existing series file with explicit options.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::BlockSizeMismatch`] if the file's block
    /// size differs from `R::WIDTH`, or with the errors of
    /// [`Store::open`].
    pub fn open_with(path: &Path, options: Options) -> CoreResult<Self> {
        Self::from_store(Store::open_with(path, options)?)
    }

    /// Creates an ephemeral in-memory series.
    ///
    /// # Errors
    ///
    /// Fails if the backing store cannot be initialized.
    pub fn in_memory() -> CoreResult<Self> {
        let store = Store::in_memory(R::WIDTH as u64)?;
        Ok(Self {
            store,
            _marker: PhantomData,
        })
    }

    /// Wraps an open raw store, verifying its block size against
    /// `R::WIDTH`.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::BlockSizeMismatch`] if the store's block
    /// size differs from `R::WIDTH`.
    pub fn from_store(store: Store) -> CoreResult<Self> {
        let block_size = store.block_size()?;
        if block_size != R::WIDTH as u64 {
            return Err(CoreError::block_size_mismatch(R::WIDTH as u64, block_size));
        }

        Ok(Self {
            store,
            _marker: PhantomData,
        })
    }

    /// Returns the number of records in the series.
    ///
    /// # Errors
    ///
    /// Fails if the header cannot be read.
    pub fn length(&self) -> CoreResult<u64> {
        self.store.length()
    }

    /// Returns `true` if the series holds no records.
    ///
    /// # Errors
    ///
    /// Fails if the header cannot be read.
    pub fn is_empty(&self) -> CoreResult<bool> {
        self.store.is_empty()
    }

    /// Returns the fixed record size in bytes.
    #[must_use]
    pub fn block_size(&self) -> u64 {
        R::WIDTH as u64
    }

    /// Decodes the record at `index`.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::OutOfRange`] if `index` is past the end,
    /// or [`CoreError::InvalidRecord`] if the bytes do not decode.
    pub fn get(&self, index: u64) -> CoreResult<R> {
        let data = self.store.read(index, 1)?;
        R::decode_from(&data)
    }

    /// Decodes `count` records starting at `index`.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::OutOfRange`] if the range extends past
    /// the end, or [`CoreError::InvalidRecord`] if any record fails to
    /// decode.
    pub fn read(&self, index: u64, count: u64) -> CoreResult<Vec<R>> {
        let data = self.store.read(index, count)?;

        let mut out = Vec::with_capacity(count as usize);
        for chunk in data.chunks_exact(R::WIDTH) {
            out.push(R::decode_from(chunk)?);
        }
        Ok(out)
    }

    /// Decodes every record in the series.
    ///
    /// # Errors
    ///
    /// Fails if the header cannot be read or any record fails to
    /// decode.
    pub fn read_all(&self) -> CoreResult<Vec<R>> {
        let length = self.store.length()?;
        self.read(0, length)
    }

    /// Encodes and overwrites records starting at `index`, extending
    /// the series when the range passes the current end.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::OutOfRange`] if `index` is past the
    /// current length.
    pub fn write(&mut self, index: u64, items: &[R]) -> CoreResult<()> {
        let blocks = Self::encode_batch(items);
        self.store.write(index, &blocks)
    }

    /// Encodes and appends records, returning the index of the first.
    ///
    /// # Errors
    ///
    /// Fails if the underlying write fails.
    pub fn append(&mut self, items: &[R]) -> CoreResult<u64> {
        let blocks = Self::encode_batch(items);
        self.store.append(&blocks)
    }

    /// Encodes and inserts records at `index`, shifting the suffix
    /// toward the end.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::OutOfRange`] if `index` is past the
    /// current length.
    pub fn insert(&mut self, index: u64, items: &[R]) -> CoreResult<()> {
        let blocks = Self::encode_batch(items);
        self.store.insert(index, &blocks)
    }

    /// Binary-searches for a record by key.
    ///
    /// Shares the contract of [`Store::search_by_key`]: records must be
    /// sorted by key, and duplicates resolve to the leftmost match.
    ///
    /// # Errors
    ///
    /// Fails if a probe read fails.
    pub fn search(&self, key: R::Key) -> CoreResult<SearchResult> {
        self.store.search_by_key(key)
    }

    /// Closes the series, syncing all data to durable storage.
    ///
    /// # Errors
    ///
    /// Fails if the sync fails.
    pub fn close(self) -> CoreResult<()> {
        self.store.close()
    }

    /// Unwraps the typed handle back into the raw store.
    #[must_use]
    pub fn into_store(self) -> Store {
        self.store
    }

    fn encode_batch(items: &[R]) -> Vec<u8> {
        let mut blocks = vec![0u8; items.len() * R::WIDTH];
        for (item, chunk) in items.iter().zip(blocks.chunks_exact_mut(R::WIDTH)) {
            item.encode_into(chunk);
        }
        blocks
    }
}

impl<R: Record> std::fmt::Debug for Series<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Series")
            .field("store", &self.store)
            .field("record_width", &R::WIDTH)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Point {
        time: i32,
        value: f64,
    }

    impl Record for Point {
        const WIDTH: usize = 16;
        type Key = i32;

        fn key(&self) -> i32 {
            self.time
        }

        fn encode_into(&self, buf: &mut [u8]) {
            buf[0..4].copy_from_slice(&self.time.to_le_bytes());
            buf[4..8].fill(0);
            buf[8..16].copy_from_slice(&self.value.to_le_bytes());
        }

        fn decode_from(buf: &[u8]) -> CoreResult<Self> {
            if buf.len() < Self::WIDTH {
                return Err(CoreError::invalid_record("point record too short"));
            }

            let mut time = [0u8; 4];
            time.copy_from_slice(&buf[0..4]);
            let mut value = [0u8; 8];
            value.copy_from_slice(&buf[8..16]);

            Ok(Self {
                time: i32::from_le_bytes(time),
                value: f64::from_le_bytes(value),
            })
        }
    }

    fn point(time: i32) -> Point {
        Point {
            time,
            value: f64::from(time) * 2.0,
        }
    }

    #[test]
    fn block_size_is_fixed_by_the_type() {
        let series = Series::<Point>::in_memory().unwrap();
        assert_eq!(series.block_size(), 16);
        assert!(series.is_empty().unwrap());
    }

    #[test]
    fn append_get_round_trip() {
        let mut series = Series::<Point>::in_memory().unwrap();

        series.append(&[point(1), point(2), point(3)]).unwrap();

        assert_eq!(series.length().unwrap(), 3);
        assert_eq!(series.get(0).unwrap(), point(1));
        assert_eq!(series.get(2).unwrap(), point(3));
    }

    #[test]
    fn read_decodes_a_range() {
        let mut series = Series::<Point>::in_memory().unwrap();
        series.append(&[point(1), point(2), point(3), point(4)]).unwrap();

        let middle = series.read(1, 2).unwrap();
        assert_eq!(middle, vec![point(2), point(3)]);
    }

    #[test]
    fn read_all_returns_everything() {
        let mut series = Series::<Point>::in_memory().unwrap();
        series.append(&[point(5), point(6)]).unwrap();

        assert_eq!(series.read_all().unwrap(), vec![point(5), point(6)]);
    }

    #[test]
    fn write_replaces_records() {
        let mut series = Series::<Point>::in_memory().unwrap();
        series.append(&[point(1), point(2)]).unwrap();

        series.write(1, &[point(9)]).unwrap();

        assert_eq!(series.read_all().unwrap(), vec![point(1), point(9)]);
    }

    #[test]
    fn insert_keeps_order() {
        let mut series = Series::<Point>::in_memory().unwrap();
        series.append(&[point(1), point(4)]).unwrap();

        series.insert(1, &[point(2), point(3)]).unwrap();

        let times: Vec<i32> = series
            .read_all()
            .unwrap()
            .iter()
            .map(|p| p.time)
            .collect();
        assert_eq!(times, vec![1, 2, 3, 4]);
    }

    #[test]
    fn search_by_leading_key() {
        let mut series = Series::<Point>::in_memory().unwrap();
        series
            .append(&[point(-3), point(0), point(4), point(9)])
            .unwrap();

        assert_eq!(series.search(-3).unwrap(), SearchResult::Found(0));
        assert_eq!(series.search(4).unwrap(), SearchResult::Found(2));
        assert_eq!(series.search(5).unwrap(), SearchResult::NotFound(3));
        assert_eq!(series.search(-10).unwrap(), SearchResult::NotFound(0));
    }

    #[test]
    fn get_out_of_range_fails() {
        let series = Series::<Point>::in_memory().unwrap();

        let result = series.get(0);
        assert!(matches!(result, Err(CoreError::OutOfRange { .. })));
    }

    #[test]
    fn from_store_rejects_mismatched_block_size() {
        let store = Store::in_memory(8).unwrap();

        let result = Series::<Point>::from_store(store);
        assert!(matches!(
            result,
            Err(CoreError::BlockSizeMismatch {
                expected: 16,
                actual: 8,
            })
        ));
    }

    #[test]
    fn into_store_returns_the_raw_handle() {
        let mut series = Series::<Point>::in_memory().unwrap();
        series.append(&[point(3)]).unwrap();

        let store = series.into_store();
        assert_eq!(store.length().unwrap(), 1);
        assert_eq!(store.block_size().unwrap(), 16);
    }
}
