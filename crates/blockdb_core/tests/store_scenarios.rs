//! End-to-end scenarios over real files.

use blockdb_core::{
    fuzzy_index, CoreError, CoreResult, Options, Record, SearchResult, Series, Store,
};
use proptest::prelude::*;
use tempfile::tempdir;

/// One time-series point: an `i32` timestamp key and an `f64` value,
/// laid out in 16 bytes (key, 4 reserved bytes, value).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    time: i32,
    value: f64,
}

impl Point {
    fn new(time: i32) -> Self {
        Self {
            time,
            value: f64::from(time) * 2.0,
        }
    }
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

/// Builds the canonical ten-point series: keys -2 through 7, each with
/// value `2 * key`. The first three keys go in through head inserts,
/// the rest through appends, exercising both write paths.
fn build_series(series: &mut Series<Point>) {
    for time in (-2..1).rev() {
        series.insert(0, &[Point::new(time)]).unwrap();
    }
    for time in 1..8 {
        series.append(&[Point::new(time)]).unwrap();
    }
}

#[test]
fn time_series_scenario() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("points.bin");

    let mut series = Series::<Point>::create(&path).unwrap();
    build_series(&mut series);

    assert_eq!(series.length().unwrap(), 10);
    assert_eq!(series.block_size(), 16);

    let points = series.read_all().unwrap();
    for (index, point) in points.iter().enumerate() {
        let time = index as i32 - 2;
        assert_eq!(point.time, time);
        assert_eq!(point.value, f64::from(time) * 2.0);
    }

    // Every present key is found at its position.
    for (index, point) in points.iter().enumerate() {
        assert_eq!(
            series.search(point.time).unwrap(),
            SearchResult::Found(index as u64)
        );
    }

    // Misses report where an insert would keep the series sorted.
    let miss = series.search(100).unwrap();
    assert_eq!(miss, SearchResult::NotFound(10));
    assert_eq!(miss.encode(), -11);
    assert_eq!(fuzzy_index(miss.encode()), 10);

    let below = series.search(-40).unwrap();
    assert_eq!(below, SearchResult::NotFound(0));
    assert_eq!(below.encode(), -1);

    series.close().unwrap();
}

#[test]
fn store_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.bin");

    {
        let mut series = Series::<Point>::create(&path).unwrap();
        build_series(&mut series);
        series.close().unwrap();
    }

    let series = Series::<Point>::open(&path).unwrap();
    assert_eq!(series.length().unwrap(), 10);
    assert_eq!(series.get(0).unwrap(), Point::new(-2));
    assert_eq!(series.get(9).unwrap(), Point::new(7));
    assert_eq!(series.search(3).unwrap(), SearchResult::Found(5));
}

#[test]
fn raw_store_sees_the_typed_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("interop.bin");

    {
        let mut series = Series::<Point>::create(&path).unwrap();
        series.append(&[Point::new(5)]).unwrap();
        series.close().unwrap();
    }

    let store = Store::open(&path).unwrap();
    assert_eq!(store.block_size().unwrap(), 16);
    assert_eq!(store.length().unwrap(), 1);

    let block = store.read(0, 1).unwrap();
    assert_eq!(&block[0..4], &5i32.to_le_bytes());
    assert_eq!(&block[4..8], &[0u8; 4]);
    assert_eq!(&block[8..16], &10.0f64.to_le_bytes());

    // The raw handle searches the same leading key.
    assert_eq!(store.search_by_key(5i32).unwrap(), SearchResult::Found(0));
}

#[test]
fn open_missing_file_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.bin");

    let result = Store::open(&path);
    assert!(result.is_err());
    assert!(!path.exists());
}

#[test]
fn open_rejects_truncated_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("torn.bin");

    {
        let mut series = Series::<Point>::create(&path).unwrap();
        build_series(&mut series);
        series.close().unwrap();
    }

    // Cut half the records off behind the header's back.
    let file = std::fs::OpenOptions::new()
        .write(true)
        .open(&path)
        .unwrap();
    file.set_len(16 + 5 * 16).unwrap();
    drop(file);

    let result = Store::open(&path);
    assert!(matches!(result, Err(CoreError::InvalidHeader { .. })));
}

#[test]
fn open_rejects_file_smaller_than_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stub.bin");
    std::fs::write(&path, b"short").unwrap();

    let result = Store::open(&path);
    assert!(matches!(result, Err(CoreError::InvalidHeader { .. })));
}

#[test]
fn typed_open_rejects_other_record_width() {
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Narrow {
        key: i64,
    }

    impl Record for Narrow {
        const WIDTH: usize = 8;
        type Key = i64;

        fn key(&self) -> i64 {
            self.key
        }

        fn encode_into(&self, buf: &mut [u8]) {
            buf[0..8].copy_from_slice(&self.key.to_le_bytes());
        }

        fn decode_from(buf: &[u8]) -> CoreResult<Self> {
            let mut key = [0u8; 8];
            key.copy_from_slice(&buf[0..8]);
            Ok(Self {
                key: i64::from_le_bytes(key),
            })
        }
    }

    let dir = tempdir().unwrap();
    let path = dir.path().join("points.bin");

    {
        let series = Series::<Point>::create(&path).unwrap();
        series.close().unwrap();
    }

    let result = Series::<Narrow>::open(&path);
    assert!(matches!(
        result,
        Err(CoreError::BlockSizeMismatch {
            expected: 8,
            actual: 16,
        })
    ));
}

#[test]
fn create_with_error_if_exists_refuses_to_clobber() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("precious.bin");

    {
        let mut series = Series::<Point>::create(&path).unwrap();
        series.append(&[Point::new(1)]).unwrap();
        series.close().unwrap();
    }

    let options = Options::new().error_if_exists(true);
    assert!(Series::<Point>::create_with(&path, options).is_err());

    // The refused create left the original data alone.
    let series = Series::<Point>::open(&path).unwrap();
    assert_eq!(series.length().unwrap(), 1);
}

#[test]
fn sync_on_write_store_behaves_identically() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("synced.bin");

    let options = Options::new().sync_on_write(true);
    let mut series = Series::<Point>::create_with(&path, options).unwrap();
    build_series(&mut series);

    assert_eq!(series.length().unwrap(), 10);
    assert_eq!(series.search(0).unwrap(), SearchResult::Found(2));
    series.close().unwrap();
}

fn sorted_unique_keys() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::btree_set(-1_000i64..1_000, 0..48)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn append_read_round_trips(keys in proptest::collection::vec(any::<i64>(), 0..48)) {
        let mut store = Store::in_memory(8).unwrap();

        let blocks: Vec<u8> = keys.iter().flat_map(|key| key.to_le_bytes()).collect();
        store.append(&blocks).unwrap();

        prop_assert_eq!(store.length().unwrap(), keys.len() as u64);

        let data = store.read(0, keys.len() as u64).unwrap();
        let back: Vec<i64> = data
            .chunks_exact(8)
            .map(|chunk| {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(chunk);
                i64::from_le_bytes(bytes)
            })
            .collect();
        prop_assert_eq!(back, keys);
    }

    #[test]
    fn search_agrees_with_slice_binary_search(
        keys in sorted_unique_keys(),
        probe in -1_200i64..1_200,
    ) {
        let mut store = Store::in_memory(8).unwrap();
        let blocks: Vec<u8> = keys.iter().flat_map(|key| key.to_le_bytes()).collect();
        store.append(&blocks).unwrap();

        let expected = match keys.binary_search(&probe) {
            Ok(index) => SearchResult::Found(index as u64),
            Err(point) => SearchResult::NotFound(point as u64),
        };

        prop_assert_eq!(store.search_by_key(probe).unwrap(), expected);
    }

    #[test]
    fn inserting_at_the_fuzzy_index_keeps_order(
        keys in sorted_unique_keys(),
        probe in -1_200i64..1_200,
    ) {
        let mut store = Store::in_memory(8).unwrap();
        let blocks: Vec<u8> = keys.iter().flat_map(|key| key.to_le_bytes()).collect();
        store.append(&blocks).unwrap();

        let code = store.search_by_key(probe).unwrap().encode();
        let index = fuzzy_index(code);

        store.insert(index, &probe.to_le_bytes()).unwrap();

        let data = store.read(0, store.length().unwrap()).unwrap();
        let after: Vec<i64> = data
            .chunks_exact(8)
            .map(|chunk| {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(chunk);
                i64::from_le_bytes(bytes)
            })
            .collect();
        prop_assert!(after.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
