//! Builds a small time series, then looks values up by timestamp.
//!
//! Run with `RUST_LOG=trace` to watch the store's I/O.

use blockdb_core::{fuzzy_index, CoreResult, Record, SearchResult, Series};
use tracing_subscriber::EnvFilter;

const START: i32 = -2;
const LENGTH: i32 = 10;

/// One sample: an `i32` timestamp key and an `f64` measurement, laid
/// out in 16 bytes (key, 4 reserved bytes, value).
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

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let path = std::env::temp_dir().join("blockdb_time_series.bin");
    let mut series = Series::<Point>::create(&path)?;

    // Front half through head inserts, back half through appends.
    let half = START + LENGTH / 2;
    for time in (START..half).rev() {
        series.insert(0, &[Point::new(time)])?;
    }
    for time in half..START + LENGTH {
        series.append(&[Point::new(time)])?;
    }

    println!(
        "{} records of {} bytes in {}",
        series.length()?,
        series.block_size(),
        path.display()
    );

    for point in series.read_all()? {
        assert_eq!(point.value, f64::from(point.time) * 2.0);
        println!("  t = {:>2}  value = {:>5}", point.time, point.value);
    }

    // A present key resolves to its index.
    let probe = Point::new(3);
    match series.search(probe.key())? {
        SearchResult::Found(index) => println!("t = 3 found at index {index}"),
        SearchResult::NotFound(_) => unreachable!("key 3 is present"),
    }

    // An absent key still tells us where it belongs.
    let miss = series.search(42)?;
    let slot = fuzzy_index(miss.encode());
    println!(
        "t = 42 missing (code {}), would insert at index {}",
        miss.encode(),
        slot
    );

    series.close()?;
    Ok(())
}
