//! # blockdb Core
//!
//! Flat-file record store for blockdb.
//!
//! A store is a single file: a fixed 16-byte header (record count and
//! record size, both little-endian `u64`) followed by contiguous
//! fixed-size records. On top of that layout this crate provides:
//!
//! - Append, ranged read/write, and ordered insertion with shifting
//! - Binary search on a leading signed-integer key
//! - A typed layer ([`Series`]) that fixes the record layout per type
//!
//! The store is deliberately small: one writer, synchronous and
//! unbuffered I/O, nothing cached between calls, and sort order
//! maintained by the caller rather than enforced.
//!
//! ## Example
//!
//! ```rust
//! use blockdb_core::{CoreResult, Record, SearchResult, Series};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! struct Point {
//!     time: i32,
//!     value: f64,
//! }
//!
//! impl Record for Point {
//!     const WIDTH: usize = 16;
//!     type Key = i32;
//!
//!     fn key(&self) -> i32 {
//!         self.time
//!     }
//!
//!     fn encode_into(&self, buf: &mut [u8]) {
//!         buf[0..4].copy_from_slice(&self.time.to_le_bytes());
//!         buf[4..8].fill(0);
//!         buf[8..16].copy_from_slice(&self.value.to_le_bytes());
//!     }
//!
//!     fn decode_from(buf: &[u8]) -> CoreResult<Self> {
//!         let mut time = [0u8; 4];
//!         time.copy_from_slice(&buf[0..4]);
//!         let mut value = [0u8; 8];
//!         value.copy_from_slice(&buf[8..16]);
//!         Ok(Self {
//!             time: i32::from_le_bytes(time),
//!             value: f64::from_le_bytes(value),
//!         })
//!     }
//! }
//!
//! fn main() -> CoreResult<()> {
//!     let mut series = Series::<Point>::in_memory()?;
//!
//!     series.append(&[
//!         Point { time: 1, value: 2.0 },
//!         Point { time: 3, value: 6.0 },
//!     ])?;
//!     series.insert(0, &[Point { time: 0, value: 0.0 }])?;
//!
//!     assert_eq!(series.search(3)?, SearchResult::Found(2));
//!     assert_eq!(series.search(2)?, SearchResult::NotFound(2));
//!
//!     series.close()
//! }
//! ```
//!
//! For untyped access to the same format, use [`Store`] directly; it
//! deals in raw record-aligned byte buffers.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod header;
mod options;
mod record;
mod search;
mod series;
mod store;

pub use error::{CoreError, CoreResult};
pub use header::{Header, HEADER_SIZE};
pub use options::Options;
pub use record::{Record, RecordKey};
pub use search::{fuzzy_index, SearchResult};
pub use series::Series;
pub use store::Store;
