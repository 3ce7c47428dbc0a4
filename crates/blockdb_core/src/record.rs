//! Typed records and keys.

use crate::error::CoreResult;

/// A fixed-width signed-integer key at the head of a record.
///
/// Keys are stored little-endian in the leading [`Self::WIDTH`] bytes of
/// each record. Search compares decoded values, so ordering is the
/// integer's natural order, not byte order.
pub trait RecordKey: Copy + Ord {
    /// Serialized width of the key in bytes.
    const WIDTH: usize;

    /// Writes the key into the leading bytes of `buf`.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than [`Self::WIDTH`].
    fn write_to(&self, buf: &mut [u8]);

    /// Reads a key from the leading bytes of `buf`.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than [`Self::WIDTH`].
    fn read_from(buf: &[u8]) -> Self;
}

impl RecordKey for i8 {
    const WIDTH: usize = 1;

    fn write_to(&self, buf: &mut [u8]) {
        buf[..1].copy_from_slice(&self.to_le_bytes());
    }

    fn read_from(buf: &[u8]) -> Self {
        Self::from_le_bytes([buf[0]])
    }
}

impl RecordKey for i16 {
    const WIDTH: usize = 2;

    fn write_to(&self, buf: &mut [u8]) {
        buf[..2].copy_from_slice(&self.to_le_bytes());
    }

    fn read_from(buf: &[u8]) -> Self {
        let mut bytes = [0u8; 2];
        bytes.copy_from_slice(&buf[..2]);
        Self::from_le_bytes(bytes)
    }
}

impl RecordKey for i32 {
    const WIDTH: usize = 4;

    fn write_to(&self, buf: &mut [u8]) {
        buf[..4].copy_from_slice(&self.to_le_bytes());
    }

    fn read_from(buf: &[u8]) -> Self {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&buf[..4]);
        Self::from_le_bytes(bytes)
    }
}

impl RecordKey for i64 {
    const WIDTH: usize = 8;

    fn write_to(&self, buf: &mut [u8]) {
        buf[..8].copy_from_slice(&self.to_le_bytes());
    }

    fn read_from(buf: &[u8]) -> Self {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&buf[..8]);
        Self::from_le_bytes(bytes)
    }
}

/// A typed record with a fixed serialized width and a leading key.
///
/// Implementations define how a value lays out in exactly
/// [`Self::WIDTH`] bytes. The key returned by [`Self::key`] must occupy
/// the leading [`RecordKey::WIDTH`] bytes of the encoding; search reads
/// only those bytes.
///
/// # Example
///
/// ```rust
/// use blockdb_core::{CoreResult, Record};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Reading {
///     time: i64,
///     value: f64,
/// }
///
/// impl Record for Reading {
///     const WIDTH: usize = 16;
///     type Key = i64;
///
///     fn key(&self) -> i64 {
///         self.time
///     }
///
///     fn encode_into(&self, buf: &mut [u8]) {
///         buf[0..8].copy_from_slice(&self.time.to_le_bytes());
///         buf[8..16].copy_from_slice(&self.value.to_le_bytes());
///     }
///
///     fn decode_from(buf: &[u8]) -> CoreResult<Self> {
///         let mut time = [0u8; 8];
///         time.copy_from_slice(&buf[0..8]);
///         let mut value = [0u8; 8];
///         value.copy_from_slice(&buf[8..16]);
///         Ok(Self {
///             time: i64::from_le_bytes(time),
///             value: f64::from_le_bytes(value),
///         })
///     }
/// }
/// ```
pub trait Record: Sized {
    /// Serialized width of the record in bytes.
    const WIDTH: usize;

    /// The key type at the head of the record.
    type Key: RecordKey;

    /// Returns the record's key.
    fn key(&self) -> Self::Key;

    /// Encodes the record into exactly [`Self::WIDTH`] bytes.
    ///
    /// # Panics
    ///
    /// May panic if `buf` is shorter than [`Self::WIDTH`].
    fn encode_into(&self, buf: &mut [u8]);

    /// Decodes a record from [`Self::WIDTH`] bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not form a valid record.
    fn decode_from(buf: &[u8]) -> CoreResult<Self>;
}
