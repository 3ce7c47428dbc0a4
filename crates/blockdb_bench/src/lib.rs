//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use rand::Rng;

/// Generates `count` records of `block_size` random bytes.
pub fn random_blocks(count: usize, block_size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..count * block_size).map(|_| rng.gen()).collect()
}

/// Builds `count` sorted 8-byte records holding the keys `0..count`.
pub fn sorted_key_blocks(count: i64) -> Vec<u8> {
    (0..count).flat_map(|key| key.to_le_bytes()).collect()
}

/// Builds `count` sorted 8-byte records holding only even keys, so
/// every odd probe misses.
pub fn even_key_blocks(count: i64) -> Vec<u8> {
    (0..count).flat_map(|key| (key * 2).to_le_bytes()).collect()
}
