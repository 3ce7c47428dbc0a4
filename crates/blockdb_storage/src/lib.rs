//! # blockdb Storage
//!
//! Storage backend trait and implementations for blockdb.
//!
//! This crate provides the lowest-level storage abstraction for blockdb.
//! Storage backends are **opaque byte stores** - they do not interpret
//! the data they store.
//!
//! ## Design Principles
//!
//! - Backends are simple positional byte stores (read, write, sync)
//! - Every call names an explicit byte offset; no backend keeps a seek
//!   cursor between calls
//! - No knowledge of the blockdb file format - header layout and record
//!   geometry live in `blockdb_core`
//! - Nothing is cached between calls; each operation observes the store
//!   as last written
//! - Must be `Send + Sync` so handles can move across threads
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral storage
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use blockdb_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.write_at(0, b"hello world").unwrap();
//! let data = backend.read_at(0, 11).unwrap();
//! assert_eq!(&data, b"hello world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
