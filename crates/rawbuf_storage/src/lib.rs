//! # RawBuf Storage
//!
//! Backing stores and file persistence for RawBuf.
//!
//! This crate provides the lowest layer of RawBuf: the raw byte region a
//! buffer sits on, and the code that moves those bytes to and from disk.
//! Backing stores are **opaque byte regions** - they do not interpret the data
//! they hold.
//!
//! ## Backing Kinds
//!
//! - [`BackingKind::OwnedCopy`] - bytes owned by the store
//! - [`BackingKind::BorrowedWithRelease`] - externally owned bytes, released
//!   through a callback exactly once
//! - [`BackingKind::MemoryMapped`] - a private read-only file map
//!
//! ## Example
//!
//! ```rust
//! use rawbuf_storage::{read_file, write_file, ReadingOptions, WritingOptions};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("hello.bin");
//!
//! write_file(&path, b"hello world", WritingOptions::new().atomic(true)).unwrap();
//! let store = read_file(&path, ReadingOptions::new()).unwrap();
//! assert_eq!(store.as_slice(), b"hello world");
//! ```

#![warn(missing_docs)]

mod error;
mod file;
mod options;
mod store;

pub use error::{StorageError, StorageResult};
pub use file::{read_file, write_file};
pub use options::{ReadingOptions, WritingOptions};
pub use store::{BackingKind, BackingStore, ReleaseFn};
