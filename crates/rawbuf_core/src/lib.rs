//! # RawBuf Core
//!
//! Byte buffers for RawBuf.
//!
//! This crate provides:
//! - [`Buffer`], an immutable, cheaply cloned view of a backing store
//! - [`GrowableBuffer`], an exclusively owned buffer that can be edited
//! - Subsequence search over any byte slice
//! - File persistence and Base64 conversions on [`Buffer`]
//!
//! ## Example
//!
//! ```rust
//! use rawbuf_core::{Base64EncodingOptions, Buffer, GrowableBuffer};
//!
//! let mut growable = GrowableBuffer::new();
//! growable.append(b"Man");
//! let buffer = growable.freeze();
//!
//! assert_eq!(buffer.base64_encoded(&Base64EncodingOptions::new()), "TWFu");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod error;
mod growable;
mod range;
mod search;

pub use buffer::Buffer;
pub use error::{CoreError, CoreResult};
pub use growable::GrowableBuffer;
pub use range::ByteRange;
pub use search::{find, find_in, SearchOptions};

pub use rawbuf_codec::{
    Base64DecodingOptions, Base64EncodingOptions, CodecError, CodecResult, LineLength,
};
pub use rawbuf_storage::{
    BackingKind, BackingStore, ReadingOptions, ReleaseFn, StorageError, StorageResult,
    WritingOptions,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
