//! Error types for RawBuf core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in RawBuf core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage error while reading or writing a file.
    #[error("storage error: {0}")]
    Storage(#[from] rawbuf_storage::StorageError),

    /// A range does not fit inside the buffer.
    #[error("range at {location} of length {length} is out of bounds for buffer of length {len}")]
    RangeOutOfBounds {
        /// Start of the requested range.
        location: usize,
        /// Length of the requested range.
        length: usize,
        /// Length of the buffer.
        len: usize,
    },

    /// Fewer replacement bytes were supplied than the requested length.
    #[error("replacement requested {requested} bytes but only {available} were supplied")]
    ReplacementTooShort {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes supplied.
        available: usize,
    },
}
