//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Reasons a Base64 decode can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A symbol outside the alphabet was found and unknown characters are
    /// not being ignored.
    #[error("invalid Base64 symbol 0x{symbol:02x} at offset {offset}")]
    InvalidCharacter {
        /// The offending input byte.
        symbol: u8,
        /// Offset of the byte in the input.
        offset: usize,
    },

    /// A data symbol followed a padding symbol.
    #[error("data symbol after padding at offset {offset}")]
    DataAfterPadding {
        /// Offset of the data symbol in the input.
        offset: usize,
    },

    /// Data and padding symbols do not add up to whole 4-symbol groups.
    #[error("{symbols} Base64 symbols is not a multiple of 4")]
    InvalidLength {
        /// Number of data plus padding symbols consumed.
        symbols: usize,
    },
}
