//! # RawBuf Codec
//!
//! Standard Base64 encoding/decoding for RawBuf.
//!
//! The codec is stateless and works on plain byte slices, so it can be used
//! with any buffer type.
//!
//! ## Rules
//!
//! - Alphabet `A-Z`, `a-z`, `0-9`, `+`, `/`; padding `=`
//! - Every 3 input bytes become 4 symbols; a trailing 1 or 2 bytes are padded
//!   with `==` or `=`
//! - Optional line wrapping at 64 or 76 symbols with CR, LF or CRLF
//! - Padding must be a suffix; data and padding together must form whole
//!   4-symbol groups
//! - Unknown characters fail the decode unless explicitly ignored
//!
//! ## Usage
//!
//! ```
//! use rawbuf_codec::{decode, encode, Base64DecodingOptions, Base64EncodingOptions};
//!
//! let text = encode(b"hello", &Base64EncodingOptions::new());
//! assert_eq!(text, "aGVsbG8=");
//!
//! let bytes = decode(&text, &Base64DecodingOptions::new()).unwrap();
//! assert_eq!(bytes, b"hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod options;

pub use decoder::{decode, try_decode, Base64Decoder};
pub use encoder::{encode, encode_to_vec, encoded_len, Base64Encoder};
pub use error::{CodecError, CodecResult};
pub use options::{Base64DecodingOptions, Base64EncodingOptions, LineLength};

/// The standard Base64 alphabet, indexed by 6-bit value.
pub(crate) const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// The padding symbol.
pub(crate) const PAD: u8 = b'=';
