//! Base64 decoder.

use crate::error::{CodecError, CodecResult};
use crate::options::Base64DecodingOptions;
use crate::{ALPHABET, PAD};

const INVALID: u8 = 0xff;

/// Maps every byte to its 6-bit value, or [`INVALID`].
const DECODE_TABLE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Decode Base64 text, returning `None` on malformed input.
///
/// This is the lossy entry point; use [`try_decode`] to learn why a decode
/// failed.
///
/// # Example
///
/// ```
/// use rawbuf_codec::{decode, Base64DecodingOptions};
///
/// let strict = Base64DecodingOptions::new();
/// assert_eq!(decode("Zm9vYmFy", &strict).as_deref(), Some(&b"foobar"[..]));
/// assert_eq!(decode("Zm9v YmFy", &strict), None);
///
/// let lenient = Base64DecodingOptions::new().ignore_unknown_characters(true);
/// assert_eq!(decode("Zm9v YmFy", &lenient).as_deref(), Some(&b"foobar"[..]));
/// ```
#[must_use]
pub fn decode(input: impl AsRef<[u8]>, options: &Base64DecodingOptions) -> Option<Vec<u8>> {
    try_decode(input, options).ok()
}

/// Decode Base64 text.
///
/// # Errors
///
/// Returns an error if the input contains a symbol outside the alphabet
/// (unless ignored), a data symbol after padding, or a number of data and
/// padding symbols that is not a multiple of 4.
pub fn try_decode(input: impl AsRef<[u8]>, options: &Base64DecodingOptions) -> CodecResult<Vec<u8>> {
    Base64Decoder::new(input.as_ref(), *options).decode()
}

/// A Base64 decoder.
///
/// Symbols are consumed one at a time. Valid symbols are packed into output
/// bytes by their position within the valid-symbol stream, so skipped
/// characters never shift the bit layout.
pub struct Base64Decoder<'a> {
    data: &'a [u8],
    options: Base64DecodingOptions,
}

impl<'a> Base64Decoder<'a> {
    /// Create a new decoder for the given text.
    pub fn new(data: &'a [u8], options: Base64DecodingOptions) -> Self {
        Self { data, options }
    }

    /// Upper bound on the decoded length.
    pub fn max_decoded_len(&self) -> usize {
        self.data.len() / 4 * 3 + 2
    }

    /// Decode the whole input.
    pub fn decode(&self) -> CodecResult<Vec<u8>> {
        let mut output = Vec::with_capacity(self.max_decoded_len());
        let mut valid = 0usize;
        let mut padding = 0usize;
        let mut current = 0u8;

        for (offset, &symbol) in self.data.iter().enumerate() {
            if symbol == PAD {
                padding += 1;
                continue;
            }

            let value = DECODE_TABLE[usize::from(symbol)];
            if value == INVALID {
                if self.options.ignore_unknown_characters {
                    continue;
                }
                return Err(CodecError::InvalidCharacter { symbol, offset });
            }
            if padding > 0 {
                return Err(CodecError::DataAfterPadding { offset });
            }

            match valid % 4 {
                0 => current = value << 2,
                1 => {
                    output.push(current | (value >> 4));
                    current = value << 4;
                }
                2 => {
                    output.push(current | (value >> 2));
                    current = value << 6;
                }
                _ => output.push(current | value),
            }
            valid += 1;
        }

        let symbols = valid + padding;
        if symbols % 4 != 0 {
            return Err(CodecError::InvalidLength { symbols });
        }
        Ok(output)
    }
}
