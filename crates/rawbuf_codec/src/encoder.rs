//! Base64 encoder.

use crate::options::Base64EncodingOptions;
use crate::{ALPHABET, PAD};

/// Encode bytes as Base64 text.
///
/// Output uses the standard alphabet with `=` padding. If a line length is
/// set, the terminator follows every full line, including the last one when
/// the output ends exactly on a line boundary.
///
/// # Example
///
/// ```
/// use rawbuf_codec::{encode, Base64EncodingOptions};
///
/// assert_eq!(encode(b"foobar", &Base64EncodingOptions::new()), "Zm9vYmFy");
/// ```
#[must_use]
pub fn encode(bytes: &[u8], options: &Base64EncodingOptions) -> String {
    // Alphabet, padding and terminators are all ASCII.
    encode_to_vec(bytes, options)
        .into_iter()
        .map(char::from)
        .collect()
}

/// Encode bytes as Base64 into a byte vector.
#[must_use]
pub fn encode_to_vec(bytes: &[u8], options: &Base64EncodingOptions) -> Vec<u8> {
    let mut encoder = Base64Encoder::with_capacity(*options, encoded_len(bytes.len(), options));
    encoder.encode(bytes);
    encoder.finish()
}

/// Returns the exact encoded length of `input_len` bytes.
#[must_use]
pub fn encoded_len(input_len: usize, options: &Base64EncodingOptions) -> usize {
    let symbols = input_len.div_ceil(3) * 4;
    match options.line_length {
        None => symbols,
        Some(line) => symbols + (symbols / line.symbols()) * options.terminator().len(),
    }
}

/// A streaming Base64 encoder.
///
/// Input may arrive in any number of [`Base64Encoder::encode`] calls. Up to
/// two trailing bytes are held back until more input completes their group;
/// [`Base64Encoder::finish`] emits the final group with its padding. Line
/// wrapping carries over between calls.
///
/// # Example
///
/// ```
/// use rawbuf_codec::{Base64EncodingOptions, Base64Encoder};
///
/// let mut encoder = Base64Encoder::new(Base64EncodingOptions::new());
/// encoder.encode(b"a");
/// encoder.encode(b"b");
/// assert_eq!(encoder.finish(), b"YWI=");
/// ```
pub struct Base64Encoder {
    options: Base64EncodingOptions,
    buffer: Vec<u8>,
    column: usize,
    pending: [u8; 2],
    pending_len: usize,
}

impl Base64Encoder {
    /// Create a new encoder.
    pub fn new(options: Base64EncodingOptions) -> Self {
        Self::with_capacity(options, 0)
    }

    /// Create a new encoder with the specified output capacity.
    pub fn with_capacity(options: Base64EncodingOptions, capacity: usize) -> Self {
        Self {
            options,
            buffer: Vec::with_capacity(capacity),
            column: 0,
            pending: [0; 2],
            pending_len: 0,
        }
    }

    /// Encode `bytes`, appending every complete group to the output.
    pub fn encode(&mut self, mut bytes: &[u8]) {
        if self.pending_len > 0 {
            let take = (3 - self.pending_len).min(bytes.len());
            let mut group = [0u8; 3];
            group[..self.pending_len].copy_from_slice(&self.pending[..self.pending_len]);
            group[self.pending_len..self.pending_len + take].copy_from_slice(&bytes[..take]);
            bytes = &bytes[take..];
            if self.pending_len + take < 3 {
                self.pending[..self.pending_len + take]
                    .copy_from_slice(&group[..self.pending_len + take]);
                self.pending_len += take;
                return;
            }
            self.pending_len = 0;
            self.push_group(&group);
        }

        let mut groups = bytes.chunks_exact(3);
        for group in &mut groups {
            self.push_group(group);
        }
        let rest = groups.remainder();
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
    }

    /// Flush any held-back bytes with padding and return the encoded bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if self.pending_len > 0 {
            let pending = self.pending;
            let len = self.pending_len;
            self.pending_len = 0;
            self.push_group(&pending[..len]);
        }
        self.buffer
    }

    /// Consume this encoder and return the encoded bytes.
    ///
    /// Same as [`Base64Encoder::finish`].
    pub fn into_bytes(self) -> Vec<u8> {
        self.finish()
    }

    /// Get a reference to the bytes encoded so far.
    ///
    /// Held-back bytes are not included until [`Base64Encoder::finish`].
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Encodes a group of one to three bytes, padding a short group.
    fn push_group(&mut self, group: &[u8]) {
        let b0 = group[0];
        let b1 = group.get(1).copied().unwrap_or(0);
        let b2 = group.get(2).copied().unwrap_or(0);
        let bits = (u32::from(b0) << 16) | (u32::from(b1) << 8) | u32::from(b2);
        let symbol = |shift: u32| ALPHABET[((bits >> shift) & 0x3f) as usize];

        let quad = match group.len() {
            3 => [symbol(18), symbol(12), symbol(6), symbol(0)],
            2 => [symbol(18), symbol(12), symbol(6), PAD],
            _ => [symbol(18), symbol(12), PAD, PAD],
        };
        self.push_quad(quad);
    }

    fn push_quad(&mut self, quad: [u8; 4]) {
        self.buffer.extend_from_slice(&quad);
        if let Some(line) = self.options.line_length {
            // Both supported line lengths are multiples of 4.
            self.column += 4;
            if self.column == line.symbols() {
                self.buffer.extend_from_slice(self.options.terminator());
                self.column = 0;
            }
        }
    }
}
