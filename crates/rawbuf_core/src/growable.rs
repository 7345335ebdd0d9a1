//! Growable byte buffers.

use crate::buffer::Buffer;
use crate::error::{CoreError, CoreResult};
use crate::range::ByteRange;
use std::fmt;
use std::io;
use std::ops::{Deref, DerefMut};

/// A mutable, growable byte buffer.
///
/// A growable buffer always owns its bytes exclusively; nothing else can
/// observe them until it is frozen into a [`Buffer`].
///
/// Growth is amortized. Allocation failure aborts the process, as it does for
/// every `Vec`.
///
/// # Example
///
/// ```rust
/// use rawbuf_core::{ByteRange, GrowableBuffer};
///
/// let mut buffer = GrowableBuffer::new();
/// buffer.append(b"hello ");
/// buffer.append(b"world");
/// buffer.replace(ByteRange::new(0, 5), b"HELLO").unwrap();
/// assert_eq!(buffer.as_bytes(), b"HELLO world");
///
/// let frozen = buffer.freeze();
/// assert_eq!(frozen.len(), 11);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct GrowableBuffer {
    bytes: Vec<u8>,
}

impl GrowableBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Creates an empty buffer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Creates a buffer of `len` zero bytes.
    #[must_use]
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    /// Takes over `bytes` without copying.
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Returns the number of bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the allocated capacity, always at least `len()`.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Returns the bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the bytes for in-place mutation.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Appends `bytes` to the end.
    pub fn append(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Truncates, or extends with zero bytes, to `new_length`.
    pub fn set_length(&mut self, new_length: usize) {
        self.bytes.resize(new_length, 0);
    }

    /// Extends the buffer by `additional` zero bytes.
    pub fn increase_length(&mut self, additional: usize) {
        self.set_length(self.len() + additional);
    }

    /// Replaces the bytes in `range` with the first `new_length` bytes of
    /// `replacement`.
    ///
    /// Bytes after the range shift by `new_length - range.length`. A `None`
    /// replacement deletes the range when `new_length` is zero and does
    /// nothing otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RangeOutOfBounds`] if `range` does not fit, or
    /// [`CoreError::ReplacementTooShort`] if `replacement` has fewer than
    /// `new_length` bytes.
    pub fn replace_bytes(
        &mut self,
        range: ByteRange,
        replacement: Option<&[u8]>,
        new_length: usize,
    ) -> CoreResult<()> {
        let span = range.check(self.len())?;
        let replacement: &[u8] = match replacement {
            Some(bytes) => bytes.get(..new_length).ok_or(CoreError::ReplacementTooShort {
                requested: new_length,
                available: bytes.len(),
            })?,
            None if new_length > 0 => return Ok(()),
            None => &[],
        };
        self.bytes.splice(span, replacement.iter().copied());
        Ok(())
    }

    /// Replaces the bytes in `range` with `replacement`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RangeOutOfBounds`] if `range` does not fit.
    pub fn replace(&mut self, range: ByteRange, replacement: &[u8]) -> CoreResult<()> {
        self.replace_bytes(range, Some(replacement), replacement.len())
    }

    /// Zero-fills the bytes in `range`; the length is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RangeOutOfBounds`] if `range` does not fit.
    pub fn reset_bytes(&mut self, range: ByteRange) -> CoreResult<()> {
        let span = range.check(self.len())?;
        self.bytes[span].fill(0);
        Ok(())
    }

    /// Converts into an immutable buffer without copying.
    #[must_use]
    pub fn freeze(self) -> Buffer {
        Buffer::from_vec(self.bytes)
    }

    /// Returns the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

impl Deref for GrowableBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl DerefMut for GrowableBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl AsRef<[u8]> for GrowableBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsMut<[u8]> for GrowableBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl io::Write for GrowableBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Extend<u8> for GrowableBuffer {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        self.bytes.extend(iter);
    }
}

impl<'a> Extend<&'a u8> for GrowableBuffer {
    fn extend<I: IntoIterator<Item = &'a u8>>(&mut self, iter: I) {
        self.bytes.extend(iter);
    }
}

impl From<Vec<u8>> for GrowableBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl From<&[u8]> for GrowableBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }
}

impl From<Buffer> for GrowableBuffer {
    fn from(buffer: Buffer) -> Self {
        buffer.into_growable()
    }
}

impl fmt::Debug for GrowableBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowableBuffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
