//! Immutable byte buffers.

use crate::error::CoreResult;
use crate::growable::GrowableBuffer;
use crate::range::ByteRange;
use crate::search::{self, SearchOptions};
use rawbuf_codec::{Base64DecodingOptions, Base64EncodingOptions};
use rawbuf_storage::{BackingKind, BackingStore, ReadingOptions, WritingOptions};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use tracing::trace;

/// An immutable byte buffer.
///
/// A `Buffer` is a reference-counted handle to a [`BackingStore`]. Cloning a
/// buffer, or taking a subrange that covers all of it, shares the store; the
/// store's release action runs when the last handle is dropped.
///
/// Equality and hashing compare bytes, never identity.
///
/// # Thread Safety
///
/// Buffers are `Send + Sync`. The bytes can never change, so shared handles
/// need no locking.
///
/// # Example
///
/// ```rust
/// use rawbuf_core::{Buffer, ByteRange, SearchOptions};
///
/// let buffer = Buffer::copy_from_slice(b"abcdcd");
/// assert_eq!(buffer.find(b"cd", SearchOptions::new()), Some(ByteRange::new(2, 2)));
///
/// let tail = buffer.subrange(ByteRange::new(4, 2)).unwrap();
/// assert_eq!(tail.as_bytes(), b"cd");
/// ```
#[derive(Clone)]
pub struct Buffer {
    store: Arc<BackingStore>,
}

impl Buffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(BackingStore::empty())
    }

    /// Wraps an existing backing store.
    #[must_use]
    pub fn from_store(store: BackingStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Creates a buffer holding a copy of `bytes`.
    #[must_use]
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self::from_store(BackingStore::copy_from_slice(bytes))
    }

    /// Takes over `bytes` without copying.
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self::from_store(BackingStore::from_vec(bytes))
    }

    /// Creates a buffer over bytes owned by `owner`, without copying.
    ///
    /// `owner` is dropped when the last handle to the buffer is dropped.
    #[must_use]
    pub fn from_owner<T>(owner: T) -> Self
    where
        T: AsRef<[u8]> + Send + Sync + 'static,
    {
        Self::from_store(BackingStore::from_owner(owner))
    }

    /// Reads the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Storage`] if the file cannot be read.
    pub fn read_from(path: impl AsRef<Path>, options: ReadingOptions) -> CoreResult<Self> {
        let store = rawbuf_storage::read_file(path, options)?;
        Ok(Self::from_store(store))
    }

    /// Reads the file at `path`, returning `None` on any failure.
    #[must_use]
    pub fn contents_of_file(path: impl AsRef<Path>) -> Option<Self> {
        Self::read_from(path, ReadingOptions::new()).ok()
    }

    /// Writes the buffer to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Storage`] if the write fails. With atomic
    /// writes the target is left untouched on failure.
    pub fn write_to(&self, path: impl AsRef<Path>, options: WritingOptions) -> CoreResult<()> {
        rawbuf_storage::write_file(path, self.as_bytes(), options)?;
        Ok(())
    }

    /// Writes the buffer to `path`, returning whether it succeeded.
    #[must_use]
    pub fn write_to_file_atomically(&self, path: impl AsRef<Path>, atomically: bool) -> bool {
        let options = WritingOptions::new().atomic(atomically);
        self.write_to(path, options).is_ok()
    }

    /// Decodes Base64 text into a new buffer, or `None` if it is malformed.
    #[must_use]
    pub fn from_base64(input: impl AsRef<[u8]>, options: &Base64DecodingOptions) -> Option<Self> {
        rawbuf_codec::decode(input, options).map(Self::from_vec)
    }

    /// Encodes the buffer as Base64 text.
    #[must_use]
    pub fn base64_encoded(&self, options: &Base64EncodingOptions) -> String {
        rawbuf_codec::encode(self.as_bytes(), options)
    }

    /// Encodes the buffer as Base64 into a new buffer.
    #[must_use]
    pub fn base64_encoded_buffer(&self, options: &Base64EncodingOptions) -> Self {
        Self::from_vec(rawbuf_codec::encode_to_vec(self.as_bytes(), options))
    }

    /// Returns the number of bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the bytes.
    ///
    /// An empty buffer yields an empty slice; there is no pointer to check.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.store.as_slice()
    }

    /// Returns the byte at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    /// Returns an iterator over the bytes.
    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.as_bytes().iter()
    }

    /// Calls `visit` with each contiguous region of the buffer and its
    /// offset. Setting the `stop` flag ends the enumeration early.
    ///
    /// Buffers are always contiguous, so `visit` is called at most once.
    pub fn enumerate_bytes<F>(&self, mut visit: F)
    where
        F: FnMut(&[u8], usize, &mut bool),
    {
        if self.is_empty() {
            return;
        }
        let mut stop = false;
        visit(self.as_bytes(), 0, &mut stop);
    }

    /// Returns a buffer holding the bytes in `range`.
    ///
    /// A range covering the whole buffer shares this buffer's store. Any
    /// other range is copied into a new store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::RangeOutOfBounds`] if `range` does not fit.
    pub fn subrange(&self, range: ByteRange) -> CoreResult<Self> {
        let span = range.check(self.len())?;
        if span.start == 0 && span.end == self.len() {
            return Ok(self.clone());
        }
        trace!(location = span.start, length = span.len(), "copying subrange");
        Ok(Self::copy_from_slice(&self.as_bytes()[span]))
    }

    /// Finds `needle` in the buffer.
    #[must_use]
    pub fn find(&self, needle: &[u8], options: SearchOptions) -> Option<ByteRange> {
        search::find(self.as_bytes(), needle, options)
    }

    /// Finds `needle` within `range` of the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::RangeOutOfBounds`] if `range` does not fit.
    pub fn find_in(
        &self,
        needle: &[u8],
        options: SearchOptions,
        range: ByteRange,
    ) -> CoreResult<Option<ByteRange>> {
        search::find_in(self.as_bytes(), needle, options, range)
    }

    /// Returns how the underlying store holds its bytes.
    #[must_use]
    pub fn backing_kind(&self) -> BackingKind {
        self.store.kind()
    }

    /// Returns the capacity of the underlying store.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Returns true if another handle shares this buffer's store.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.store) > 1
    }

    /// Returns true if both buffers share one store.
    #[must_use]
    pub fn shares_store_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }

    /// Copies the bytes into a new growable buffer.
    #[must_use]
    pub fn to_growable(&self) -> GrowableBuffer {
        GrowableBuffer::from_vec(self.as_bytes().to_vec())
    }

    /// Converts into a growable buffer.
    ///
    /// An unshared, owned store is reused without copying; otherwise the
    /// bytes are copied.
    #[must_use]
    pub fn into_growable(self) -> GrowableBuffer {
        match Arc::try_unwrap(self.store) {
            Ok(store) => GrowableBuffer::from_vec(store.into_vec()),
            Err(shared) => {
                trace!(len = shared.len(), "copying shared store");
                GrowableBuffer::from_vec(shared.as_slice().to_vec())
            }
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Buffer {}

impl PartialEq<[u8]> for Buffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<Vec<u8>> for Buffer {
    fn eq(&self, other: &Vec<u8>) -> bool {
        self.as_bytes() == other.as_slice()
    }
}

impl Hash for Buffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl<'a> IntoIterator for &'a Buffer {
    type Item = &'a u8;
    type IntoIter = std::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<BackingStore> for Buffer {
    fn from(store: BackingStore) -> Self {
        Self::from_store(store)
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self::copy_from_slice(bytes)
    }
}

impl From<GrowableBuffer> for Buffer {
    fn from(buffer: GrowableBuffer) -> Self {
        buffer.freeze()
    }
}

impl From<Buffer> for bytes::Bytes {
    /// Converts without copying; the store stays alive as long as the
    /// returned `Bytes` does.
    fn from(buffer: Buffer) -> Self {
        bytes::Bytes::from_owner(buffer)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("kind", &self.backing_kind())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawbuf_codec::LineLength;
    use rawbuf_storage::ReleaseFn;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct Counted(Vec<u8>, Arc<AtomicUsize>);

    impl AsRef<[u8]> for Counted {
        fn as_ref(&self) -> &[u8] {
            &self.0
        }
    }

    impl Drop for Counted {
        fn drop(&mut self) {
            self.1.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn empty_buffer() {
        let buffer = Buffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.as_bytes(), b"");
        assert_eq!(buffer.get(0), None);
    }

    #[test]
    fn byte_access() {
        let buffer = Buffer::copy_from_slice(b"xyz");
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.get(1), Some(b'y'));
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), b"xyz");
        assert_eq!(&buffer[1..], b"yz");
    }

    #[test]
    fn whole_subrange_shares_store() {
        let buffer = Buffer::copy_from_slice(b"shared");
        let whole = buffer.subrange(ByteRange::full(6)).unwrap();

        assert!(whole.shares_store_with(&buffer));
        assert!(buffer.is_shared());
    }

    #[test]
    fn partial_subrange_copies() {
        let buffer = Buffer::copy_from_slice(b"partial");
        let part = buffer.subrange(ByteRange::new(1, 3)).unwrap();

        assert_eq!(part.as_bytes(), b"art");
        assert!(!part.shares_store_with(&buffer));
        assert!(!buffer.is_shared());
    }

    #[test]
    fn subrange_rejects_bad_range() {
        let buffer = Buffer::copy_from_slice(b"abc");
        assert!(buffer.subrange(ByteRange::new(2, 2)).is_err());
        assert!(buffer.subrange(ByteRange::new(3, 0)).unwrap().is_empty());
    }

    #[test]
    fn release_waits_for_last_holder() {
        let drops = Arc::new(AtomicUsize::new(0));
        let buffer = Buffer::from_owner(Counted(b"owned".to_vec(), drops.clone()));
        let whole = buffer.subrange(ByteRange::full(5)).unwrap();

        drop(buffer);
        assert_eq!(drops.load(Ordering::SeqCst), 0);
        assert_eq!(whole.as_bytes(), b"owned");

        drop(whole);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn raw_store_release_runs_once_across_clones() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let bytes: &'static [u8] = b"static bytes";
        let release: ReleaseFn = Box::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // SAFETY: the bytes are 'static and never written through the pointer.
        #[allow(unsafe_code)]
        let store = unsafe {
            BackingStore::from_raw_parts(
                bytes.as_ptr().cast_mut(),
                bytes.len(),
                false,
                Some(release),
            )
        };
        let buffer = Buffer::from_store(store);
        let clones: Vec<Buffer> = (0..4).map(|_| buffer.clone()).collect();

        drop(buffer);
        drop(clones);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn enumerate_bytes_visits_single_region() {
        let buffer = Buffer::copy_from_slice(b"region");
        let mut seen = Vec::new();
        buffer.enumerate_bytes(|region, offset, stop| {
            seen.push((region.to_vec(), offset));
            *stop = true;
        });
        assert_eq!(seen, vec![(b"region".to_vec(), 0)]);

        let mut called = false;
        Buffer::new().enumerate_bytes(|_, _, _| called = true);
        assert!(!called);
    }

    #[test]
    fn equality_and_hash_are_bytewise() {
        use std::collections::HashSet;

        let owned = Buffer::copy_from_slice(b"same");
        let borrowed = Buffer::from_owner(b"same".to_vec());
        assert_eq!(owned, borrowed);
        assert_eq!(owned, b"same".to_vec());
        assert!(owned == b"same"[..]);

        let set: HashSet<Buffer> = [owned, borrowed].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn into_growable_reuses_unique_owned_store() {
        let bytes = b"reuse".to_vec();
        let ptr = bytes.as_ptr();
        let growable = Buffer::from_vec(bytes).into_growable();
        assert_eq!(growable.as_bytes().as_ptr(), ptr);
    }

    #[test]
    fn into_growable_copies_shared_store() {
        let buffer = Buffer::copy_from_slice(b"shared");
        let other = buffer.clone();
        let mut growable = buffer.into_growable();
        growable.append(b"!");

        assert_eq!(growable.as_bytes(), b"shared!");
        assert_eq!(other.as_bytes(), b"shared");
    }

    #[test]
    fn base64_roundtrip() {
        let buffer = Buffer::copy_from_slice(b"any carnal pleasure.");
        let text = buffer.base64_encoded(&Base64EncodingOptions::new());
        assert_eq!(text, "YW55IGNhcm5hbCBwbGVhc3VyZS4=");

        let decoded = Buffer::from_base64(&text, &Base64DecodingOptions::new()).unwrap();
        assert_eq!(decoded, buffer);
        assert_eq!(decoded.backing_kind(), BackingKind::OwnedCopy);
    }

    #[test]
    fn base64_encoded_buffer_wraps() {
        let buffer = Buffer::from_vec(vec![0u8; 57]);
        let options = Base64EncodingOptions::new().line_length(LineLength::Columns76);
        let encoded = buffer.base64_encoded_buffer(&options);
        assert_eq!(encoded.len(), 78);
        assert!(encoded.as_bytes().ends_with(b"\r\n"));
    }

    #[test]
    fn from_base64_rejects_malformed() {
        assert!(Buffer::from_base64("abc", &Base64DecodingOptions::new()).is_none());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffer.bin");
        let buffer = Buffer::copy_from_slice(b"persist me");

        assert!(buffer.write_to_file_atomically(&path, true));
        let read = Buffer::read_from(&path, ReadingOptions::new().always_mapped(true)).unwrap();
        assert_eq!(read, buffer);
        assert_eq!(read.backing_kind(), BackingKind::MemoryMapped);

        assert_eq!(Buffer::contents_of_file(&path), Some(buffer));
    }

    #[test]
    fn file_failures_collapse_or_propagate() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.bin");

        assert!(Buffer::contents_of_file(&missing).is_none());
        assert!(matches!(
            Buffer::read_from(&missing, ReadingOptions::new()),
            Err(crate::CoreError::Storage(_))
        ));

        let bad_target = dir.path().join("no_such_dir").join("out.bin");
        assert!(!Buffer::new().write_to_file_atomically(&bad_target, true));
    }

    #[test]
    fn converts_to_bytes_without_copying() {
        let buffer = Buffer::copy_from_slice(b"zero copy");
        let ptr = buffer.as_bytes().as_ptr();
        let bytes = bytes::Bytes::from(buffer);
        assert_eq!(bytes.as_ptr(), ptr);
        assert_eq!(&bytes[..], b"zero copy");
    }
}
