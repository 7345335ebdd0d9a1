//! Backing stores.
//!
//! A [`BackingStore`] is the raw byte region underneath every buffer together
//! with the strategy that releases it. The strategy is fixed at construction
//! and is one of:
//!
//! - **Owned copy** - bytes live in a `Vec<u8>` owned by the store
//! - **Borrowed with release** - bytes live in memory owned elsewhere; an
//!   optional release action runs exactly once when the store is dropped
//! - **Memory mapped** - bytes are a private read-only map of a file,
//!   unmapped when the store is dropped
//!
//! A store never hands out mutable access. Growable buffers own a plain
//! `Vec<u8>` and only become a store when frozen.

use memmap2::Mmap;
use std::fmt;

/// Release action for externally owned memory.
///
/// Invoked exactly once with the original pointer and length.
pub type ReleaseFn = Box<dyn FnOnce(*mut u8, usize) + Send + 'static>;

/// How a [`BackingStore`] holds and releases its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackingKind {
    /// Bytes are owned by the store.
    OwnedCopy,
    /// Bytes are owned elsewhere and released through a callback (or not at all).
    BorrowedWithRelease,
    /// Bytes are a read-only memory map of a file.
    MemoryMapped,
}

impl fmt::Display for BackingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OwnedCopy => "owned",
            Self::BorrowedWithRelease => "borrowed",
            Self::MemoryMapped => "mapped",
        };
        f.write_str(name)
    }
}

/// The raw byte region underneath a buffer.
///
/// # Invariants
///
/// - `len() <= capacity()`
/// - Contents never change after construction
/// - The release action runs exactly once, when the store is dropped
///
/// # Example
///
/// ```rust
/// use rawbuf_storage::{BackingKind, BackingStore};
///
/// let store = BackingStore::copy_from_slice(b"hello");
/// assert_eq!(store.as_slice(), b"hello");
/// assert_eq!(store.kind(), BackingKind::OwnedCopy);
/// ```
pub struct BackingStore {
    region: Region,
}

enum Region {
    Owned(Vec<u8>),
    Borrowed(Foreign),
    Mapped(Mmap),
}

enum Foreign {
    Raw(RawRegion),
    Owner(Box<dyn AsRef<[u8]> + Send + Sync>),
}

struct RawRegion {
    ptr: *mut u8,
    len: usize,
    release: Option<ReleaseFn>,
}

// SAFETY: `BackingStore::from_raw_parts` makes the caller guarantee that the
// region stays valid and unmodified until released and may be read from any
// thread. The release action itself is required to be `Send`.
unsafe impl Send for RawRegion {}
// SAFETY: see above; the region is only ever read through `&self`.
unsafe impl Sync for RawRegion {}

impl RawRegion {
    fn as_slice(&self) -> &[u8] {
        // A zero-length region need not point at addressable memory.
        if self.len == 0 || self.ptr.is_null() {
            return &[];
        }
        // SAFETY: non-null, and the constructor contract guarantees `len`
        // readable bytes for as long as this region exists.
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl Drop for RawRegion {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(self.ptr, self.len);
        }
    }
}

impl BackingStore {
    /// Creates an empty owned store.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            region: Region::Owned(Vec::new()),
        }
    }

    /// Creates an owned store that takes over `bytes` without copying.
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            region: Region::Owned(bytes),
        }
    }

    /// Creates an owned store holding a copy of `bytes`.
    #[must_use]
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }

    /// Creates a borrowed store over bytes owned by `owner`.
    ///
    /// No copy is made. Dropping `owner` is the release action, so it runs
    /// when the last buffer referencing this store goes away.
    ///
    /// ```rust
    /// use rawbuf_storage::{BackingKind, BackingStore};
    ///
    /// let store = BackingStore::from_owner(vec![1u8, 2, 3].into_boxed_slice());
    /// assert_eq!(store.kind(), BackingKind::BorrowedWithRelease);
    /// assert_eq!(store.as_slice(), &[1, 2, 3]);
    /// ```
    #[must_use]
    pub fn from_owner<T>(owner: T) -> Self
    where
        T: AsRef<[u8]> + Send + Sync + 'static,
    {
        Self {
            region: Region::Borrowed(Foreign::Owner(Box::new(owner))),
        }
    }

    /// Creates a store over a read-only memory map.
    ///
    /// The map is unmapped when the store is dropped.
    #[must_use]
    pub fn from_mmap(map: Mmap) -> Self {
        Self {
            region: Region::Mapped(map),
        }
    }

    /// Creates a store from a raw pointer and length.
    ///
    /// - With `copy = true` the bytes are duplicated into an owned store and
    ///   `release`, if given, is invoked immediately afterwards with `ptr`
    ///   and `len`.
    /// - With `copy = false` the store reads directly from `ptr`. `release`,
    ///   if given, is invoked exactly once with `ptr` and `len` when the store
    ///   is dropped. Without a release action the caller stays responsible
    ///   for the memory; the store never frees it.
    ///
    /// # Safety
    ///
    /// If `len > 0`, `ptr` must be non-null and valid for reads of `len`
    /// bytes. With `copy = false` the memory must additionally stay valid and
    /// unmodified until the release action runs (or, without one, for as long
    /// as the store exists), and must be safe to read from any thread.
    pub unsafe fn from_raw_parts(
        ptr: *mut u8,
        len: usize,
        copy: bool,
        release: Option<ReleaseFn>,
    ) -> Self {
        let raw = RawRegion { ptr, len, release };
        if copy {
            let store = Self::copy_from_slice(raw.as_slice());
            // Dropping the region fires the release action right away.
            drop(raw);
            store
        } else {
            Self {
                region: Region::Borrowed(Foreign::Raw(raw)),
            }
        }
    }

    /// Returns the stored bytes.
    ///
    /// An empty store yields an empty slice and never exposes a pointer.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        match &self.region {
            Region::Owned(bytes) => bytes.as_slice(),
            Region::Borrowed(Foreign::Raw(raw)) => raw.as_slice(),
            Region::Borrowed(Foreign::Owner(owner)) => (**owner).as_ref(),
            Region::Mapped(map) => &map[..],
        }
    }

    /// Returns the number of bytes in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if the store holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the allocated capacity.
    ///
    /// Only owned stores can have spare capacity; borrowed and mapped stores
    /// report their length.
    #[must_use]
    pub fn capacity(&self) -> usize {
        match &self.region {
            Region::Owned(bytes) => bytes.capacity(),
            Region::Borrowed(_) | Region::Mapped(_) => self.len(),
        }
    }

    /// Returns how this store holds its bytes.
    #[must_use]
    pub fn kind(&self) -> BackingKind {
        match &self.region {
            Region::Owned(_) => BackingKind::OwnedCopy,
            Region::Borrowed(_) => BackingKind::BorrowedWithRelease,
            Region::Mapped(_) => BackingKind::MemoryMapped,
        }
    }

    /// Converts the store into an owned vector.
    ///
    /// Owned stores hand over their vector without copying. Other stores copy
    /// their bytes and are then dropped, which fires their release action.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        match self.region {
            Region::Owned(bytes) => bytes,
            region => {
                let store = Self { region };
                store.as_slice().to_vec()
            }
        }
    }
}

impl Default for BackingStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<u8>> for BackingStore {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl AsRef<[u8]> for BackingStore {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for BackingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackingStore")
            .field("kind", &self.kind())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
