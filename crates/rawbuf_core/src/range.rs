//! Byte ranges.

use crate::error::{CoreError, CoreResult};
use std::ops::Range;

/// A `(location, length)` span of bytes within a buffer.
///
/// A zero-length range is valid and covers no bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ByteRange {
    /// Index of the first byte.
    pub location: usize,
    /// Number of bytes.
    pub length: usize,
}

impl ByteRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    /// Creates a range covering `len` bytes from the start.
    #[must_use]
    pub const fn full(len: usize) -> Self {
        Self::new(0, len)
    }

    /// Returns true if the range covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the index one past the last byte, or `None` on overflow.
    #[must_use]
    pub const fn end(&self) -> Option<usize> {
        self.location.checked_add(self.length)
    }

    /// Validates the range against a buffer of length `len`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RangeOutOfBounds`] unless
    /// `location + length <= len`.
    pub fn check(&self, len: usize) -> CoreResult<Range<usize>> {
        match self.end() {
            Some(end) if end <= len => Ok(self.location..end),
            _ => Err(CoreError::RangeOutOfBounds {
                location: self.location,
                length: self.length,
                len,
            }),
        }
    }
}

impl From<Range<usize>> for ByteRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end.saturating_sub(range.start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_accepts_ranges_inside() {
        assert_eq!(ByteRange::new(2, 3).check(5).unwrap(), 2..5);
        assert_eq!(ByteRange::new(5, 0).check(5).unwrap(), 5..5);
        assert_eq!(ByteRange::full(0).check(0).unwrap(), 0..0);
    }

    #[test]
    fn check_rejects_ranges_outside() {
        assert!(matches!(
            ByteRange::new(4, 2).check(5),
            Err(CoreError::RangeOutOfBounds {
                location: 4,
                length: 2,
                len: 5
            })
        ));
        assert!(ByteRange::new(6, 0).check(5).is_err());
    }

    #[test]
    fn check_rejects_overflow() {
        assert_eq!(ByteRange::new(usize::MAX, 2).end(), None);
        assert!(ByteRange::new(usize::MAX, 2).check(usize::MAX).is_err());
    }

    #[test]
    fn from_std_range() {
        assert_eq!(ByteRange::from(3..7), ByteRange::new(3, 4));
        assert!(ByteRange::from(3..3).is_empty());
    }
}
