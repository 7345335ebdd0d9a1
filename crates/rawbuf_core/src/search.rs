//! Subsequence search.
//!
//! A straightforward scan: every candidate start position is tested in turn
//! until the needle matches. Backward searches run the same scan over both
//! sequences reversed, so "anchored" always means "the first candidate in
//! scan order": the start of the haystack going forward, the end of it going
//! backward.

use crate::error::CoreResult;
use crate::range::ByteRange;

/// Options for [`find`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SearchOptions {
    /// Search from the end of the haystack toward the start.
    pub backwards: bool,

    /// Only test the first candidate position.
    pub anchored: bool,
}

impl SearchOptions {
    /// Creates options for a forward, unanchored search.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            backwards: false,
            anchored: false,
        }
    }

    /// Sets whether to search backwards.
    #[must_use]
    pub const fn backwards(mut self, value: bool) -> Self {
        self.backwards = value;
        self
    }

    /// Sets whether the search is anchored.
    #[must_use]
    pub const fn anchored(mut self, value: bool) -> Self {
        self.anchored = value;
        self
    }
}

/// Finds `needle` in `haystack`.
///
/// Returns the range of the first match in scan order, or `None` if there is
/// no match. An empty needle never matches.
///
/// # Example
///
/// ```
/// use rawbuf_core::{find, ByteRange, SearchOptions};
///
/// let forward = find(b"abcdcd", b"cd", SearchOptions::new());
/// assert_eq!(forward, Some(ByteRange::new(2, 2)));
///
/// let backward = find(b"abcdcd", b"cd", SearchOptions::new().backwards(true));
/// assert_eq!(backward, Some(ByteRange::new(4, 2)));
///
/// assert_eq!(find(b"xycd", b"cd", SearchOptions::new().anchored(true)), None);
/// ```
#[must_use]
pub fn find(haystack: &[u8], needle: &[u8], options: SearchOptions) -> Option<ByteRange> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    let start = if options.backwards {
        scan_backward(haystack, needle, options.anchored)
    } else {
        scan_forward(haystack, needle, options.anchored)
    }?;
    Some(ByteRange::new(start, needle.len()))
}

/// Finds `needle` within `range` of `haystack`.
///
/// The returned range is relative to the whole haystack.
///
/// # Errors
///
/// Returns [`crate::CoreError::RangeOutOfBounds`] if `range` does not fit in
/// `haystack`.
pub fn find_in(
    haystack: &[u8],
    needle: &[u8],
    options: SearchOptions,
    range: ByteRange,
) -> CoreResult<Option<ByteRange>> {
    let window = range.check(haystack.len())?;
    let offset = window.start;
    Ok(find(&haystack[window], needle, options)
        .map(|found| ByteRange::new(found.location + offset, found.length)))
}

fn scan_forward(haystack: &[u8], needle: &[u8], anchored: bool) -> Option<usize> {
    let last = haystack.len() - needle.len();
    for start in 0..=last {
        if haystack[start..].starts_with(needle) {
            return Some(start);
        }
        if anchored {
            return None;
        }
    }
    None
}

fn scan_backward(haystack: &[u8], needle: &[u8], anchored: bool) -> Option<usize> {
    let last = haystack.len() - needle.len();
    // `skipped` is the match index in the reversed haystack.
    for skipped in 0..=last {
        let end = haystack.len() - skipped;
        if haystack[..end].ends_with(needle) {
            return Some(end - needle.len());
        }
        if anchored {
            return None;
        }
    }
    None
}
