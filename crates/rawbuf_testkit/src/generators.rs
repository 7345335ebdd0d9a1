//! Property-based test generators using proptest.
//!
//! Provides strategies for bytes, option sets, ranges, and edit sequences.

use proptest::prelude::*;
use rawbuf_core::{
    Base64DecodingOptions, Base64EncodingOptions, ByteRange, GrowableBuffer, LineLength,
    SearchOptions,
};

/// Strategy for arbitrary byte payloads.
pub fn bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..1024)
}

/// Strategy for bytes drawn from a four-symbol alphabet, so searches hit
/// often.
pub fn narrow_bytes_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..4, 0..max_len)
}

/// Strategy for non-empty needles over the same alphabet as
/// [`narrow_bytes_strategy`].
pub fn needle_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..4, 1..5)
}

/// Strategy for a haystack guaranteed to contain the returned needle.
pub fn haystack_with_needle_strategy() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    (
        narrow_bytes_strategy(32),
        needle_strategy(),
        narrow_bytes_strategy(32),
    )
        .prop_map(|(mut prefix, needle, suffix)| {
            prefix.extend_from_slice(&needle);
            prefix.extend_from_slice(&suffix);
            (prefix, needle)
        })
}

/// Strategy for Base64 encoding options.
pub fn encoding_options_strategy() -> impl Strategy<Value = Base64EncodingOptions> {
    (
        prop_oneof![
            Just(None),
            Just(Some(LineLength::Columns64)),
            Just(Some(LineLength::Columns76)),
        ],
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(line_length, carriage_return, line_feed)| {
            let options = Base64EncodingOptions::new()
                .carriage_return(carriage_return)
                .line_feed(line_feed);
            match line_length {
                Some(length) => options.line_length(length),
                None => options,
            }
        })
}

/// Strategy for Base64 decoding options.
pub fn decoding_options_strategy() -> impl Strategy<Value = Base64DecodingOptions> {
    any::<bool>().prop_map(|ignore| Base64DecodingOptions::new().ignore_unknown_characters(ignore))
}

/// Strategy for search options.
pub fn search_options_strategy() -> impl Strategy<Value = SearchOptions> {
    (any::<bool>(), any::<bool>()).prop_map(|(backwards, anchored)| {
        SearchOptions::new()
            .backwards(backwards)
            .anchored(anchored)
    })
}

/// Strategy for ranges that fit inside a buffer of length `len`.
pub fn range_within(len: usize) -> impl Strategy<Value = ByteRange> {
    (0..=len)
        .prop_flat_map(move |location| (Just(location), 0..=len - location))
        .prop_map(|(location, length)| ByteRange::new(location, length))
}

/// An edit applied to a [`GrowableBuffer`].
#[derive(Debug, Clone)]
pub enum GrowableOperation {
    /// Append bytes
    Append {
        /// Bytes to append
        bytes: Vec<u8>,
    },
    /// Set the length, truncating or zero-extending
    SetLength {
        /// New length
        length: usize,
    },
    /// Replace a range, given as fractions of the current length
    Replace {
        /// Start, scaled into the current length
        start: u8,
        /// Span, scaled into the remaining length
        span: u8,
        /// Replacement bytes
        bytes: Vec<u8>,
    },
    /// Zero-fill a range, given as fractions of the current length
    Reset {
        /// Start, scaled into the current length
        start: u8,
        /// Span, scaled into the remaining length
        span: u8,
    },
}

impl GrowableOperation {
    /// Applies the edit to `buffer` and to a plain `Vec` model.
    pub fn apply(&self, buffer: &mut GrowableBuffer, model: &mut Vec<u8>) {
        match self {
            Self::Append { bytes } => {
                buffer.append(bytes);
                model.extend_from_slice(bytes);
            }
            Self::SetLength { length } => {
                buffer.set_length(*length);
                model.resize(*length, 0);
            }
            Self::Replace { start, span, bytes } => {
                let range = scaled_range(model.len(), *start, *span);
                buffer
                    .replace(range, bytes)
                    .expect("Scaled range must fit");
                model.splice(range.location..range.location + range.length, bytes.iter().copied());
            }
            Self::Reset { start, span } => {
                let range = scaled_range(model.len(), *start, *span);
                buffer.reset_bytes(range).expect("Scaled range must fit");
                model[range.location..range.location + range.length].fill(0);
            }
        }
    }
}

fn scaled_range(len: usize, start: u8, span: u8) -> ByteRange {
    let location = len * usize::from(start) / 255;
    let length = (len - location) * usize::from(span) / 255;
    ByteRange::new(location, length)
}

/// Strategy for a single growable buffer edit.
pub fn growable_operation_strategy() -> impl Strategy<Value = GrowableOperation> {
    let small_bytes = || prop::collection::vec(any::<u8>(), 0..32);
    prop_oneof![
        3 => small_bytes().prop_map(|bytes| GrowableOperation::Append { bytes }),
        1 => (0usize..128).prop_map(|length| GrowableOperation::SetLength { length }),
        2 => (any::<u8>(), any::<u8>(), small_bytes())
            .prop_map(|(start, span, bytes)| GrowableOperation::Replace { start, span, bytes }),
        1 => (any::<u8>(), any::<u8>())
            .prop_map(|(start, span)| GrowableOperation::Reset { start, span }),
    ]
}

/// Strategy for generating a sequence of edits.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<GrowableOperation>> {
    prop::collection::vec(growable_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
