//! Fuzz testing harnesses for RawBuf.
//!
//! This module provides fuzz targets that can be used with cargo-fuzz
//! or other fuzzing frameworks. Each target panics only on a real defect.

use crate::generators::GrowableOperation;
use rawbuf_codec::{decode, encode_to_vec, try_decode};
use rawbuf_core::{
    find, Base64DecodingOptions, Base64EncodingOptions, GrowableBuffer, LineLength, SearchOptions,
};

/// Fuzz target for Base64 decoding.
///
/// Tests that arbitrary input either decodes or returns an error, and that
/// anything that decodes survives a re-encode.
pub fn fuzz_base64_decode(data: &[u8]) {
    for ignore in [false, true] {
        let options = Base64DecodingOptions::new().ignore_unknown_characters(ignore);
        let plain = decode(data, &options);
        let detailed = try_decode(data, &options);
        assert_eq!(plain.is_some(), detailed.is_ok(), "Decode APIs disagree");

        if let Some(bytes) = plain {
            let encoded = encode_to_vec(&bytes, &Base64EncodingOptions::new());
            let again = decode(&encoded, &Base64DecodingOptions::new());
            assert_eq!(again.as_deref(), Some(bytes.as_slice()), "Re-encode mismatch");
        }
    }
}

/// Fuzz target for Base64 roundtrip.
///
/// The first byte selects the encoding options; the rest is the payload.
pub fn fuzz_base64_roundtrip(data: &[u8]) {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let mut options = Base64EncodingOptions::new()
        .carriage_return(selector & 0b100 != 0)
        .line_feed(selector & 0b1000 != 0);
    match selector & 0b11 {
        1 => options = options.line_length(LineLength::Columns64),
        2 => options = options.line_length(LineLength::Columns76),
        _ => {}
    }

    let encoded = encode_to_vec(payload, &options);
    let lenient = Base64DecodingOptions::new().ignore_unknown_characters(true);
    assert_eq!(
        decode(&encoded, &lenient).as_deref(),
        Some(payload),
        "Roundtrip mismatch"
    );
}

/// Fuzz target for subsequence search.
///
/// The first byte gives the needle length and the options; the needle comes
/// next and the rest is the haystack. Results are checked against a naive
/// window scan.
pub fn fuzz_search(data: &[u8]) {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let needle_len = usize::from(selector & 0x0f).min(rest.len());
    let (needle, haystack) = rest.split_at(needle_len);
    let options = SearchOptions::new()
        .backwards(selector & 0x10 != 0)
        .anchored(selector & 0x20 != 0);

    let found = find(haystack, needle, options);
    if needle.is_empty() || needle.len() > haystack.len() {
        assert_eq!(found, None);
        return;
    }

    let mut windows = haystack.windows(needle.len());
    let expected = match (options.backwards, options.anchored) {
        (false, false) => windows.position(|w| w == needle),
        (true, false) => windows.rposition(|w| w == needle),
        (false, true) => haystack.starts_with(needle).then_some(0),
        (true, true) => haystack
            .ends_with(needle)
            .then(|| haystack.len() - needle.len()),
    };
    assert_eq!(found.map(|r| r.location), expected, "Search mismatch");
}

/// Parses growable buffer edits from fuzzer input.
pub fn parse_operations(data: &[u8]) -> Vec<GrowableOperation> {
    let mut ops = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let op_type = data[offset];
        offset += 1;

        let op = match op_type % 4 {
            0 => {
                let len = usize::from(data.get(offset).copied().unwrap_or(0) % 16);
                offset += 1;
                let end = (offset + len).min(data.len());
                let bytes = data.get(offset..end).unwrap_or_default().to_vec();
                offset = end;
                GrowableOperation::Append { bytes }
            }
            1 => {
                let length = usize::from(data.get(offset).copied().unwrap_or(0) % 64);
                offset += 1;
                GrowableOperation::SetLength { length }
            }
            2 => {
                if offset + 3 > data.len() {
                    break;
                }
                let start = data[offset];
                let span = data[offset + 1];
                let len = usize::from(data[offset + 2] % 8);
                offset += 3;
                let end = (offset + len).min(data.len());
                let bytes = data[offset..end].to_vec();
                offset = end;
                GrowableOperation::Replace { start, span, bytes }
            }
            _ => {
                if offset + 2 > data.len() {
                    break;
                }
                let start = data[offset];
                let span = data[offset + 1];
                offset += 2;
                GrowableOperation::Reset { start, span }
            }
        };
        ops.push(op);
    }

    ops
}

/// Fuzz target for growable buffer edits.
///
/// Applies the parsed edits to a buffer and a `Vec` model and checks that
/// they agree after every step.
pub fn fuzz_growable_operations(data: &[u8]) {
    let mut buffer = GrowableBuffer::new();
    let mut model = Vec::new();

    for op in parse_operations(data) {
        op.apply(&mut buffer, &mut model);
        assert_eq!(buffer.as_bytes(), model.as_slice(), "Model mismatch after {op:?}");
    }

    let frozen = buffer.freeze();
    assert_eq!(frozen.as_bytes(), model.as_slice());
}
