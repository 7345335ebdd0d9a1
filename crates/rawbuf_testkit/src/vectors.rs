//! Reference vectors for RawBuf.
//!
//! Base64 vectors come from RFC 4648 plus the wrapping rules; search vectors
//! pin the direction and anchoring semantics. Both serialize to JSON so other
//! implementations can check themselves against the same data.

use serde::{Deserialize, Serialize};

/// A Base64 encoding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base64Vector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Input data (hex-encoded).
    pub input_hex: String,
    /// Wrap width in symbols, if any.
    pub line_length: Option<usize>,
    /// End lines with a carriage return.
    pub carriage_return: bool,
    /// End lines with a line feed.
    pub line_feed: bool,
    /// Expected encoded text.
    pub expected: String,
}

/// A search vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Bytes searched.
    pub haystack: String,
    /// Bytes looked for.
    pub needle: String,
    /// Search from the end.
    pub backwards: bool,
    /// Only test the first candidate.
    pub anchored: bool,
    /// Expected match location, or `None` for no match.
    pub expected: Option<usize>,
}

fn plain(id: &str, input: &[u8], expected: &str) -> Base64Vector {
    Base64Vector {
        id: id.into(),
        input_hex: hex_encode(input),
        line_length: None,
        carriage_return: false,
        line_feed: false,
        expected: expected.into(),
    }
}

/// Base64 encoding vectors.
pub fn base64_vectors() -> Vec<Base64Vector> {
    let mut vectors = vec![
        plain("rfc4648_empty", b"", ""),
        plain("rfc4648_f", b"f", "Zg=="),
        plain("rfc4648_fo", b"fo", "Zm8="),
        plain("rfc4648_foo", b"foo", "Zm9v"),
        plain("rfc4648_foob", b"foob", "Zm9vYg=="),
        plain("rfc4648_fooba", b"fooba", "Zm9vYmE="),
        plain("rfc4648_foobar", b"foobar", "Zm9vYmFy"),
        plain("high_bits", &[0xff, 0xfe, 0xfd], "//79"),
    ];

    // 48 zero bytes fill one 64-symbol line exactly.
    let line = "A".repeat(64);
    vectors.push(Base64Vector {
        id: "wrap64_exact_crlf".into(),
        input_hex: hex_encode(&[0u8; 48]),
        line_length: Some(64),
        carriage_return: false,
        line_feed: false,
        expected: format!("{line}\r\n"),
    });
    vectors.push(Base64Vector {
        id: "wrap64_lf".into(),
        input_hex: hex_encode(&[0u8; 51]),
        line_length: Some(64),
        carriage_return: false,
        line_feed: true,
        expected: format!("{line}\nAAAA"),
    });
    vectors.push(Base64Vector {
        id: "wrap76_cr".into(),
        input_hex: hex_encode(&[0u8; 60]),
        line_length: Some(76),
        carriage_return: true,
        line_feed: false,
        expected: format!("{}\rAAAA", "A".repeat(76)),
    });
    vectors
}

/// Search vectors.
pub fn search_vectors() -> Vec<SearchVector> {
    let vector = |id: &str, haystack: &str, needle: &str, backwards, anchored, expected| {
        SearchVector {
            id: id.into(),
            haystack: haystack.into(),
            needle: needle.into(),
            backwards,
            anchored,
            expected,
        }
    };
    vec![
        vector("forward_first", "abcdcd", "cd", false, false, Some(2)),
        vector("backward_last", "abcdcd", "cd", true, false, Some(4)),
        vector("anchored_miss", "xycd", "cd", false, true, None),
        vector("anchored_hit", "cdxy", "cd", false, true, Some(0)),
        vector("anchored_backward_suffix", "xycd", "cd", true, true, Some(2)),
        vector("anchored_backward_miss", "cdxy", "cd", true, true, None),
        vector("empty_needle", "abc", "", false, false, None),
        vector("needle_too_long", "ab", "abc", false, false, None),
        vector("overlapping_backward", "aaaa", "aa", true, false, Some(2)),
    ]
}

/// Generate all vectors as JSON for cross-implementation use.
pub fn all_vectors_json() -> String {
    let vectors = AllTestVectors {
        base64: base64_vectors(),
        search: search_vectors(),
    };

    serde_json::to_string_pretty(&vectors).expect("Failed to serialize vectors")
}

#[derive(Debug, Serialize, Deserialize)]
struct AllTestVectors {
    base64: Vec<Base64Vector>,
    search: Vec<SearchVector>,
}

/// Encodes bytes as lowercase hex.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decodes lowercase or uppercase hex.
///
/// # Panics
///
/// Panics on malformed hex.
pub fn hex_decode(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("Invalid hex"))
        .collect()
}
