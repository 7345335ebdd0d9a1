//! Benchmark utilities.

use rand::Rng;

/// Payload sizes used across the benchmark groups.
pub const SIZES: [usize; 4] = [64, 1024, 16 * 1024, 1024 * 1024];

/// Generate random data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate data over a small alphabet, so a search keeps finding partial
/// matches before the real one.
pub fn repetitive_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen_range(b'a'..=b'c')).collect()
}

/// Generate a haystack of `size` bytes whose only full needle match is at the
/// end.
pub fn haystack_with_trailing_needle(size: usize, needle: &[u8]) -> Vec<u8> {
    let mut haystack = repetitive_data(size.saturating_sub(needle.len()));
    haystack.extend_from_slice(needle);
    haystack
}
