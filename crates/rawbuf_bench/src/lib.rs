//! Shared helpers for the RawBuf benchmarks.

#![warn(missing_docs)]

pub mod utils;
