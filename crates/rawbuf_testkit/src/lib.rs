//! # RawBuf Testkit
//!
//! Test utilities for RawBuf.
//!
//! This crate provides:
//! - Temporary directory fixtures and release-tracking buffers
//! - Property-based test generators using proptest
//! - Fuzz targets for the codec, search, and growable buffer
//! - Concurrent sharing stress tests
//! - Reference vectors for Base64 and search
//!
//! ## Usage
//!
//! ```rust
//! use rawbuf_testkit::prelude::*;
//!
//! with_temp_workspace(|workspace| {
//!     let path = workspace.write("input.bin", b"bytes");
//!     assert_eq!(workspace.read("input.bin"), b"bytes");
//!     assert!(path.exists());
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod fuzz;
pub mod generators;
pub mod stress;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::fuzz::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use fuzz::*;
pub use generators::*;
pub use stress::*;
pub use vectors::*;
