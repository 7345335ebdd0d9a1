//! Error types for storage operations.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred while operating on `path`.
    ///
    /// Open, stat, read, write, rename and permission failures all land here,
    /// as do reads or writes that stop short without an OS error.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The path involved in the failed operation.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the path involved in the failure.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } => path,
        }
    }

    /// Returns the raw OS error code, if the failure came from the OS.
    #[must_use]
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Self::Io { source, .. } => source.raw_os_error(),
        }
    }

    /// Returns the kind of the underlying I/O error.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Io { source, .. } => source.kind(),
        }
    }
}

/// Attaches a path to a bare `io::Result`.
pub(crate) trait IoContext<T> {
    fn at(self, path: &Path) -> StorageResult<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: &Path) -> StorageResult<T> {
        self.map_err(|source| StorageError::io(path, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_keeps_code_and_path() {
        let err = StorageError::io("/tmp/missing", io::Error::from_raw_os_error(2));
        assert_eq!(err.os_code(), Some(2));
        assert_eq!(err.path(), Path::new("/tmp/missing"));
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/tmp/missing"));
    }

    #[test]
    fn synthetic_error_has_no_code() {
        let err = StorageError::io(
            "short.bin",
            io::Error::new(io::ErrorKind::UnexpectedEof, "short read"),
        );
        assert_eq!(err.os_code(), None);
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
