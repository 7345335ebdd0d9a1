//! Test fixtures.
//!
//! Temporary directories for file tests, and buffers that record when their
//! bytes are released.

use rawbuf_core::Buffer;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// A temporary directory that is removed on drop.
pub struct TempWorkspace {
    dir: TempDir,
}

impl TempWorkspace {
    /// Creates a new empty workspace.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Returns the workspace root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the path of `name` inside the workspace.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes `bytes` to `name` with plain `std::fs` and returns its path.
    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, bytes).expect("Failed to write fixture file");
        path
    }

    /// Reads `name` with plain `std::fs`.
    pub fn read(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.path(name)).expect("Failed to read fixture file")
    }

    /// Lists file names in the workspace, sorted.
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.root())
            .expect("Failed to list temp directory")
            .map(|entry| {
                entry
                    .expect("Failed to read directory entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a test with a temporary workspace.
///
/// # Example
///
/// ```rust
/// use rawbuf_testkit::with_temp_workspace;
///
/// with_temp_workspace(|workspace| {
///     workspace.write("a.bin", b"a");
///     assert_eq!(workspace.entries(), vec!["a.bin".to_string()]);
/// });
/// ```
pub fn with_temp_workspace<F, R>(f: F) -> R
where
    F: FnOnce(&TempWorkspace) -> R,
{
    let workspace = TempWorkspace::new();
    f(&workspace)
}

/// Counts how many times tracked bytes have been released.
#[derive(Debug, Clone, Default)]
pub struct ReleaseProbe {
    count: Arc<AtomicUsize>,
}

impl ReleaseProbe {
    /// Creates a probe with a zero count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of releases so far.
    pub fn releases(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Returns true once the bytes have been released.
    pub fn released(&self) -> bool {
        self.releases() > 0
    }
}

struct TrackedBytes {
    bytes: Vec<u8>,
    probe: ReleaseProbe,
}

impl AsRef<[u8]> for TrackedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for TrackedBytes {
    fn drop(&mut self) {
        self.probe.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Creates a borrowed buffer over `bytes` and a probe that records its
/// release.
pub fn tracked_buffer(bytes: &[u8]) -> (Buffer, ReleaseProbe) {
    let probe = ReleaseProbe::new();
    let owner = TrackedBytes {
        bytes: bytes.to_vec(),
        probe: probe.clone(),
    };
    (Buffer::from_owner(owner), probe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawbuf_core::BackingKind;

    #[test]
    fn test_workspace_roundtrip() {
        with_temp_workspace(|workspace| {
            workspace.write("b.bin", b"b");
            workspace.write("a.bin", b"a");
            assert_eq!(workspace.read("a.bin"), b"a");
            assert_eq!(workspace.entries(), vec!["a.bin", "b.bin"]);
        });
    }

    #[test]
    fn test_workspace_removed_on_drop() {
        let workspace = TempWorkspace::new();
        let root = workspace.root().to_path_buf();
        drop(workspace);
        assert!(!root.exists());
    }

    #[test]
    fn test_tracked_buffer_release() {
        let (buffer, probe) = tracked_buffer(b"tracked");
        assert_eq!(buffer.backing_kind(), BackingKind::BorrowedWithRelease);
        assert!(!probe.released());

        drop(buffer);
        assert_eq!(probe.releases(), 1);
    }
}
