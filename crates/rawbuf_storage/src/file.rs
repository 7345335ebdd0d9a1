//! File persistence.
//!
//! [`read_file`] loads a whole file into a [`BackingStore`], either through a
//! private read-only memory map or a buffered read. [`write_file`] writes a
//! byte slice to disk, in place or atomically.
//!
//! # Durability
//!
//! - Every write is followed by `File::sync_all()` before the file is closed
//! - Atomic writes go to a temporary file in the target's directory, which is
//!   renamed over the target and then the directory is synced
//! - In-place writes can leave a truncated file behind if the process dies
//!   mid-write; set [`WritingOptions::atomic`] when that matters

use crate::error::{IoContext, StorageError, StorageResult};
use crate::options::{ReadingOptions, WritingOptions};
use crate::store::BackingStore;
use memmap2::{Mmap, MmapOptions};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, trace, warn};

/// Reads the whole file at `path` into a backing store.
///
/// With [`ReadingOptions::always_mapped`] (or [`ReadingOptions::mapped_if_safe`]
/// on a regular file) the file is mapped privately and read-only; if mapping
/// fails the file is read into memory instead. Empty files are never mapped.
///
/// # Errors
///
/// Returns [`StorageError::Io`] if the file cannot be opened, inspected or
/// read, or if it yields fewer bytes than its reported size.
///
/// # Example
///
/// ```no_run
/// use rawbuf_storage::{read_file, ReadingOptions};
///
/// let store = read_file("data.bin", ReadingOptions::new().always_mapped(true)).unwrap();
/// println!("{} bytes", store.len());
/// ```
pub fn read_file(path: impl AsRef<Path>, options: ReadingOptions) -> StorageResult<BackingStore> {
    let path = path.as_ref();
    let file = File::open(path).at(path)?;
    let metadata = file.metadata().at(path)?;
    let size = usize::try_from(metadata.len()).map_err(|_| {
        StorageError::io(
            path,
            io::Error::new(io::ErrorKind::Other, "file too large to address"),
        )
    })?;

    if size == 0 {
        debug!(path = %path.display(), "empty file, nothing to map");
        return Ok(BackingStore::empty());
    }

    if options.always_mapped || (options.wants_map() && metadata.is_file()) {
        match map_file(&file, size) {
            Ok(map) => {
                debug!(path = %path.display(), size, "mapped file");
                return Ok(BackingStore::from_mmap(map));
            }
            Err(err) => {
                debug!(
                    path = %path.display(),
                    error = %err,
                    "memory map failed, falling back to buffered read"
                );
            }
        }
    }

    let bytes = read_to_len(&file, size).at(path)?;
    if options.uncached {
        drop_page_cache(&file, path);
    }
    debug!(path = %path.display(), size, "read file");
    Ok(BackingStore::from_vec(bytes))
}

/// Writes `bytes` to the file at `path`.
///
/// Without [`WritingOptions::atomic`] the file is created or truncated and
/// written in place. With it, the bytes go to a temporary file in the same
/// directory which then replaces the target in a single rename; an existing
/// target keeps its permission bits. If anything fails before the rename
/// completes, the temporary file is removed and the target is untouched.
///
/// # Errors
///
/// Returns [`StorageError::Io`] if any step fails. With
/// [`WritingOptions::without_overwriting`] an existing target fails with
/// [`io::ErrorKind::AlreadyExists`].
///
/// # Example
///
/// ```no_run
/// use rawbuf_storage::{write_file, WritingOptions};
///
/// write_file("data.bin", b"payload", WritingOptions::new().atomic(true)).unwrap();
/// ```
pub fn write_file(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: WritingOptions,
) -> StorageResult<()> {
    let path = path.as_ref();
    if options.atomic {
        write_atomic(path, bytes, options.without_overwriting)
    } else {
        write_in_place(path, bytes, options.without_overwriting)
    }
}

fn write_in_place(path: &Path, bytes: &[u8], without_overwriting: bool) -> StorageResult<()> {
    let mut open = OpenOptions::new();
    open.write(true);
    if without_overwriting {
        open.create_new(true);
    } else {
        open.create(true).truncate(true);
    }

    let file = open.open(path).at(path)?;
    write_all_retrying(&file, bytes).at(path)?;
    file.sync_all().at(path)?;

    trace!(path = %path.display(), len = bytes.len(), "wrote file in place");
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8], without_overwriting: bool) -> StorageResult<()> {
    let existing = fs::metadata(path).ok().map(|metadata| metadata.permissions());
    if without_overwriting && existing.is_some() {
        return Err(StorageError::io(
            path,
            io::Error::new(io::ErrorKind::AlreadyExists, "target already exists"),
        ));
    }

    let dir = parent_dir(path);
    let name = path.file_name().ok_or_else(|| {
        StorageError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let mut prefix = OsString::from(".");
    prefix.push(name);
    prefix.push(".");

    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".tmp");
    #[cfg(unix)]
    if existing.is_none() {
        use std::os::unix::fs::PermissionsExt;
        // Same mode a plain create would get; the umask still applies.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let temp = builder.tempfile_in(dir).at(dir)?;

    install(temp, path, bytes, existing, without_overwriting)?;

    // The target is already replaced; a failed directory sync only weakens
    // durability.
    if let Err(err) = sync_directory(dir) {
        warn!(
            path = %dir.display(),
            error = %err,
            "failed to sync directory after rename"
        );
    }

    trace!(path = %path.display(), len = bytes.len(), "wrote file atomically");
    Ok(())
}

/// Fills `temp` and renames it over `path`. On failure `temp` is removed and
/// `path` is untouched.
fn install(
    temp: NamedTempFile,
    path: &Path,
    bytes: &[u8],
    existing: Option<fs::Permissions>,
    without_overwriting: bool,
) -> StorageResult<()> {
    if let Err(source) = prepare_temp(temp.as_file(), bytes, existing) {
        discard(temp);
        return Err(StorageError::io(path, source));
    }

    let persisted = if without_overwriting {
        temp.persist_noclobber(path)
    } else {
        temp.persist(path)
    };
    if let Err(err) = persisted {
        discard(err.file);
        return Err(StorageError::io(path, err.error));
    }
    Ok(())
}

/// Fills the temporary file and gives it the target's permission bits, so
/// the file the rename installs is complete.
fn prepare_temp(
    file: &File,
    bytes: &[u8],
    permissions: Option<fs::Permissions>,
) -> io::Result<()> {
    write_all_retrying(file, bytes)?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions)?;
    }
    file.sync_all()
}

/// Removes a temporary file; failure is logged and otherwise ignored.
fn discard(temp: NamedTempFile) {
    let temp_path = temp.path().to_path_buf();
    if let Err(err) = temp.close() {
        warn!(
            path = %temp_path.display(),
            error = %err,
            "failed to remove temporary file"
        );
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Writes all of `bytes`, re-issuing the write when a signal interrupts it.
fn write_all_retrying(mut file: &File, mut bytes: &[u8]) -> io::Result<()> {
    while !bytes.is_empty() {
        match file.write(bytes) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    format!("write stopped with {} bytes left", bytes.len()),
                ));
            }
            Ok(n) => bytes = &bytes[n..],
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// Reads exactly `len` bytes; end of file before that is an error.
fn read_to_len(mut file: &File, len: usize) -> io::Result<Vec<u8>> {
    let mut bytes = vec![0u8; len];
    let mut filled = 0;
    while filled < len {
        match file.read(&mut bytes[filled..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("read {filled} of {len} bytes"),
                ));
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(bytes)
}

fn map_file(file: &File, len: usize) -> io::Result<Mmap> {
    // SAFETY: the mapping is private and read-only. As with every mmap-based
    // reader, another process truncating the file while it is mapped is
    // outside our control.
    unsafe { MmapOptions::new().len(len).map_copy_read_only(file) }
}

#[cfg(target_os = "linux")]
fn drop_page_cache(file: &File, path: &Path) {
    use std::os::unix::io::AsRawFd;

    // SAFETY: the descriptor is owned by `file` and open for the whole call.
    let rc = unsafe { libc::posix_fadvise(file.as_raw_fd(), 0, 0, libc::POSIX_FADV_DONTNEED) };
    if rc != 0 {
        debug!(path = %path.display(), rc, "posix_fadvise failed");
    }
}

#[cfg(not(target_os = "linux"))]
fn drop_page_cache(_file: &File, _path: &Path) {}

/// Syncs a directory so a rename inside it is durable.
#[cfg(unix)]
fn sync_directory(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_directory(_dir: &Path) -> io::Result<()> {
    // NTFS journals metadata; there is no directory handle to sync.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BackingKind;
    use tempfile::tempdir;

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn read_missing_file_fails_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.bin");

        let err = read_file(&path, ReadingOptions::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(err.path(), path);
        assert!(err.os_code().is_some());
    }

    #[test]
    fn write_then_read_buffered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");

        write_file(&path, b"hello world", WritingOptions::new()).unwrap();
        let store = read_file(&path, ReadingOptions::new()).unwrap();

        assert_eq!(store.as_slice(), b"hello world");
        assert_eq!(store.kind(), BackingKind::OwnedCopy);
    }

    #[test]
    fn always_mapped_maps_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mapped.bin");
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &data).unwrap();

        let store = read_file(&path, ReadingOptions::new().always_mapped(true)).unwrap();
        assert_eq!(store.kind(), BackingKind::MemoryMapped);
        assert_eq!(store.as_slice(), data.as_slice());
        assert_eq!(store.capacity(), data.len());
    }

    #[test]
    fn mapped_if_safe_maps_regular_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regular.bin");
        fs::write(&path, b"regular").unwrap();

        let store = read_file(&path, ReadingOptions::new().mapped_if_safe(true)).unwrap();
        assert_eq!(store.kind(), BackingKind::MemoryMapped);
        assert_eq!(store.as_slice(), b"regular");
    }

    #[test]
    fn empty_file_with_always_mapped_is_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        File::create(&path).unwrap();

        let store = read_file(&path, ReadingOptions::new().always_mapped(true)).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.as_slice(), b"");
    }

    #[test]
    fn uncached_read_returns_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("uncached.bin");
        fs::write(&path, b"cold data").unwrap();

        let store = read_file(&path, ReadingOptions::new().uncached(true)).unwrap();
        assert_eq!(store.as_slice(), b"cold data");
    }

    #[test]
    fn in_place_write_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"a much longer original payload").unwrap();

        write_file(&path, b"short", WritingOptions::new()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"short");
    }

    #[test]
    fn in_place_without_overwriting_refuses_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"original").unwrap();

        let err = write_file(&path, b"new", WritingOptions::new().without_overwriting(true))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&path).unwrap(), b"original");
    }

    #[test]
    fn in_place_without_overwriting_creates_new() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fresh.bin");

        write_file(&path, b"fresh", WritingOptions::new().without_overwriting(true)).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"fresh");
    }

    #[test]
    fn atomic_write_replaces_and_cleans_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"old contents").unwrap();

        write_file(&path, b"new contents", WritingOptions::new().atomic(true)).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new contents");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn atomic_write_creates_missing_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("created.bin");

        write_file(&path, b"created", WritingOptions::new().atomic(true)).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"created");
    }

    #[test]
    fn atomic_write_of_empty_payload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        fs::write(&path, b"something").unwrap();

        write_file(&path, b"", WritingOptions::new().atomic(true)).unwrap();
        assert!(fs::read(&path).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("perm.bin");
        fs::write(&path, b"old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_file(&path, b"new", WritingOptions::new().atomic(true)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_installs_file_with_target_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("mode.bin");
        fs::write(&path, b"old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o604)).unwrap();

        let temp = tempfile::Builder::new().tempfile_in(dir.path()).unwrap();
        let mode = |file: &File| file.metadata().unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(temp.as_file()), 0o600);

        let existing = fs::metadata(&path).unwrap().permissions();
        prepare_temp(temp.as_file(), b"new", Some(existing)).unwrap();
        assert_eq!(mode(temp.as_file()), 0o604);

        // What the rename installs is already complete.
        temp.persist(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert_eq!(mode(&File::open(&path).unwrap()), 0o604);
    }

    #[cfg(unix)]
    #[test]
    fn failed_directory_sync_still_reports_success() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let path = sub.join("data.bin");
        fs::write(&path, b"old").unwrap();
        // Write and search only; opening the directory for a sync fails for
        // unprivileged users.
        fs::set_permissions(&sub, fs::Permissions::from_mode(0o300)).unwrap();

        let result = write_file(&path, b"new", WritingOptions::new().atomic(true));

        fs::set_permissions(&sub, fs::Permissions::from_mode(0o700)).unwrap();
        result.unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert!(leftovers(&sub).is_empty());
    }

    #[test]
    fn failed_temp_write_reports_target_and_removes_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"old").unwrap();

        // A temp file whose handle is read-only fails in the write phase.
        let writable = tempfile::Builder::new()
            .suffix(".tmp")
            .tempfile_in(dir.path())
            .unwrap();
        let (_, temp_path) = writable.into_parts();
        let read_only = File::open(&temp_path).unwrap();
        let temp = NamedTempFile::from_parts(read_only, temp_path);

        let err = install(temp, &path, b"payload", None, false).unwrap_err();
        assert_eq!(err.path(), path);
        assert_eq!(fs::read(&path).unwrap(), b"old");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn atomic_without_overwriting_leaves_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"keep me").unwrap();

        let err = write_file(&path, b"replacement", WritingOptions::new().atomic(true).without_overwriting(true))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&path).unwrap(), b"keep me");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn failed_rename_leaves_target_untouched() {
        let dir = tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file rename.
        let target = dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("inner.bin"), b"inner").unwrap();

        let err = write_file(&target, b"payload", WritingOptions::new().atomic(true)).unwrap_err();
        assert_eq!(err.path(), target);

        assert!(target.is_dir());
        assert_eq!(fs::read(target.join("inner.bin")).unwrap(), b"inner");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn atomic_write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("data.bin");

        let err = write_file(&path, b"payload", WritingOptions::new().atomic(true)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!path.exists());
    }

    #[test]
    fn parent_dir_of_bare_name_is_current_dir() {
        assert_eq!(parent_dir(Path::new("file.bin")), Path::new("."));
        assert_eq!(parent_dir(Path::new("a/file.bin")), Path::new("a"));
    }

    #[test]
    fn read_to_len_rejects_short_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.bin");
        fs::write(&path, b"abc").unwrap();

        let file = File::open(&path).unwrap();
        let err = read_to_len(&file, 10).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(24))]

            #[test]
            fn write_then_read_returns_bytes(
                bytes in prop::collection::vec(any::<u8>(), 0..4096),
                atomic in any::<bool>(),
                mapped in any::<bool>(),
            ) {
                let dir = tempdir().unwrap();
                let path = dir.path().join("prop.bin");

                write_file(&path, &bytes, WritingOptions::new().atomic(atomic)).unwrap();
                let store = read_file(&path, ReadingOptions::new().always_mapped(mapped)).unwrap();
                prop_assert_eq!(store.as_slice(), bytes.as_slice());
                prop_assert!(leftovers(dir.path()).is_empty());
            }
        }
    }
}
