//! Options for reading and writing files.

/// Options for [`crate::read_file`].
///
/// All options are off by default, which reads the whole file into an owned
/// buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReadingOptions {
    /// Map the file when it is a regular file; read it otherwise.
    pub mapped_if_safe: bool,

    /// Hint that the file contents should not stay in the page cache.
    ///
    /// Only honored on Linux, and only for buffered reads.
    pub uncached: bool,

    /// Always try to map the file, falling back to a buffered read if the
    /// map fails.
    pub always_mapped: bool,
}

impl ReadingOptions {
    /// Creates options with every flag off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mapped_if_safe: false,
            uncached: false,
            always_mapped: false,
        }
    }

    /// Sets whether to map regular files.
    #[must_use]
    pub const fn mapped_if_safe(mut self, value: bool) -> Self {
        self.mapped_if_safe = value;
        self
    }

    /// Sets whether to drop the file from the page cache after reading.
    #[must_use]
    pub const fn uncached(mut self, value: bool) -> Self {
        self.uncached = value;
        self
    }

    /// Sets whether to always attempt a memory map.
    #[must_use]
    pub const fn always_mapped(mut self, value: bool) -> Self {
        self.always_mapped = value;
        self
    }

    /// Returns true if any mapping flag is set. Only
    /// [`ReadingOptions::always_mapped`] maps files that are not regular.
    #[must_use]
    pub const fn wants_map(&self) -> bool {
        self.mapped_if_safe || self.always_mapped
    }
}

/// Options for [`crate::write_file`].
///
/// The default writes in place, overwriting any existing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WritingOptions {
    /// Write to a temporary file and rename it over the target.
    pub atomic: bool,

    /// Fail with `AlreadyExists` if the target exists.
    pub without_overwriting: bool,
}

impl WritingOptions {
    /// Creates options with every flag off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            atomic: false,
            without_overwriting: false,
        }
    }

    /// Sets whether to write atomically.
    #[must_use]
    pub const fn atomic(mut self, value: bool) -> Self {
        self.atomic = value;
        self
    }

    /// Sets whether to refuse to replace an existing file.
    #[must_use]
    pub const fn without_overwriting(mut self, value: bool) -> Self {
        self.without_overwriting = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_off() {
        let read = ReadingOptions::default();
        assert_eq!(read, ReadingOptions::new());
        assert!(!read.wants_map());

        let write = WritingOptions::default();
        assert!(!write.atomic);
        assert!(!write.without_overwriting);
    }

    #[test]
    fn builder_pattern() {
        let read = ReadingOptions::new().always_mapped(true).uncached(true);
        assert!(read.always_mapped);
        assert!(read.uncached);
        assert!(read.wants_map());

        let write = WritingOptions::new().atomic(true).without_overwriting(true);
        assert!(write.atomic);
        assert!(write.without_overwriting);
    }
}
