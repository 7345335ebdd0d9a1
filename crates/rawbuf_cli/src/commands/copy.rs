//! Copy command implementation.

use super::CommandResult;
use rawbuf_core::{Buffer, ReadingOptions, WritingOptions};
use std::path::Path;
use tracing::info;

/// Runs the copy command.
pub fn run(
    source: &Path,
    destination: &Path,
    atomic: bool,
    no_overwrite: bool,
    mapped: bool,
) -> CommandResult<()> {
    let reading = ReadingOptions::new().always_mapped(mapped);
    let writing = WritingOptions::new()
        .atomic(atomic)
        .without_overwriting(no_overwrite);

    let buffer = Buffer::read_from(source, reading)?;
    buffer.write_to(destination, writing)?;

    info!(
        bytes = buffer.len(),
        kind = %buffer.backing_kind(),
        atomic,
        "copied {} to {}",
        source.display(),
        destination.display()
    );
    Ok(())
}
