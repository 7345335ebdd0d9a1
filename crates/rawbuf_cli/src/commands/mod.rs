//! CLI command implementations.

pub mod copy;
pub mod decode;
pub mod encode;
pub mod find;
pub mod inspect;

use rawbuf_core::{Buffer, ReadingOptions, WritingOptions};
use std::io::Write;
use std::path::Path;

/// Result type shared by the commands.
pub type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Reads `path`, mapping it when that is safe.
pub fn read_input(path: &Path) -> CommandResult<Buffer> {
    let options = ReadingOptions::new().mapped_if_safe(true);
    Ok(Buffer::read_from(path, options)?)
}

/// Writes `bytes` atomically to `output`, or to stdout when there is none.
pub fn emit(bytes: &Buffer, output: Option<&Path>) -> CommandResult<()> {
    match output {
        Some(path) => bytes.write_to(path, WritingOptions::new().atomic(true))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
