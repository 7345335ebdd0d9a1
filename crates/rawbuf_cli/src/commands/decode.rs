//! Decode command implementation.

use super::{emit, read_input, CommandResult};
use rawbuf_codec::try_decode;
use rawbuf_core::{Base64DecodingOptions, Buffer};
use std::path::Path;

/// Runs the decode command.
pub fn run(input: &Path, output: Option<&Path>, ignore_unknown: bool) -> CommandResult<()> {
    let text = read_input(input)?;
    let options = Base64DecodingOptions::new().ignore_unknown_characters(ignore_unknown);
    let decoded = try_decode(&text, &options)
        .map_err(|e| format!("Cannot decode {}: {e}", input.display()))?;
    emit(&Buffer::from_vec(decoded), output)
}
