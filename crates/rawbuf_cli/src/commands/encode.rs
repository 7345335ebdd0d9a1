//! Encode command implementation.

use super::{emit, read_input, CommandResult};
use rawbuf_core::{Base64EncodingOptions, LineLength};
use std::path::Path;
use tracing::debug;

/// Runs the encode command.
pub fn run(
    input: &Path,
    output: Option<&Path>,
    wrap: Option<usize>,
    carriage_return: bool,
    line_feed: bool,
) -> CommandResult<()> {
    let options = encoding_options(wrap, carriage_return, line_feed)?;
    let buffer = read_input(input)?;
    debug!(len = buffer.len(), kind = %buffer.backing_kind(), "encoding");

    let mut encoded = buffer.base64_encoded_buffer(&options).into_growable();
    if output.is_none() {
        encoded.append(b"\n");
    }
    emit(&encoded.freeze(), output)
}

fn encoding_options(
    wrap: Option<usize>,
    carriage_return: bool,
    line_feed: bool,
) -> CommandResult<Base64EncodingOptions> {
    let mut options = Base64EncodingOptions::new()
        .carriage_return(carriage_return)
        .line_feed(line_feed);
    if let Some(symbols) = wrap {
        let length = LineLength::from_symbols(symbols)
            .ok_or_else(|| format!("Unsupported line length {symbols}; use 64 or 76"))?;
        options = options.line_length(length);
    }
    Ok(options)
}
