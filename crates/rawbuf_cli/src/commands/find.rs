//! Find command implementation.

use super::{read_input, CommandResult};
use rawbuf_core::SearchOptions;
use std::path::Path;

/// Runs the find command.
pub fn run(
    input: &Path,
    needle: &str,
    hex: bool,
    backwards: bool,
    anchored: bool,
) -> CommandResult<()> {
    let needle = if hex {
        parse_hex(needle)?
    } else {
        needle.as_bytes().to_vec()
    };
    if needle.is_empty() {
        return Err("Needle must not be empty".into());
    }

    let buffer = read_input(input)?;
    let options = SearchOptions::new()
        .backwards(backwards)
        .anchored(anchored);

    match buffer.find(&needle, options) {
        Some(range) => println!("{} {}", range.location, range.length),
        None => println!("not found"),
    }
    Ok(())
}

/// Parses a hex string such as `"de ad be ef"` or `"0xdeadbeef"`.
fn parse_hex(text: &str) -> CommandResult<Vec<u8>> {
    let digits: Vec<u8> = text
        .trim_start_matches("0x")
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(format!("Odd number of hex digits in {text:?}").into());
    }

    digits
        .chunks(2)
        .map(|pair| -> CommandResult<u8> {
            let high = hex_value(pair[0]);
            let low = hex_value(pair[1]);
            match (high, low) {
                (Some(high), Some(low)) => Ok((high << 4) | low),
                _ => Err(format!("Invalid hex digits in {text:?}").into()),
            }
        })
        .collect()
}

fn hex_value(digit: u8) -> Option<u8> {
    char::from(digit)
        .to_digit(16)
        .and_then(|value| u8::try_from(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse_hex("deadBEEF").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(parse_hex("0x00 ff").unwrap(), vec![0x00, 0xff]);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
    }
}
