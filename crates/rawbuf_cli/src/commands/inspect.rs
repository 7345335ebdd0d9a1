//! Inspect command implementation.

use super::CommandResult;
use rawbuf_core::{Buffer, ReadingOptions};
use serde::Serialize;
use std::path::Path;

/// File inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// File path.
    pub path: String,
    /// Number of bytes.
    pub len: usize,
    /// Capacity of the backing store.
    pub capacity: usize,
    /// How the bytes are held.
    pub backing_kind: String,
}

impl InspectResult {
    fn from_buffer(path: &Path, buffer: &Buffer) -> Self {
        Self {
            path: path.display().to_string(),
            len: buffer.len(),
            capacity: buffer.capacity(),
            backing_kind: buffer.backing_kind().to_string(),
        }
    }
}

/// Runs the inspect command.
pub fn run(path: &Path, mapped: bool, format: &str) -> CommandResult<()> {
    let options = ReadingOptions::new().always_mapped(mapped);
    let buffer = Buffer::read_from(path, options)?;
    let result = InspectResult::from_buffer(path, &buffer);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("RawBuf File Inspection");
    println!("======================");
    println!();
    println!("Path:     {}", result.path);
    println!("Length:   {}", format_size(result.len));
    println!("Capacity: {}", format_size(result.capacity));
    println!("Backing:  {}", result.backing_kind);
}

fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} bytes")
    } else if value < KIB * KIB {
        format!("{:.1} KB", value / KIB)
    } else if value < KIB * KIB * KIB {
        format!("{:.1} MB", value / (KIB * KIB))
    } else {
        format!("{:.1} GB", value / (KIB * KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reports_mapped_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, vec![7u8; 300]).unwrap();

        let buffer = Buffer::read_from(&path, ReadingOptions::new().always_mapped(true)).unwrap();
        let result = InspectResult::from_buffer(&path, &buffer);
        assert_eq!(result.len, 300);
        assert_eq!(result.backing_kind, "mapped");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["len"], 300);
        assert_eq!(json["backing_kind"], "mapped");
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
