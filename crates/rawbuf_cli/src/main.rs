//! RawBuf CLI
//!
//! Command-line tools for working with raw byte files.
//!
//! # Commands
//!
//! - `encode` - Base64-encode a file
//! - `decode` - Decode a Base64 file
//! - `find` - Search a file for a byte sequence
//! - `copy` - Copy a file, optionally through an atomic write
//! - `inspect` - Show how a file would be held in memory

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// RawBuf command-line byte tools.
#[derive(Parser)]
#[command(name = "rawbuf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Base64-encode a file
    Encode {
        /// File to encode
        input: PathBuf,

        /// Write the encoded text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Wrap lines at this many symbols (64 or 76)
        #[arg(short, long)]
        wrap: Option<usize>,

        /// End wrapped lines with a carriage return
        #[arg(long)]
        cr: bool,

        /// End wrapped lines with a line feed
        #[arg(long)]
        lf: bool,
    },

    /// Decode a Base64 file
    Decode {
        /// File to decode
        input: PathBuf,

        /// Write the decoded bytes here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip characters outside the Base64 alphabet
        #[arg(short, long)]
        ignore_unknown: bool,
    },

    /// Search a file for a byte sequence
    Find {
        /// File to search
        input: PathBuf,

        /// Sequence to look for
        needle: String,

        /// Interpret the needle as hexadecimal
        #[arg(short = 'x', long)]
        hex: bool,

        /// Search from the end of the file
        #[arg(short, long)]
        backwards: bool,

        /// Only match at the start (or the end, with --backwards)
        #[arg(short, long)]
        anchored: bool,
    },

    /// Copy a file
    Copy {
        /// Source file
        source: PathBuf,

        /// Destination file
        destination: PathBuf,

        /// Write through a temporary file and rename
        #[arg(short, long)]
        atomic: bool,

        /// Fail if the destination exists
        #[arg(short, long)]
        no_overwrite: bool,

        /// Memory-map the source
        #[arg(short, long)]
        mapped: bool,
    },

    /// Show how a file is held in memory
    Inspect {
        /// File to inspect
        input: PathBuf,

        /// Memory-map the file
        #[arg(short, long)]
        mapped: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encode {
            input,
            output,
            wrap,
            cr,
            lf,
        } => {
            commands::encode::run(&input, output.as_deref(), wrap, cr, lf)?;
        }
        Commands::Decode {
            input,
            output,
            ignore_unknown,
        } => {
            commands::decode::run(&input, output.as_deref(), ignore_unknown)?;
        }
        Commands::Find {
            input,
            needle,
            hex,
            backwards,
            anchored,
        } => {
            commands::find::run(&input, &needle, hex, backwards, anchored)?;
        }
        Commands::Copy {
            source,
            destination,
            atomic,
            no_overwrite,
            mapped,
        } => {
            commands::copy::run(&source, &destination, atomic, no_overwrite, mapped)?;
        }
        Commands::Inspect {
            input,
            mapped,
            format,
        } => {
            commands::inspect::run(&input, mapped, &format)?;
        }
        Commands::Version => {
            println!("RawBuf CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("RawBuf Core v{}", rawbuf_core::VERSION);
        }
    }

    Ok(())
}
