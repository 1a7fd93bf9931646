//! Binary entry point for the unpacker.
//!
//! `huntar` reads a human-tar stream (file or stdin) and reconstructs
//! the original files under an output directory, refusing to overwrite
//! anything that already exists.
//!
//! ## Usage
//!
//! ```bash
//! # Unpack a saved stream into a fresh directory
//! huntar tree.htar -o restored/
//!
//! # Or straight from a pipe
//! htar | huntar -o restored/
//! ```

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use humantar::logging::{init_tracing, LogLevel};
use humantar_core::unpack::{find_conflict, scan, write_files, Scan, UnpackError};

/// Unpack grep-style `path:content` output into the original file tree.
#[derive(Parser, Debug)]
#[command(
    name = "huntar",
    version,
    about = "Unpack human-tar output into the original file structure"
)]
struct Cli {
    /// Input file containing the packed stream (`-` or absent: stdin).
    #[arg(default_value = "-")]
    input_file: String,

    /// Output directory for unpacked files (default: current directory).
    #[arg(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,

    /// Log level for tracing output.
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let failed = err.use_stderr();
            let _ = err.print();
            return if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    // Phase 1: read everything into memory; nothing is written yet.
    let scanned = read_input(&cli)?;

    for line in &scanned.malformed {
        eprintln!("Warning: Skipping malformed line: {}", line.trim());
    }

    // Phase 2: all-or-nothing guard against pre-existing targets.
    if let Some(conflict) = find_conflict(&scanned) {
        let err = UnpackError::Conflict {
            path: conflict.clone(),
        };
        return Err(err.to_string());
    }

    // Phase 3: replay the stream into the output directory.
    write_files(&scanned, &cli.output_dir).map_err(|e| e.to_string())?;
    Ok(())
}

fn read_input(cli: &Cli) -> Result<Scan, String> {
    let scanned = if cli.input_file == "-" {
        let stdin = io::stdin();
        scan(stdin.lock(), &cli.output_dir)
    } else {
        let file = File::open(&cli.input_file)
            .map_err(|e| format!("cannot open {}: {e}", cli.input_file))?;
        scan(BufReader::new(file), &cli.output_dir)
    };
    scanned.map_err(|e| e.to_string())
}
