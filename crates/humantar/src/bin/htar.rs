//! Binary entry point for the packer.
//!
//! `htar` prints every tracked, non-excluded file as `path:line` records
//! on stdout. Subcommands switch to a byte-size report or manage the
//! exclusion sidecar file.
//!
//! ## Usage
//!
//! ```bash
//! # Emit the packed stream for the current repo
//! htar > tree.htar
//!
//! # Per-file size report, ascending, with percentages
//! htar bytes
//!
//! # Stop packing generated files
//! htar exclude '*.lock'
//! ```

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use humantar::logging::{init_tracing, LogLevel};
use humantar_core::exclude::{self, AddOutcome, ExcludeList};
use humantar_core::list::{collect_files, FilteredFiles, GitLister};
use humantar_core::pack::pack_files;
use humantar_core::report::{render_report, size_report};

/// Pack git-tracked files into human-tar format.
#[derive(Parser, Debug)]
#[command(
    name = "htar",
    version,
    about = "Pack git-tracked files into human-tar format"
)]
struct Cli {
    /// Working directory to pack (default: current directory).
    #[arg(short = 'C', long = "directory", default_value = ".")]
    directory: PathBuf,

    /// Log level for tracing output.
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Option<Command>,
}

/// CLI subcommands. With no subcommand, `htar` emits the packed stream.
#[derive(Subcommand, Debug)]
enum Command {
    /// Report per-file sizes in bytes, ascending, with percentages.
    Bytes,
    /// Add a glob pattern to the exclusion sidecar file.
    Exclude {
        /// Pattern to exclude (exact path or shell-style glob).
        pattern: String,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage errors (unknown subcommand, missing pattern) exit 1;
            // --help and --version exit 0.
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
        Ok(code) => code,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    match cli.command {
        Some(Command::Exclude { pattern }) => run_exclude(&cli.directory, &pattern),
        Some(Command::Bytes) => run_bytes(&cli.directory),
        None => run_pack(&cli.directory),
    }
}

// ============================================================================
// Command Executors
// ============================================================================

/// Append a pattern to the sidecar; idempotent, status goes to stderr.
fn run_exclude(dir: &Path, pattern: &str) -> Result<ExitCode, String> {
    match exclude::add_pattern(dir, pattern).map_err(|e| e.to_string())? {
        AddOutcome::Added => eprintln!("Added: {pattern}"),
        AddOutcome::AlreadyPresent => eprintln!("Already excluded: {pattern}"),
    }
    Ok(ExitCode::SUCCESS)
}

/// Enumerate and filter tracked files, announcing each exclusion.
fn collect(dir: &Path) -> Result<FilteredFiles, String> {
    let excludes = ExcludeList::load(dir).map_err(|e| e.to_string())?;
    let lister = GitLister::new(dir);
    let filtered = collect_files(&lister, &excludes).map_err(|e| e.to_string())?;
    for path in &filtered.excluded {
        eprintln!("HUMAN-TAR:excluding {path}");
    }
    Ok(filtered)
}

/// Default mode: the packed stream on stdout.
fn run_pack(dir: &Path) -> Result<ExitCode, String> {
    let filtered = collect(dir)?;
    if filtered.kept.is_empty() {
        eprintln!("All files excluded.");
        return Ok(ExitCode::SUCCESS);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stats = pack_files(dir, &filtered.kept, &mut out).map_err(|e| e.to_string())?;
    out.flush().map_err(|e| e.to_string())?;

    for (path, err) in &stats.unreadable {
        eprintln!("htar: {path}: {err}");
    }
    Ok(ExitCode::SUCCESS)
}

/// `bytes` mode: the size report on stdout.
fn run_bytes(dir: &Path) -> Result<ExitCode, String> {
    let filtered = collect(dir)?;
    if filtered.kept.is_empty() {
        eprintln!("All files excluded.");
        return Ok(ExitCode::SUCCESS);
    }

    let entries = size_report(dir, &filtered.kept);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    render_report(&entries, &mut out).map_err(|e| e.to_string())?;
    out.flush().map_err(|e| e.to_string())?;
    Ok(ExitCode::SUCCESS)
}
