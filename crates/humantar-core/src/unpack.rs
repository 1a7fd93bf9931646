//! Three-phase unpacker: scan, guard, write.
//!
//! Phase 1 reads the whole input into memory and resolves every target
//! path. Phase 2 refuses to proceed if any target already exists, so a
//! conflicting stream never produces partial writes. Phase 3 replays the
//! original line order, appending each record's content to its file and
//! creating parent directories as needed.
//!
//! The phases run strictly in sequence with no branching back. An I/O
//! failure during phase 3 aborts immediately and leaves already-written
//! files in place; there is no rollback.

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::format;

/// Error type for unpacking.
#[derive(Debug, Error)]
pub enum UnpackError {
    /// A target file already exists; nothing was written.
    #[error("File {} already exists in output directory.", .path.display())]
    Conflict { path: PathBuf },

    /// Reading the input stream failed.
    #[error("failed to read input: {0}")]
    Input(#[source] io::Error),

    /// Creating directories or writing a target file failed.
    #[error("error writing to {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Result of scanning the input stream (phase 1).
#[derive(Debug)]
pub struct Scan {
    /// Every input line, in original order, replayed during phase 3.
    lines: Vec<String>,
    /// Unique resolved target paths, sorted.
    targets: BTreeSet<PathBuf>,
    /// Raw text of lines with no `:` separator, in input order.
    pub malformed: Vec<String>,
}

impl Scan {
    /// Unique resolved target paths, in sorted order.
    pub fn targets(&self) -> impl Iterator<Item = &PathBuf> {
        self.targets.iter()
    }
}

/// Statistics from the write phase.
#[derive(Debug, Default)]
pub struct UnpackStats {
    /// Distinct files that received at least one line.
    pub files_written: usize,
    /// Lines appended across all files.
    pub lines_written: usize,
}

/// Phase 1: read the entire input, resolving targets under `output_dir`.
///
/// Records with an empty path contribute no target; lines without a
/// colon are collected into [`Scan::malformed`] for the caller to warn
/// about. Nothing is written.
pub fn scan<R: BufRead>(input: R, output_dir: &Path) -> Result<Scan, UnpackError> {
    let mut lines = Vec::new();
    let mut targets = BTreeSet::new();
    let mut malformed = Vec::new();

    for line in input.lines() {
        let line = line.map_err(UnpackError::Input)?;
        match format::parse_line(&line) {
            Some(record) if !record.path.is_empty() => {
                targets.insert(output_dir.join(&record.path));
            }
            Some(_) => {}
            None => malformed.push(line.clone()),
        }
        lines.push(line);
    }

    Ok(Scan {
        lines,
        targets,
        malformed,
    })
}

/// Phase 2: the first pre-existing target in path-sorted order, if any.
pub fn find_conflict(scan: &Scan) -> Option<&PathBuf> {
    scan.targets.iter().find(|path| path.exists())
}

/// Phase 3: replay the original line order, appending each record.
///
/// Only records with both a non-empty path and non-empty trimmed content
/// are written; blank content is silently skipped, so blank lines in the
/// original files are not reconstructed. Each write appends
/// `content + '\n'` to the target, creating parent directories first.
pub fn write_files(scan: &Scan, output_dir: &Path) -> Result<UnpackStats, UnpackError> {
    let mut stats = UnpackStats::default();
    let mut touched = BTreeSet::new();

    for line in &scan.lines {
        let Some(record) = format::parse_line(line) else {
            continue;
        };
        if record.path.is_empty() || record.content.is_empty() {
            continue;
        }

        let target = output_dir.join(&record.path);
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| UnpackError::Write {
                    path: target.clone(),
                    source,
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&target)
            .map_err(|source| UnpackError::Write {
                path: target.clone(),
                source,
            })?;
        writeln!(file, "{}", record.content).map_err(|source| UnpackError::Write {
            path: target.clone(),
            source,
        })?;

        stats.lines_written += 1;
        if touched.insert(target) {
            stats.files_written += 1;
        }
    }

    tracing::debug!(
        files = stats.files_written,
        lines = stats.lines_written,
        "unpack complete"
    );
    Ok(stats)
}
