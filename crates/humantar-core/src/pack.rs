//! Stream emission: tracked files to `path:line` records.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::format;

/// Error type for packing. Only output-stream failures are fatal;
/// unreadable input files are reported through [`PackStats`].
#[derive(Debug, Error)]
pub enum PackError {
    /// Failed writing to the output stream.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

/// Statistics from a packing run.
#[derive(Debug, Default)]
pub struct PackStats {
    /// Files read successfully (including files with no emitted lines).
    pub files_packed: usize,
    /// Records written to the output stream.
    pub lines_emitted: usize,
    /// Files that could not be read, with the error. Skipped, not fatal.
    pub unreadable: Vec<(String, io::Error)>,
}

/// Emit every non-blank line of every file as `path:line`, in order.
///
/// Lines whose trimmed length is zero are dropped from the stream, so
/// the format is lossy for blank lines: the unpacker cannot reconstruct
/// them. Content is otherwise emitted as read, including indentation.
/// Non-UTF-8 bytes are replaced lossily.
pub fn pack_files<W: Write>(
    root: &Path,
    files: &[String],
    out: &mut W,
) -> Result<PackStats, PackError> {
    let mut stats = PackStats::default();
    for file in files {
        let bytes = match fs::read(root.join(file)) {
            Ok(bytes) => bytes,
            Err(err) => {
                stats.unreadable.push((file.clone(), err));
                continue;
            }
        };
        let content = String::from_utf8_lossy(&bytes);
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            format::write_line(out, file, line).map_err(PackError::Output)?;
            stats.lines_emitted += 1;
        }
        stats.files_packed += 1;
    }
    tracing::debug!(
        files = stats.files_packed,
        lines = stats.lines_emitted,
        skipped = stats.unreadable.len(),
        "pack complete"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_to_string(root: &Path, files: &[&str]) -> (String, PackStats) {
        let files: Vec<String> = files.iter().map(|s| s.to_string()).collect();
        let mut buf = Vec::new();
        let stats = pack_files(root, &files, &mut buf).unwrap();
        (String::from_utf8(buf).unwrap(), stats)
    }

    #[test]
    fn prefixes_every_line_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "one\ntwo\n").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.txt"), "three\n").unwrap();

        let (out, stats) = pack_to_string(dir.path(), &["a.txt", "sub/b.txt"]);
        assert_eq!(out, "a.txt:one\na.txt:two\nsub/b.txt:three\n");
        assert_eq!(stats.files_packed, 2);
        assert_eq!(stats.lines_emitted, 3);
        assert!(stats.unreadable.is_empty());
    }

    #[test]
    fn blank_lines_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "\nhello\n   \nworld\n\n").unwrap();

        let (out, stats) = pack_to_string(dir.path(), &["a.txt"]);
        assert_eq!(out, "a.txt:hello\na.txt:world\n");
        assert_eq!(stats.lines_emitted, 2);
    }

    #[test]
    fn content_keeps_its_own_colons() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "key: value\n").unwrap();

        let (out, _) = pack_to_string(dir.path(), &["a.txt"]);
        assert_eq!(out, "a.txt:key: value\n");
    }

    #[test]
    fn unreadable_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "ok\n").unwrap();

        let (out, stats) = pack_to_string(dir.path(), &["missing.txt", "a.txt"]);
        assert_eq!(out, "a.txt:ok\n");
        assert_eq!(stats.files_packed, 1);
        assert_eq!(stats.unreadable.len(), 1);
        assert_eq!(stats.unreadable[0].0, "missing.txt");
    }

    #[test]
    fn empty_file_counts_as_packed_with_no_lines() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.txt"), "").unwrap();

        let (out, stats) = pack_to_string(dir.path(), &["empty.txt"]);
        assert!(out.is_empty());
        assert_eq!(stats.files_packed, 1);
        assert_eq!(stats.lines_emitted, 0);
    }
}
