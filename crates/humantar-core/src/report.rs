//! Byte-size report for tracked files.
//!
//! The `bytes` subcommand answers "what is taking up space in the
//! stream" without emitting the stream itself: one row per file, sorted
//! ascending by size, with each file's share of the total and the
//! running cumulative share.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// One row of the size report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeEntry {
    pub path: String,
    pub bytes: u64,
}

/// Compute per-file sizes, sorted ascending.
///
/// Unreadable files count as zero bytes. The sort is stable, so files
/// of equal size keep their listing order.
pub fn size_report(root: &Path, files: &[String]) -> Vec<SizeEntry> {
    let mut entries: Vec<SizeEntry> = files
        .iter()
        .map(|file| SizeEntry {
            path: file.clone(),
            bytes: fs::metadata(root.join(file)).map(|m| m.len()).unwrap_or(0),
        })
        .collect();
    entries.sort_by_key(|e| e.bytes);
    entries
}

/// Render `path:size:pct:cumulative_pct` rows plus the trailing TOTAL.
///
/// Percentages are formatted to one decimal place; the TOTAL row's
/// percentages carry no decimal. A zero total reports `0.0%` per row.
pub fn render_report<W: Write>(entries: &[SizeEntry], out: &mut W) -> io::Result<()> {
    let total: u64 = entries.iter().map(|e| e.bytes).sum();
    let mut cumulative = 0u64;
    for entry in entries {
        cumulative += entry.bytes;
        let (pct, cum_pct) = if total > 0 {
            (
                entry.bytes as f64 / total as f64 * 100.0,
                cumulative as f64 / total as f64 * 100.0,
            )
        } else {
            (0.0, 0.0)
        };
        writeln!(out, "{}:{}:{:.1}%:{:.1}%", entry.path, entry.bytes, pct, cum_pct)?;
    }
    writeln!(out, "TOTAL:{}:100%:100%", total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_string(entries: &[SizeEntry]) -> String {
        let mut buf = Vec::new();
        render_report(entries, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn sorts_ascending_by_size() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ten.txt"), [0u8; 10]).unwrap();
        fs::write(dir.path().join("five.txt"), [0u8; 5]).unwrap();
        fs::write(dir.path().join("twenty.txt"), [0u8; 20]).unwrap();

        let files: Vec<String> = ["ten.txt", "five.txt", "twenty.txt"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let entries = size_report(dir.path(), &files);
        let sizes: Vec<u64> = entries.iter().map(|e| e.bytes).collect();
        assert_eq!(sizes, vec![5, 10, 20]);
    }

    #[test]
    fn missing_file_counts_as_zero_and_sorts_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), [0u8; 3]).unwrap();

        let files: Vec<String> = ["a.txt", "missing.txt"].iter().map(|s| s.to_string()).collect();
        let entries = size_report(dir.path(), &files);
        assert_eq!(entries[0].path, "missing.txt");
        assert_eq!(entries[0].bytes, 0);
    }

    #[test]
    fn report_rows_carry_cumulative_percentages() {
        let entries = vec![
            SizeEntry { path: "five.txt".into(), bytes: 5 },
            SizeEntry { path: "ten.txt".into(), bytes: 10 },
            SizeEntry { path: "twenty.txt".into(), bytes: 20 },
        ];
        let out = render_to_string(&entries);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "five.txt:5:14.3%:14.3%");
        assert_eq!(lines[1], "ten.txt:10:28.6%:42.9%");
        assert_eq!(lines[2], "twenty.txt:20:57.1%:100.0%");
        assert_eq!(lines[3], "TOTAL:35:100%:100%");
    }

    #[test]
    fn zero_total_reports_zero_percentages() {
        let entries = vec![SizeEntry { path: "empty.txt".into(), bytes: 0 }];
        let out = render_to_string(&entries);
        assert_eq!(out, "empty.txt:0:0.0%:0.0%\nTOTAL:0:100%:100%\n");
    }
}
