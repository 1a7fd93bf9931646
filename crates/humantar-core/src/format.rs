//! The human-tar line format.
//!
//! A packed stream is a sequence of UTF-8 text lines of the form
//! `<relative/path>:<line content>`. There is no header, footer, or
//! escaping. The split happens at the *first* colon, so content may
//! safely contain colons; a path containing a colon cannot be
//! represented.

use std::io::{self, Write};

/// One logical line of a packed stream: a path and one line of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Relative file path, trimmed of surrounding whitespace.
    pub path: String,
    /// One line of file content, trimmed of surrounding whitespace.
    pub content: String,
}

/// Parse a raw line into a [`Record`].
///
/// Splits on the first `:` and trims surrounding whitespace from both
/// sides. Returns `None` for lines without a colon; callers decide how
/// to report the malformed line.
pub fn parse_line(line: &str) -> Option<Record> {
    let (path, content) = line.split_once(':')?;
    Some(Record {
        path: path.trim().to_string(),
        content: content.trim().to_string(),
    })
}

/// Write one `path:content` line to `out`.
pub fn write_line<W: Write>(out: &mut W, path: &str, content: &str) -> io::Result<()> {
    writeln!(out, "{}:{}", path, content)
}
