//! Sidecar exclusion patterns for the packer.
//!
//! Patterns live in `.human-tar-exclude` in the working directory, one
//! glob per line. Blank lines and lines starting with `#` are ignored on
//! read. Matching is case-sensitive: a path is excluded when it equals a
//! pattern exactly or matches it as a shell-style glob (`*` crosses `/`,
//! so `*.log` also matches `logs/build.log`).
//!
//! The sidecar is append-only and is not locked; concurrent packer
//! invocations racing to append may interleave or duplicate entries.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};
use thiserror::Error;

/// Name of the sidecar file holding exclusion patterns.
pub const EXCLUDE_FILE: &str = ".human-tar-exclude";

/// Error type for exclude-list operations.
#[derive(Debug, Error)]
pub enum ExcludeError {
    /// IO error reading or appending the sidecar file.
    #[error("cannot access {path}: {source}")]
    Io { path: String, source: io::Error },
}

/// Outcome of [`add_pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The pattern was appended to the sidecar.
    Added,
    /// The pattern was already present (exact string equality).
    AlreadyPresent,
}

/// One pattern with its compiled glob matcher, if it compiled.
///
/// A pattern that fails to compile still participates in exact-string
/// matching, so a literal path containing glob metacharacters that
/// `globset` rejects can still be excluded by exact match.
#[derive(Debug)]
struct Entry {
    pattern: String,
    matcher: Option<GlobMatcher>,
}

/// An ordered list of exclusion patterns loaded from the sidecar file.
#[derive(Debug, Default)]
pub struct ExcludeList {
    entries: Vec<Entry>,
}

impl ExcludeList {
    /// Build an exclude list from raw pattern strings.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = patterns
            .into_iter()
            .map(|p| {
                let pattern = p.into();
                let matcher = GlobBuilder::new(&pattern)
                    .build()
                    .map(|g| g.compile_matcher())
                    .map_err(|e| {
                        tracing::warn!(pattern = %pattern, error = %e, "invalid glob pattern, exact match only");
                    })
                    .ok();
                Entry { pattern, matcher }
            })
            .collect();
        Self { entries }
    }

    /// Load the exclude list from `dir`'s sidecar file.
    ///
    /// A missing sidecar is an empty list, not an error.
    pub fn load(dir: &Path) -> Result<Self, ExcludeError> {
        let path = dir.join(EXCLUDE_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path).map_err(|source| ExcludeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_patterns(read_patterns(&raw)))
    }

    /// Whether `path` matches any pattern, by exact string or by glob.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.entries.iter().any(|e| {
            e.pattern == path
                || e.matcher
                    .as_ref()
                    .is_some_and(|m| m.is_match(path))
        })
    }

    /// Number of patterns in the list.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Append `pattern` to `dir`'s sidecar file unless already present.
///
/// Presence is checked by exact string equality against the patterns
/// already on disk, not by glob equivalence. Creates the sidecar on
/// first use. Idempotent.
pub fn add_pattern(dir: &Path, pattern: &str) -> Result<AddOutcome, ExcludeError> {
    let path = dir.join(EXCLUDE_FILE);
    let existing: Vec<String> = if path.exists() {
        let raw = fs::read_to_string(&path).map_err(|source| ExcludeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        read_patterns(&raw).map(str::to_string).collect()
    } else {
        Vec::new()
    };

    if existing.iter().any(|p| p.as_str() == pattern) {
        return Ok(AddOutcome::AlreadyPresent);
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| ExcludeError::Io {
            path: path.display().to_string(),
            source,
        })?;
    writeln!(file, "{}", pattern).map_err(|source| ExcludeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(AddOutcome::Added)
}

/// Iterate the meaningful pattern lines of a sidecar file's text.
fn read_patterns(raw: &str) -> impl Iterator<Item = &str> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_excludes() {
        let list = ExcludeList::from_patterns(["Cargo.lock"]);
        assert!(list.is_excluded("Cargo.lock"));
        assert!(!list.is_excluded("Cargo.toml"));
    }

    #[test]
    fn glob_match_crosses_directories() {
        let list = ExcludeList::from_patterns(["*.log"]);
        assert!(list.is_excluded("build.log"));
        assert!(list.is_excluded("logs/nested/build.log"));
        assert!(!list.is_excluded("build.log.txt"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let list = ExcludeList::from_patterns(["README.md"]);
        assert!(list.is_excluded("README.md"));
        assert!(!list.is_excluded("readme.md"));
    }

    #[test]
    fn load_skips_blank_lines_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(EXCLUDE_FILE),
            "# generated\n\n*.lock\n  \ntarget/*\n",
        )
        .unwrap();
        let list = ExcludeList::load(dir.path()).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.is_excluded("Cargo.lock"));
        assert!(list.is_excluded("target/debug"));
        assert!(!list.is_excluded("# generated"));
    }

    #[test]
    fn load_without_sidecar_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let list = ExcludeList::load(dir.path()).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn add_pattern_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(add_pattern(dir.path(), "*.tmp").unwrap(), AddOutcome::Added);
        assert_eq!(
            add_pattern(dir.path(), "*.tmp").unwrap(),
            AddOutcome::AlreadyPresent
        );
        let raw = fs::read_to_string(dir.path().join(EXCLUDE_FILE)).unwrap();
        assert_eq!(raw.matches("*.tmp").count(), 1);
    }

    #[test]
    fn add_pattern_appends_in_order() {
        let dir = tempfile::tempdir().unwrap();
        add_pattern(dir.path(), "a").unwrap();
        add_pattern(dir.path(), "b").unwrap();
        let raw = fs::read_to_string(dir.path().join(EXCLUDE_FILE)).unwrap();
        assert_eq!(raw, "a\nb\n");
    }

    #[test]
    fn dedup_is_exact_string_not_glob_equivalence() {
        let dir = tempfile::tempdir().unwrap();
        add_pattern(dir.path(), "*.tmp").unwrap();
        // Equivalent as globs, but a distinct string: still appended.
        assert_eq!(
            add_pattern(dir.path(), "./*.tmp").unwrap(),
            AddOutcome::Added
        );
    }
}
