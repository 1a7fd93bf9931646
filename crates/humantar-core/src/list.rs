//! Tracked-file enumeration.
//!
//! The packer operates on the version-control index rather than walking
//! the filesystem. [`FileLister`] is the seam that keeps the packing
//! pipeline testable without spawning processes; [`GitLister`] is the
//! production implementation backed by `git ls-files`.

use std::io;
use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;

use crate::exclude::ExcludeList;

/// Error type for tracked-file enumeration.
#[derive(Debug, Error)]
pub enum ListError {
    /// The `git` executable was not found on PATH.
    #[error("required command not found: git")]
    GitNotFound,

    /// `git ls-files` exited with a failure status.
    #[error("git ls-files failed: {stderr}")]
    GitFailed { stderr: String },

    /// The index is empty: nothing is tracked at all.
    #[error("no git-tracked files found")]
    NoTrackedFiles,

    /// IO error spawning or reading the command.
    #[error("IO error running git: {0}")]
    Io(#[from] io::Error),
}

/// Source of the tracked-file list.
pub trait FileLister {
    /// Relative paths of every tracked file, in listing order.
    fn tracked_files(&self) -> Result<Vec<String>, ListError>;
}

/// Lists tracked files via `git ls-files` in a given root directory.
#[derive(Debug)]
pub struct GitLister {
    root: PathBuf,
}

impl GitLister {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileLister for GitLister {
    fn tracked_files(&self) -> Result<Vec<String>, ListError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .arg("ls-files")
            .output()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    ListError::GitNotFound
                } else {
                    ListError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(ListError::GitFailed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let files: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        tracing::debug!(count = files.len(), "git ls-files");
        Ok(files)
    }
}

/// Tracked files partitioned into kept and excluded sets.
#[derive(Debug, Default)]
pub struct FilteredFiles {
    /// Files that will be read and packed, in listing order.
    pub kept: Vec<String>,
    /// Files filtered out by the exclude list, in listing order.
    pub excluded: Vec<String>,
}

/// Enumerate tracked files and partition them against the exclude list.
///
/// Filtering happens before any file content is read. An empty index is
/// [`ListError::NoTrackedFiles`]; an empty `kept` set with a non-empty
/// `excluded` set is not an error (the caller decides how to report it).
pub fn collect_files<L: FileLister>(
    lister: &L,
    excludes: &ExcludeList,
) -> Result<FilteredFiles, ListError> {
    let files = lister.tracked_files()?;
    if files.is_empty() {
        return Err(ListError::NoTrackedFiles);
    }

    let mut filtered = FilteredFiles::default();
    for file in files {
        if excludes.is_excluded(&file) {
            filtered.excluded.push(file);
        } else {
            filtered.kept.push(file);
        }
    }
    Ok(filtered)
}
