//! Core infrastructure for humantar.
//!
//! This crate provides the process-free pieces of the pack/unpack
//! pipeline:
//! - The `path:content` line format (the "human-tar" format)
//! - Sidecar exclusion patterns for the packer
//! - Tracked-file enumeration (git-backed, behind a trait seam)
//! - Stream packing and the byte-size report
//! - The three-phase unpacker (scan, guard, write)
//!
//! Nothing in here prints to the standard streams or exits the process;
//! every fallible operation returns a `Result`, and diagnostics the CLI
//! must surface are returned as data (skipped files, malformed lines).

pub mod exclude;
pub mod format;
pub mod list;
pub mod pack;
pub mod report;
pub mod unpack;
