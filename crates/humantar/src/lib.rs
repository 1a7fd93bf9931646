//! CLI front end for humantar.
//!
//! The `htar` (pack) and `huntar` (unpack) binaries share the logging
//! setup and exit-code conventions defined here; the actual pack/unpack
//! machinery lives in `humantar-core`.

pub mod logging;
