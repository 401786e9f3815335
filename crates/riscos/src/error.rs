//! Errors that abort a scan

use std::{io, path::PathBuf};

use displaydoc::Display;
use thiserror::Error;

/// Fatal errors when opening or reading a sidecar
#[derive(Debug, Display, Error)]
pub enum Error {
    /// Directory path too long ({len} bytes, limit is {max})
    PathTooLong {
        /// The length of the longest path that would be built
        len: usize,
        /// The exclusive upper bound
        max: usize,
    },
    /// Failed to open {path:?}: {source}
    SidecarOpen {
        /// The sidecar path
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },
    /// Failed to read sidecar: {0}
    Read(#[source] io::Error),
}
