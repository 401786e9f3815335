//! # Filesystem access
//!
//! All queries and renames happen relative to a single directory, the
//! one holding the `RISCOS.EA` file.

use std::{
    io,
    path::{Path, PathBuf},
};

/// # Virtual File System
///
/// The operations the rename logic needs from the target directory.
pub trait VFS {
    /// Error type
    type Error: std::fmt::Display;

    /// Return the directory this VFS operates in
    fn root(&self) -> &Path;

    /// Check whether an entry with that name exists
    fn exists(&self, name: &Path) -> bool;

    /// Check whether the name refers to a directory
    fn is_dir(&self, name: &Path) -> bool;

    /// Rename an entry within the directory.
    ///
    /// Fails if an entry named `to` exists already.
    fn rename(&self, from: &Path, to: &Path) -> Result<(), Self::Error>;
}

/// VFS for the Local File System ([`std::fs`])
pub struct LocalFS {
    dir: PathBuf,
}

impl LocalFS {
    /// Create a new instance rooted at `dir`
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl VFS for LocalFS {
    type Error = io::Error;

    fn root(&self) -> &Path {
        &self.dir
    }

    fn exists(&self, name: &Path) -> bool {
        self.dir.join(name).exists()
    }

    fn is_dir(&self, name: &Path) -> bool {
        self.dir.join(name).is_dir()
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), Self::Error> {
        let target = self.dir.join(to);
        match target.symlink_metadata() {
            Ok(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("'{}' already exists", to.display()),
                ))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        std::fs::rename(self.dir.join(from), target)
    }
}
