//! # Renaming entries
//!
//! Every used slot of the sidecar is turned into at most one rename
//! within the sidecar's directory. Nothing is kept between records.

use std::{
    fmt,
    path::{Component, Path},
};

use bstr::{BStr, BString, ByteSlice};
use displaydoc::Display;
use log::Level;
use thiserror::Error;

use crate::{
    ea::EaRecord,
    name::reconstruct,
    util::{vfs::VFS, Bytes32},
    Error,
};

/// What to do with a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The stored name is already the right one
    Unchanged,
    /// There is no entry with the stored name
    Missing,
    /// Rename `from` to `to`
    Rename {
        /// The stored name
        from: BString,
        /// The reconstructed name
        to: BString,
    },
}

/// A name that can't be used inside the target directory
#[derive(Debug, Display, Error)]
pub enum NameError {
    /// '{0}' is not a valid path on this platform
    NotUtf8(BString),
    /// '{0}' is not a plain file name
    NotAFileName(BString),
}

/// Turn a name into a path with a single normal component
pub fn file_name_path(name: &BStr) -> Result<&Path, NameError> {
    let path = name
        .to_path()
        .map_err(|_| NameError::NotUtf8(name.to_owned()))?;
    let mut components = path.components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if single && path.file_name() == Some(path.as_os_str()) {
        Ok(path)
    } else {
        Err(NameError::NotAFileName(name.to_owned()))
    }
}

/// Decide what to do with a used record.
///
/// Names that would leave the directory are rejected before any query.
pub fn plan<V: VFS>(vfs: &V, record: &EaRecord) -> Result<Action, NameError> {
    let stored = record.stored_name();
    let stored_path = file_name_path(stored)?;
    let target = reconstruct(record, vfs.is_dir(stored_path));
    file_name_path(target.as_bstr())?;
    if target.as_bstr() == stored {
        Ok(Action::Unchanged)
    } else if vfs.exists(stored_path) {
        Ok(Action::Rename {
            from: BString::from(stored.as_bytes()),
            to: target,
        })
    } else {
        Ok(Action::Missing)
    }
}

/// The result of processing a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Free slot
    Skipped,
    /// Name was correct already
    Unchanged,
    /// The file is gone (or was renamed by an earlier run)
    Missing,
    /// The file was renamed
    Renamed,
    /// The file would have been renamed
    WouldRename,
    /// The rename failed with the given message
    Failed(String),
}

/// Counts over a whole sidecar
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Number of slots read
    pub records: usize,
    /// Free slots
    pub free: usize,
    /// Entries that had the right name
    pub unchanged: usize,
    /// Entries not found on disk
    pub missing: usize,
    /// Entries renamed
    pub renamed: usize,
    /// Entries that would be renamed (dry run)
    pub would_rename: usize,
    /// Failed renames
    pub failed: usize,
}

impl Summary {
    /// Count an outcome
    pub fn record(&mut self, outcome: &Outcome) {
        self.records += 1;
        match outcome {
            Outcome::Skipped => self.free += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Missing => self.missing += 1,
            Outcome::Renamed => self.renamed += 1,
            Outcome::WouldRename => self.would_rename += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records ({} free): {} renamed, {} unchanged, {} missing, {} failed",
            self.records, self.free, self.renamed, self.unchanged, self.missing, self.failed
        )?;
        if self.would_rename > 0 {
            write!(f, ", {} to rename", self.would_rename)?;
        }
        Ok(())
    }
}

/// Applies the records of a sidecar to its directory
pub struct Fixer<V> {
    vfs: V,
    dry_run: bool,
    verbose: bool,
}

impl<V: VFS> Fixer<V> {
    /// Create a new instance
    pub fn new(vfs: V) -> Self {
        Self {
            vfs,
            dry_run: false,
            verbose: false,
        }
    }

    /// Only report renames, don't perform them
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Log every entry at info level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The underlying file system
    pub fn vfs(&self) -> &V {
        &self.vfs
    }

    fn entry_level(&self) -> Level {
        if self.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }

    /// Process a single slot
    pub fn process(&self, record: &EaRecord) -> Outcome {
        if !record.is_used() {
            return Outcome::Skipped;
        }
        let level = self.entry_level();
        log::log!(
            level,
            "Found file entry '{}': Load {} Exec {} Flags {} ({})",
            record.stored_name(),
            record.attr.load,
            record.attr.exec,
            Bytes32(record.attr.flags.bits()),
            record.attr.flags,
        );
        let action = match plan(&self.vfs, record) {
            Ok(action) => action,
            Err(e) => {
                log::error!("Skipping entry: {}", e);
                return Outcome::Failed(e.to_string());
            }
        };
        match action {
            Action::Unchanged => Outcome::Unchanged,
            Action::Missing => {
                log::log!(
                    level,
                    "'{}' is not in {}",
                    record.stored_name(),
                    self.vfs.root().display()
                );
                Outcome::Missing
            }
            Action::Rename { from, to } => self.rename(from.as_bstr(), to.as_bstr()),
        }
    }

    fn rename(&self, from: &BStr, to: &BStr) -> Outcome {
        if self.dry_run {
            log::info!("Would rename '{}' to '{}'", from, to);
            return Outcome::WouldRename;
        }
        let paths = from.to_path().and_then(|f| to.to_path().map(|t| (f, t)));
        let result = match paths {
            Ok((from_path, to_path)) => self
                .vfs
                .rename(from_path, to_path)
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match result {
            Ok(()) => {
                log::info!("Renamed '{}' to '{}'", from, to);
                Outcome::Renamed
            }
            Err(msg) => {
                log::error!("Failed to rename '{}' to '{}': {}", from, to, msg);
                Outcome::Failed(msg)
            }
        }
    }

    /// Process all records in order.
    ///
    /// Failed renames are counted; a read error ends the run.
    pub fn run<I>(&self, records: I) -> Result<Summary, Error>
    where
        I: IntoIterator<Item = Result<EaRecord, Error>>,
    {
        let mut summary = Summary::default();
        for record in records {
            let outcome = self.process(&record?);
            summary.record(&outcome);
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::{plan, Action, Fixer, NameError, Outcome};
    use crate::{attrs::Attributes, ea::EaRecord, util::vfs::mock::MemFS};

    fn record(name: &[u8], load: u32, exec: u32) -> EaRecord {
        EaRecord::new(name, Attributes::new(load, exec, 0x13))
    }

    #[test]
    fn test_free_slot_makes_no_calls() {
        let fs = MemFS::with_files(&["PROGRAMS.~RS"]);
        let fixer = Fixer::new(fs);
        let mut rec = record(b"PROGRAMS.~RS", 0xFFF00B00, 0);
        rec.name[0] = 0;
        assert_eq!(fixer.process(&rec), Outcome::Skipped);
        assert!(fixer.vfs().calls.borrow().is_empty());
    }

    #[test]
    fn test_rename_encoded() {
        let fs = MemFS::with_files(&["PROGRAMS.~RS"]);
        let rec = record(b"PROGRAMS.~RS", 0xFFF00B00, 0);
        assert_eq!(
            plan(&fs, &rec).unwrap(),
            Action::Rename {
                from: "PROGRAMS.~RS".into(),
                to: "PROGRAMSRS,b".into()
            }
        );
        let fixer = Fixer::new(fs);
        assert_eq!(fixer.process(&rec), Outcome::Renamed);
        assert_eq!(fixer.vfs().names(), vec!["PROGRAMSRS,b"]);
        assert_eq!(
            *fixer.vfs().calls.borrow().last().unwrap(),
            "rename PROGRAMS.~RS PROGRAMSRS,b"
        );

        // a second run finds nothing to do
        assert_eq!(fixer.process(&rec), Outcome::Missing);
        assert_eq!(fixer.vfs().names(), vec!["PROGRAMSRS,b"]);
    }

    #[test]
    fn test_unchanged() {
        let fs = MemFS::with_files(&["ReadMe"]);
        let rec = record(b"ReadMe", 0xFFFFFF00, 0);
        let fixer = Fixer::new(fs);
        assert_eq!(fixer.process(&rec), Outcome::Unchanged);
        let calls = fixer.vfs().calls.borrow();
        assert_eq!(*calls, vec!["is_dir ReadMe"]);
    }

    #[test]
    fn test_missing_is_not_an_error() {
        let fs = MemFS::with_files(&[]);
        let rec = record(b"Module", 0x1000, 0x1004);
        let fixer = Fixer::new(fs);
        assert_eq!(fixer.process(&rec), Outcome::Missing);
        assert!(!fixer
            .vfs()
            .calls
            .borrow()
            .iter()
            .any(|c| c.starts_with("rename")));
    }

    #[test]
    fn test_directory() {
        let fs = MemFS::with_files(&[]);
        fs.add_dir("Applicat.~io");
        fs.add_dir("!Boot");
        let fixer = Fixer::new(fs);
        let rec = record(b"Applicat.~io", 0xFFFFFD00, 0);
        assert_eq!(fixer.process(&rec), Outcome::Renamed);
        let rec = record(b"!Boot", 0x8000, 0x8023);
        assert_eq!(fixer.process(&rec), Outcome::Unchanged);
        assert_eq!(fixer.vfs().names(), vec!["!Boot", "Applicatio"]);
    }

    #[test]
    fn test_rejects_names_outside_directory() {
        for name in ["/tmp/escape", "../outside", "a/b", "..", ".", "sub/"] {
            let fs = MemFS::with_files(&[name]);
            let rec = record(name.as_bytes(), 0xFFFFFD00, 0);
            match plan(&fs, &rec) {
                Err(NameError::NotAFileName(n)) => assert_eq!(n, name),
                other => panic!("{:?} was accepted: {:?}", name, other),
            }
            let fixer = Fixer::new(fs);
            assert!(matches!(fixer.process(&rec), Outcome::Failed(_)));
            assert!(fixer.vfs().calls.borrow().is_empty());
        }
    }

    #[test]
    fn test_existing_target_is_not_replaced() {
        let fs = MemFS::with_files(&["abcdefghij", "abcdefgh.~ij"]);
        let fixer = Fixer::new(fs);
        let records = vec![
            Ok(record(b"abcdefghij", 0xFFFFFF00, 0)),
            Ok(record(b"abcdefgh.~ij", 0xFFFFFF00, 0)),
        ];
        let summary = fixer.run(records).unwrap();
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.renamed, 0);
        assert_eq!(fixer.vfs().names(), vec!["abcdefgh.~ij", "abcdefghij"]);
    }

    #[test]
    fn test_dry_run() {
        let fs = MemFS::with_files(&["Module"]);
        let fixer = Fixer::new(fs).dry_run(true);
        let rec = record(b"Module", 0x1000, 0x1004);
        assert_eq!(fixer.process(&rec), Outcome::WouldRename);
        assert_eq!(fixer.vfs().names(), vec!["Module"]);
    }

    #[test]
    fn test_failed_rename_continues() {
        let fs = MemFS {
            fail_renames: true,
            ..MemFS::with_files(&["Module", "Text"])
        };
        let fixer = Fixer::new(fs);
        let records = vec![
            Ok(record(b"Module", 0x1000, 0x1004)),
            Ok(record(b"", 0, 0)),
            Ok(record(b"Text", 0xFFFFFF00, 0)),
            Ok(record(b"Gone", 0xFFFFFF00, 0)),
        ];
        let summary = fixer.run(records).unwrap();
        assert_eq!(summary.records, 4);
        assert_eq!(summary.free, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.unchanged, 2);
        assert_eq!(summary.missing, 0);
        assert_eq!(
            summary.to_string(),
            "4 records (1 free): 0 renamed, 2 unchanged, 0 missing, 1 failed"
        );
    }
}
