//! Listing the entries of a sidecar

use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::eyre;
use prettytable::{format, row, Cell, Row, Table};
use riscos::{
    ea::{parse_sidecar, sidecar_path, EaRecord},
    fix::file_name_path,
    name::reconstruct,
    util::{
        vfs::{LocalFS, VFS},
        Bytes32,
    },
    Error,
};
use ron::ser::PrettyConfig;
use serde::Serialize;

use super::{opt::Format, util};

/// A single slot of a sidecar, as listed
#[derive(Debug, Serialize)]
pub struct Entry {
    /// Position in the file
    pub slot: usize,
    /// The stored name, `None` for free slots
    pub name: Option<String>,
    /// The name the entry should have
    pub target: Option<String>,
    /// Load address
    pub load: Bytes32,
    /// Exec address
    pub exec: Bytes32,
    /// Access string, e.g. `WR/r`
    pub access: String,
    /// Whether the stored name is present on disk (only for directories)
    pub exists: Option<bool>,
}

impl Entry {
    fn new<V: VFS>(slot: usize, record: &EaRecord, vfs: Option<&V>) -> Self {
        let (name, target, exists) = if record.is_used() {
            let stored = record.stored_name();
            let path = file_name_path(stored).ok();
            let is_dir = match (vfs, path) {
                (Some(vfs), Some(path)) => vfs.is_dir(path),
                _ => false,
            };
            let exists = vfs.map(|vfs| path.map_or(false, |path| vfs.exists(path)));
            let target = reconstruct(record, is_dir);
            (Some(stored.to_string()), Some(target.to_string()), exists)
        } else {
            (None, None, None)
        };
        Self {
            slot,
            name,
            target,
            load: record.attr.load,
            exec: record.attr.exec,
            access: record.attr.flags.to_string(),
            exists,
        }
    }
}

/// Read the sidecar at `path` (a directory or the file itself)
pub fn load_entries(path: &Path) -> eyre::Result<Vec<Entry>> {
    let (file, vfs): (PathBuf, Option<LocalFS>) = if path.is_dir() {
        (sidecar_path(path)?, Some(LocalFS::new(path.to_owned())))
    } else {
        (path.to_owned(), None)
    };
    let buffer = match fs::read(&file) {
        Ok(buffer) => buffer,
        Err(source) => return Err(Error::SidecarOpen { path: file, source }.into()),
    };
    let records = util::load(parse_sidecar, &buffer)?;
    let entries = records
        .iter()
        .enumerate()
        .map(|(slot, record)| Entry::new(slot, record, vfs.as_ref()))
        .collect();
    Ok(entries)
}

fn print_table(entries: &[Entry]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row!["slot", "name", "target", "load", "exec", "access", "exists"]);

    for entry in entries {
        let exists = match entry.exists {
            Some(true) => "yes",
            Some(false) => "no",
            None => "",
        };
        table.add_row(Row::new(vec![
            Cell::new(&format!("{:3}", entry.slot)),
            Cell::new(entry.name.as_deref().unwrap_or("<free>")),
            Cell::new(entry.target.as_deref().unwrap_or("")),
            Cell::new(&entry.load.to_string()),
            Cell::new(&entry.exec.to_string()),
            Cell::new(&entry.access),
            Cell::new(exists),
        ]));
    }

    table.printstd();
}

/// Print the entries in the selected format
pub fn print_entries(entries: &[Entry], format: Format) -> eyre::Result<()> {
    match format {
        Format::Table => print_table(entries),
        Format::Ron => {
            let cfg = PrettyConfig::new().with_separate_tuple_members(false);
            println!("{}", ron::ser::to_string_pretty(&entries, cfg)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use riscos::{attrs::Attributes, ea::EaRecord, util::vfs::LocalFS};

    use super::Entry;

    #[test]
    fn test_entry_without_directory() {
        let record = EaRecord::new(b"PROGRAMS.~RS", Attributes::new(0xFFF00B00, 0, 0x13));
        let entry = Entry::new::<LocalFS>(2, &record, None);
        assert_eq!(entry.slot, 2);
        assert_eq!(entry.name.as_deref(), Some("PROGRAMS.~RS"));
        assert_eq!(entry.target.as_deref(), Some("PROGRAMSRS,b"));
        assert_eq!(entry.access, "WR/r");
        assert_eq!(entry.exists, None);

        let free = EaRecord::new(b"", Attributes::new(0, 0, 0));
        let entry = Entry::new::<LocalFS>(3, &free, None);
        assert_eq!(entry.name, None);
        assert_eq!(entry.target, None);
    }
}
