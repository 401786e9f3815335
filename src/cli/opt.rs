//! Command line options
use std::{fmt, path::PathBuf, str::FromStr};

use clap::Parser;

#[derive(Parser, Debug)]
/// Rename the files in a directory that holds a RISCOS.EA file.
///
/// Removes the `.~` encoding of long names and adds the file type
/// (or load/exec address) suffix.
#[clap(version)]
pub struct Options {
    /// The directory that contains the RISCOS.EA file
    pub dir: Option<PathBuf>,
    /// Only print what would be renamed
    #[clap(long, short = 'n')]
    pub dry_run: bool,
    /// Print every entry of the sidecar
    #[clap(long, short = 'v')]
    pub verbose: bool,
}

/// The format to list the entries in
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    /// A table on the terminal
    Table,
    /// Rusty Object Notation
    Ron,
}

#[derive(Debug)]
/// Failed to parse a format name
pub struct FormatError {}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Use one of `table` or `ron`")?;
        Ok(())
    }
}

impl std::error::Error for FormatError {}

impl Default for Format {
    fn default() -> Self {
        Format::Table
    }
}

impl FromStr for Format {
    type Err = FormatError;
    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "table" | "txt" => Ok(Self::Table),
            "ron" => Ok(Self::Ron),
            _ => Err(FormatError {}),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => f.write_str("table"),
            Self::Ron => f.write_str("ron"),
        }
    }
}

#[derive(Parser, Debug)]
/// List the entries of a RISCOS.EA file
pub struct DumpOptions {
    /// A directory with a RISCOS.EA file, or the file itself
    pub path: PathBuf,
    /// Format of the output. Valid choices are "table" and "ron"
    #[clap(default_value_t, long, short = 'F')]
    pub format: Format,
}
