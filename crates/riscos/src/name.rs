//! # Name reconstruction
//!
//! The filer keeps names to ten characters on foreign filesystems. A
//! longer name `abcdefghij` is stored as `abcdefgh.~ij` (the first eight
//! characters, the marker `.~` and the next two). The name we want on
//! disk is the undecoded name with a `,xxx` type suffix.

use std::fmt;

use bstr::BString;

use crate::{
    attrs::{Attributes, FileType},
    ea::{cstr, EaRecord, NAME_LEN},
    util::Bytes32,
};

/// Position of the `.~` marker in an encoded name
pub const MARKER_POS: usize = 8;

/// Whether the stored name uses the 8+2 encoding
pub fn is_encoded(name: &[u8; NAME_LEN]) -> bool {
    name[MARKER_POS] == b'.' && name[MARKER_POS + 1] == b'~'
}

/// The name without the `.~` marker (or the stored name as is)
pub fn base_name(record: &EaRecord) -> BString {
    let name = &record.name;
    if is_encoded(name) {
        let mut buf = Vec::with_capacity(10);
        buf.extend_from_slice(&name[..MARKER_POS]);
        buf.extend_from_slice(&name[MARKER_POS + 2..MARKER_POS + 4]);
        BString::from(cstr(&buf))
    } else {
        BString::from(cstr(name))
    }
}

/// The part appended after the base name
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Suffix {
    /// Nothing to add
    None,
    /// `,xxx`
    FileType(FileType),
    /// `,load-exec`
    Addresses {
        /// Load address
        load: Bytes32,
        /// Exec address
        exec: Bytes32,
    },
}

impl Suffix {
    /// Pick the suffix for a file with these attributes
    pub fn for_attributes(attr: &Attributes) -> Self {
        match attr.file_type() {
            Some(file_type) if file_type.is_typed() => Self::FileType(file_type),
            Some(_) => Self::None,
            None => Self::Addresses {
                load: attr.load,
                exec: attr.exec,
            },
        }
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::FileType(file_type) => write!(f, ",{}", file_type),
            Self::Addresses { load, exec } => write!(f, ",{:x}-{:x}", load.0, exec.0),
        }
    }
}

/// The name the entry should have on disk.
///
/// Directories never get a suffix.
pub fn reconstruct(record: &EaRecord, is_dir: bool) -> BString {
    let mut name = base_name(record);
    if !is_dir {
        let suffix = Suffix::for_attributes(&record.attr);
        name.extend_from_slice(suffix.to_string().as_bytes());
    }
    name
}

#[cfg(test)]
mod tests {
    use super::{base_name, is_encoded, reconstruct, Suffix};
    use crate::{
        attrs::{Attributes, FileType},
        ea::EaRecord,
    };

    fn record(name: &[u8], load: u32, exec: u32) -> EaRecord {
        EaRecord::new(name, Attributes::new(load, exec, 0x13))
    }

    #[test]
    fn test_undecode() {
        for (stem, tail) in [("abcdefgh", "ij"), ("PROGRAM_", "RS"), ("12345678", "90")] {
            let stored = format!("{}.~{}", stem, tail);
            let rec = record(stored.as_bytes(), 0xFFFFFF00, 0);
            assert!(is_encoded(&rec.name));
            assert_eq!(base_name(&rec), format!("{}{}", stem, tail));
        }
    }

    #[test]
    fn test_undecode_ignores_trailing_bytes() {
        let rec = record(b"abcdefgh.~ijXYZW", 0xFFFFFF00, 0);
        assert_eq!(base_name(&rec), "abcdefghij");
    }

    #[test]
    fn test_verbatim() {
        for name in ["Short", "abcdefgh~.ij", "abcdefgh.ij", "a.b"] {
            let rec = record(name.as_bytes(), 0xFFFFFF00, 0);
            assert!(!is_encoded(&rec.name));
            assert_eq!(base_name(&rec), name);
        }
    }

    #[test]
    fn test_suffix() {
        let attr = Attributes::new(0xFFF0AA00, 0, 0);
        assert_eq!(Suffix::for_attributes(&attr), Suffix::FileType(FileType(0xAA)));
        assert_eq!(Suffix::for_attributes(&attr).to_string(), ",aa");

        let attr = Attributes::new(0xFFFFFD00, 0, 0);
        assert_eq!(Suffix::for_attributes(&attr).to_string(), ",ffd");

        let attr = Attributes::new(0xFFF00500, 0, 0);
        assert_eq!(Suffix::for_attributes(&attr).to_string(), ",5");

        for load in [0xFFFFFF00, 0xFFFFFFFF, 0xFFFFFF7A] {
            let attr = Attributes::new(load, 0x1234, 0);
            assert_eq!(Suffix::for_attributes(&attr), Suffix::None);
        }

        let attr = Attributes::new(0x00008000, 0x00008023, 0);
        assert_eq!(Suffix::for_attributes(&attr).to_string(), ",8000-8023");
    }

    #[test]
    fn test_marker_must_be_at_offset_eight() {
        // a seven character stem puts `.~` at 7..9, which is not the encoding
        let rec = record(b"PROGRAM.~RS", 0xFFF00B00, 0);
        assert!(!is_encoded(&rec.name));
        assert_eq!(base_name(&rec), "PROGRAM.~RS");
        assert_eq!(reconstruct(&rec, false), "PROGRAM.~RS,b");
    }

    #[test]
    fn test_reconstruct() {
        let rec = record(b"PROGRAMS.~RS", 0xFFF00B00, 0);
        assert_eq!(reconstruct(&rec, false), "PROGRAMSRS,b");

        let rec = record(b"!RunImage", 0xFFFFF800, 0x12345678);
        assert_eq!(reconstruct(&rec, false), "!RunImage,ff8");

        let rec = record(b"Module", 0x00001000, 0x00001004);
        assert_eq!(reconstruct(&rec, false), "Module,1000-1004");

        let rec = record(b"ReadMe", 0xFFFFFF00, 0);
        assert_eq!(reconstruct(&rec, false), "ReadMe");
    }

    #[test]
    fn test_directories_have_no_suffix() {
        let rec = record(b"Applicat.~io", 0xFFFFFD00, 0);
        assert_eq!(reconstruct(&rec, true), "Applicatio");
        let rec = record(b"!Boot", 0x00008000, 0x00008023);
        assert_eq!(reconstruct(&rec, true), "!Boot");
    }
}
