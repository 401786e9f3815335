//! # File attributes
//!
//! A RISC OS load address does double duty: if its top twelve bits are
//! all set, bits 8..20 hold the file type and the remaining bits (plus
//! the exec address) a timestamp. Otherwise load and exec are plain
//! addresses, as used by old-style untyped files.

use std::fmt;

use bitflags::bitflags;

use crate::util::Bytes32;

/// Mask of the bits that mark a load address as typed
pub const TYPED_MASK: u32 = 0xFFF0_0000;

bitflags! {
    /// The access bits of a file
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u32 {
        /// Readable by the owner
        const OWNER_READ = 1 << 0;
        /// Writable by the owner
        const OWNER_WRITE = 1 << 1;
        /// Protected from deletion
        const LOCKED = 1 << 3;
        /// Readable by others
        const PUBLIC_READ = 1 << 4;
        /// Writable by others
        const PUBLIC_WRITE = 1 << 5;
    }
}

impl fmt::Display for AccessFlags {
    /// Formats like the filer does, e.g. `LWR/r`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = [
            (Self::LOCKED, 'L'),
            (Self::OWNER_WRITE, 'W'),
            (Self::OWNER_READ, 'R'),
        ];
        for (flag, c) in bits {
            if self.contains(flag) {
                write!(f, "{}", c)?;
            }
        }
        f.write_str("/")?;
        if self.contains(Self::PUBLIC_WRITE) {
            f.write_str("w")?;
        }
        if self.contains(Self::PUBLIC_READ) {
            f.write_str("r")?;
        }
        Ok(())
    }
}

/// A 12 bit file type
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileType(pub u16);

impl FileType {
    /// Sentinel for "no type assigned"
    pub const UNTYPED: FileType = FileType(0xFFF);

    /// `&FFD` - Data
    pub const DATA: FileType = FileType(0xFFD);

    /// Whether a real type is assigned
    pub fn is_typed(&self) -> bool {
        *self != Self::UNTYPED
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// The attribute part of a sidecar record
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Attributes {
    /// Load address (or type and timestamp)
    pub load: Bytes32,
    /// Exec address (or timestamp)
    pub exec: Bytes32,
    /// Access bits, unknown bits are retained
    pub flags: AccessFlags,
}

impl Attributes {
    /// Create from the raw words
    pub fn new(load: u32, exec: u32, flags: u32) -> Self {
        Self {
            load: Bytes32(load),
            exec: Bytes32(exec),
            flags: AccessFlags::from_bits_retain(flags),
        }
    }

    /// Whether the load address carries a file type
    pub fn is_typed(&self) -> bool {
        self.load.0 & TYPED_MASK == TYPED_MASK
    }

    /// The file type, if the load address carries one
    pub fn file_type(&self) -> Option<FileType> {
        if self.is_typed() {
            let file_type = (self.load.0 & 0x000F_FFFF) >> 8;
            Some(FileType(file_type as u16))
        } else {
            None
        }
    }
}
