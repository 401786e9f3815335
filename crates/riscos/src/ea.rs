//! # `RISCOS.EA` sidecar file
//!
//! The file is a flat array of 28 byte records without header:
//!
//! | offset | size | field                            |
//! |--------|------|----------------------------------|
//! | 0      | 16   | name, zero padded, `\0` = free   |
//! | 16     | 4    | load address (LE)                |
//! | 20     | 4    | exec address (LE)                |
//! | 24     | 4    | access flags (LE)                |

use std::{
    fmt,
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

use bstr::{BStr, ByteSlice};
use nom::{
    bytes::complete::take,
    combinator::map,
    error::ParseError,
    multi::many0,
    number::complete::le_u32,
    sequence::tuple,
    IResult,
};

use crate::{attrs::Attributes, util::Buf, Error};

/// The name of the sidecar file within a directory
pub const SIDECAR_NAME: &str = "RISCOS.EA";
/// Size of the name field
pub const NAME_LEN: usize = 16;
/// Size of a single record
pub const RECORD_SIZE: usize = 28;
/// Exclusive limit for any path that is built
pub const MAX_PATH: usize = 2048;
/// Longest file name that can come out of a record (`name,load-exec`)
pub const MAX_NAME_LEN: usize = NAME_LEN + 1 + 8 + 1 + 8;

/// A single slot of the sidecar
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct EaRecord {
    /// The stored (possibly encoded) name
    pub name: [u8; NAME_LEN],
    /// Load/exec address and access bits
    pub attr: Attributes,
}

impl fmt::Debug for EaRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EaRecord")
            .field("name", &self.stored_name())
            .field("load", &self.attr.load)
            .field("exec", &self.attr.exec)
            .field("flags", &self.attr.flags)
            .finish()
    }
}

fn le_u32_at(bytes: &[u8; RECORD_SIZE], offset: usize) -> u32 {
    let mut word = [0; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}

impl EaRecord {
    /// Create a record from a name and attributes, truncating the name to 16 bytes
    pub fn new(name: &[u8], attr: Attributes) -> Self {
        let mut buf = [0; NAME_LEN];
        let len = name.len().min(NAME_LEN);
        buf[..len].copy_from_slice(&name[..len]);
        Self { name: buf, attr }
    }

    /// Decode a block by field offset
    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Self {
        let mut name = [0; NAME_LEN];
        name.copy_from_slice(&bytes[..NAME_LEN]);
        let attr = Attributes::new(
            le_u32_at(bytes, 16),
            le_u32_at(bytes, 20),
            le_u32_at(bytes, 24),
        );
        Self { name, attr }
    }

    /// Encode the record in the on-disk layout
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0; RECORD_SIZE];
        bytes[..NAME_LEN].copy_from_slice(&self.name);
        bytes[16..20].copy_from_slice(&self.attr.load.0.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.attr.exec.0.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.attr.flags.bits().to_le_bytes());
        bytes
    }

    /// Whether the slot holds an entry
    pub fn is_used(&self) -> bool {
        self.name[0] != 0
    }

    /// The name as stored, up to the first NUL
    pub fn stored_name(&self) -> &BStr {
        cstr(&self.name).as_bstr()
    }
}

/// Cut a buffer at its first NUL byte
pub(crate) fn cstr(buf: &[u8]) -> &[u8] {
    match buf.find_byte(0) {
        Some(end) => &buf[..end],
        None => buf,
    }
}

fn p_name<'a, E: ParseError<&'a [u8]>>(
    input: &'a [u8],
) -> IResult<&'a [u8], [u8; NAME_LEN], E> {
    map(take(NAME_LEN), |bytes: &[u8]| {
        let mut name = [0; NAME_LEN];
        name.copy_from_slice(bytes);
        name
    })(input)
}

/// Parse the load, exec and flags words
pub fn parse_attributes<'a, E: ParseError<&'a [u8]>>(
    input: &'a [u8],
) -> IResult<&'a [u8], Attributes, E> {
    map(tuple((le_u32, le_u32, le_u32)), |(load, exec, flags)| {
        Attributes::new(load, exec, flags)
    })(input)
}

/// Parse a single record
pub fn parse_record<'a, E: ParseError<&'a [u8]>>(
    input: &'a [u8],
) -> IResult<&'a [u8], EaRecord, E> {
    map(tuple((p_name, parse_attributes)), |(name, attr)| EaRecord {
        name,
        attr,
    })(input)
}

/// Parse all complete records of a sidecar.
///
/// A trailing partial record is left in the rest.
pub fn parse_sidecar<'a, E: ParseError<&'a [u8]>>(
    input: &'a [u8],
) -> IResult<&'a [u8], Vec<EaRecord>, E> {
    many0(parse_record)(input)
}

/// The path of the sidecar for a directory.
///
/// Fails if that path, or the longest path for a renamed file, would
/// not fit within [`MAX_PATH`].
pub fn sidecar_path(dir: &Path) -> Result<PathBuf, Error> {
    let path = dir.join(SIDECAR_NAME);
    let dir_len = dir.as_os_str().len();
    let len = path.as_os_str().len().max(dir_len + 1 + MAX_NAME_LEN);
    if len >= MAX_PATH {
        return Err(Error::PathTooLong { len, max: MAX_PATH });
    }
    Ok(path)
}

/// Sequential reader over the records of a sidecar.
///
/// Yields free slots too. A short block at the end of the stream is
/// dropped.
pub struct SidecarReader<R> {
    inner: R,
    done: bool,
}

impl SidecarReader<BufReader<File>> {
    /// Open the sidecar in `dir`
    pub fn open(dir: &Path) -> Result<Self, Error> {
        let path = sidecar_path(dir)?;
        match File::open(&path) {
            Ok(file) => Ok(Self::new(BufReader::new(file))),
            Err(source) => Err(Error::SidecarOpen { path, source }),
        }
    }
}

impl<R: Read> SidecarReader<R> {
    /// Wrap a byte stream
    pub fn new(inner: R) -> Self {
        Self { inner, done: false }
    }

    fn read_block(&mut self) -> io::Result<Option<[u8; RECORD_SIZE]>> {
        let mut block = [0; RECORD_SIZE];
        let mut filled = 0;
        while filled < RECORD_SIZE {
            match self.inner.read(&mut block[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        if filled == RECORD_SIZE {
            return Ok(Some(block));
        }
        if filled > 0 {
            log::debug!(
                "Ignoring truncated record ({} of {} bytes): {:?}",
                filled,
                RECORD_SIZE,
                Buf(&block[..filled])
            );
        }
        Ok(None)
    }
}

impl<R: Read> Iterator for SidecarReader<R> {
    type Item = Result<EaRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_block() {
            Ok(Some(block)) => Some(Ok(EaRecord::from_bytes(&block))),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(Error::Read(e)))
            }
        }
    }
}
