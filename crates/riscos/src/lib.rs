#![warn(missing_docs)]
//! # Extended attributes from *RISC OS*
//!
//! When files from a RISC OS filing system are written to a foreign
//! filesystem, the filer stores their load/exec addresses, access bits
//! and the original name in an index file called `RISCOS.EA` next to
//! them. Names longer than ten characters are stored in an 8+2 form
//! like `abcdefgh.~ij`.
//!
//! This crate reads that index and works out which files need to be
//! renamed to get their real name back, with the usual `,xxx` file type
//! (or `,load-exec` address) suffix appended.

pub mod attrs;
pub mod ea;
pub mod error;
pub mod fix;
pub mod name;
pub mod util;

pub use error::Error;

#[doc(hidden)]
pub use nom;
