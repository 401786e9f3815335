//! # RISC OS sidecar tools
#![warn(missing_docs)]

pub mod cli;
