//! # Haagenti Core
//!
//! Shared error taxonomy for the Haagenti entropy-coding crates.
//!
//! Haagenti is named after the 48th demon of the Ars Goetia, who transmutes
//! substances into more valuable forms - just as compression transforms data
//! into denser representations.
//!
//! ## Error Classes
//!
//! - **Configuration**: [`Error::InvalidPrecision`], [`Error::SymbolOutOfRange`]
//! - **Resource**: [`Error::InputTooLarge`]
//! - **Internal**: [`Error::InvariantViolation`], [`Error::Inconsistent`]
//! - **Parsing**: [`Error::CorruptedData`], [`Error::UnexpectedEof`]
//!
//! "Store raw" outcomes are not errors; codecs report them as `Ok(None)`.

pub mod error;

pub use error::{Error, Result};
