//! # Haagenti FSE
//!
//! Normalized-count construction and table header serialization for
//! Finite State Entropy coding.
//!
//! This crate turns a byte histogram into a normalized distribution that sums
//! exactly to `1 << table_log`, and packs that distribution into the compact
//! header a matching decoder reads back before building its state tables.
//! Any rounding or bit-packing difference between the two sides desynchronizes
//! the decoder, so every step here is deterministic integer arithmetic.
//!
//! ## Pipeline
//!
//! ```text
//! bytes ──► histogram ──► table log ──► normalized counts ──► header bytes
//!           (count_simple)  (precision)   (primary/fallback)   (write_normalized_counts)
//! ```
//!
//! The transition tables, the symbol encoding loop and block framing live in
//! the consuming codec; they read [`FseContext::norm`],
//! [`FseContext::actual_table_log`] and the storage behind
//! [`FseContext::ctable_mut`] after a successful [`FseContext::compress`].
//!
//! ## Quick Start
//!
//! ```rust
//! use haagenti_fse::{FseConfig, FseContext};
//!
//! let mut ctx = FseContext::new(FseConfig::default());
//! let data = b"abracadabra, abracadabra, abracadabra!".repeat(8);
//!
//! match ctx.compress(&data).unwrap() {
//!     Some(header) => assert!(!header.is_empty()),
//!     None => { /* store the block raw */ }
//! }
//! ```
//!
//! A `None` result is not an error: the input is too small or too evenly
//! distributed for this coder, and the caller should store it uncompressed.

mod buffer;
mod check;
mod compress;
mod config;
mod context;
mod histogram;
mod normalize;
mod precision;

pub mod header;

pub use compress::compress_header;
pub use config::FseConfig;
pub use context::FseContext;
pub use header::{
    max_header_size, read_normalized_counts, write_normalized_counts, NormalizedCounts,
};
pub use histogram::Histogram;
pub use normalize::{normalize_counts, Normalization, RTB_TABLE};
pub use precision::{min_table_log, optimal_table_log};

pub use haagenti_core::{Error, Result};

/// Smallest table log the coder will select.
pub const MIN_TABLE_LOG: u8 = 5;

/// Largest table log the coder will select (16KB of encoder state).
pub const MAX_TABLE_LOG: u8 = 12;

/// Table log used when the caller leaves the request unset.
pub const DEFAULT_TABLE_LOG: u8 = 11;

/// Largest symbol value for a byte alphabet.
pub const MAX_SYMBOL_VALUE: u8 = 255;

/// Largest input a single invocation accepts.
pub const MAX_INPUT_SIZE: u64 = u32::MAX as u64;

/// Number of distinct byte symbols.
pub(crate) const ALPHABET_SIZE: usize = MAX_SYMBOL_VALUE as usize + 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!(MIN_TABLE_LOG <= DEFAULT_TABLE_LOG);
        assert!(DEFAULT_TABLE_LOG <= MAX_TABLE_LOG);
        // The header stores `table_log - MIN_TABLE_LOG` in 4 bits.
        assert!(MAX_TABLE_LOG - MIN_TABLE_LOG < 16);
        assert_eq!(ALPHABET_SIZE, 256);
    }
}
