//! Normalized-count header serialization.
//!
//! The header carries the table log and the normalized distribution in a
//! self-describing variable-width code.
//!
//! ## Format
//!
//! Bits are packed LSB-first and flushed as little-endian 16-bit chunks.
//!
//! - 4 bits: `table_log - 5`
//! - For each symbol, starting at 0, until the budget is spent:
//!   - the value `norm + 1` (so the low-probability `-1` encodes as 0) in a
//!     shrinking-range code: with `remaining` budget left, `threshold` is the
//!     largest power of two not above it and `max = 2*threshold - 1 - remaining`;
//!     values below `max` take `log2(threshold)` bits, the rest take one more
//!     and values from `threshold` upward are shifted by `max`
//!   - after a zero entry, a zero-run length: 2-bit codes where `3` means
//!     "three more zeros, keep reading" and `0..=2` ends the run; eight
//!     consecutive `3` codes (a 16-bit all-ones chunk) cover 24 zeros
//! - padding to a whole byte
//!
//! The first field starts with `remaining = table_size + 1`. Fields shrink as
//! the budget is consumed, so late symbols cost fewer bits.

mod reader;
mod writer;

pub use reader::read_normalized_counts;
pub use writer::write_normalized_counts;

use tracing::debug;

use crate::context::FseContext;
use haagenti_core::{Error, Result};

/// A distribution recovered from a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCounts {
    /// Signed distribution indexed by symbol; `-1` marks a low-probability symbol.
    pub norm: Vec<i16>,
    /// Table log the distribution sums to.
    pub table_log: u8,
}

impl NormalizedCounts {
    /// One past the highest symbol with a nonzero entry.
    #[inline]
    pub fn symbol_len(&self) -> usize {
        self.norm.len()
    }

    /// Table size the distribution sums to.
    #[inline]
    pub fn table_size(&self) -> usize {
        1 << self.table_log
    }
}

/// Upper bound on the header size for `symbol_len` symbols at `table_log`.
///
/// Every field takes at most `table_log + 1` bits and a zero-run code at most
/// two more; the bound adds the 4-bit table log and the final padding.
#[inline]
pub fn max_header_size(symbol_len: usize, table_log: u8) -> usize {
    ((symbol_len * (table_log as usize + 3) + 4 + 7) >> 3) + 2
}

impl FseContext {
    /// Serialize the current distribution into the header buffer.
    ///
    /// Returns the header length in bytes.
    pub fn write_header(&mut self) -> Result<usize> {
        if self.normalization.is_none() {
            return Err(Error::invariant("header requested before normalization"));
        }

        self.out.reset();
        self.out
            .reserve(max_header_size(self.symbol_len, self.actual_table_log));
        let written = write_normalized_counts(
            &self.norm[..self.symbol_len],
            self.actual_table_log,
            self.out.as_vec_mut(),
        )?;

        debug!(
            header_bytes = written,
            table_log = self.actual_table_log,
            symbol_len = self.symbol_len,
            "wrote normalized count header"
        );
        Ok(written)
    }
}
