//! Table log selection.
//!
//! The table log must be large enough to give every present symbol its own
//! slot, and small enough that a short input does not pay header bits for
//! precision it cannot justify.

use tracing::trace;

use crate::context::FseContext;
use crate::{MAX_TABLE_LOG, MIN_TABLE_LOG};

/// Number of bits needed to represent `value` (0 for 0).
#[inline]
pub(crate) fn bit_len(value: u32) -> u8 {
    (32 - value.leading_zeros()) as u8
}

/// Minimum table log that can represent an input of `length` bytes whose
/// highest symbol is `symbol_len - 1`.
///
/// Takes the larger of `bit_len(length - 1) + 1` and
/// `bit_len(symbol_len - 1) + 2`.
pub fn min_table_log(length: usize, symbol_len: usize) -> u8 {
    let min_bits_src = bit_len(length.saturating_sub(1) as u32) + 1;
    let min_bits_symbols = bit_len(symbol_len.saturating_sub(1) as u32) + 2;
    min_bits_src.max(min_bits_symbols)
}

/// Select the table log for an input.
///
/// Starts from `requested`, shrinks it to `bit_len(length - 2)` when the input
/// is that short, raises it to [`min_table_log`] and [`MIN_TABLE_LOG`], then
/// clamps to [`MAX_TABLE_LOG`].
pub fn optimal_table_log(requested: u8, length: usize, symbol_len: usize) -> u8 {
    let mut table_log = requested;

    let max_bits_src = bit_len(length.saturating_sub(2) as u32);
    if max_bits_src < table_log {
        table_log = max_bits_src;
    }

    let min_bits = min_table_log(length, symbol_len);
    if min_bits > table_log {
        table_log = min_bits;
    }

    table_log.clamp(MIN_TABLE_LOG, MAX_TABLE_LOG)
}

impl FseContext {
    /// Select and record the table log for the counted input.
    pub fn select_table_log(&mut self) -> u8 {
        self.actual_table_log = optimal_table_log(self.table_log, self.length, self.symbol_len);
        trace!(
            requested = self.table_log,
            selected = self.actual_table_log,
            length = self.length,
            symbol_len = self.symbol_len,
            "selected table log"
        );
        self.actual_table_log
    }
}
