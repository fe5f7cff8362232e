//! Post-hoc distribution check.

use tracing::trace;

use crate::context::FseContext;
use haagenti_core::{Error, Result};

/// Table slots a distribution occupies, counting each `-1` as one slot.
pub(crate) fn slot_total(norm: &[i16]) -> i64 {
    norm.iter().map(|&n| (n as i64).abs()).sum()
}

impl FseContext {
    /// Verify the normalized distribution against the histogram.
    ///
    /// Fails if the distribution does not sum to `1 << actual_table_log`, if a
    /// present symbol received no slot, or if a symbol beyond the active range
    /// has a nonzero count or entry.
    pub fn check_distribution(&self) -> Result<()> {
        let symbol_len = self.symbol_len;
        trace!(
            table_log = self.actual_table_log,
            symbol_len,
            "checking normalized distribution"
        );
        for (symbol, (&count, &norm)) in self.count[..symbol_len]
            .iter()
            .zip(self.norm[..symbol_len].iter())
            .enumerate()
        {
            trace!(symbol, count, norm, "distribution entry");
            if count > 0 && norm == 0 {
                return Err(Error::inconsistent(format!(
                    "symbol {} occurs {} times but has no table slot",
                    symbol, count
                )));
            }
        }

        let total = slot_total(&self.norm[..symbol_len]);
        let expected = 1i64 << self.actual_table_log;
        if total != expected {
            return Err(Error::inconsistent(format!(
                "distribution sums to {} but table size is {}",
                total, expected
            )));
        }

        if let Some(offset) = self.count[symbol_len..].iter().position(|&c| c != 0) {
            return Err(Error::inconsistent(format!(
                "symbol {} found beyond symbol length {}",
                symbol_len + offset,
                symbol_len
            )));
        }
        if let Some(offset) = self.norm[symbol_len..].iter().position(|&n| n != 0) {
            return Err(Error::inconsistent(format!(
                "normalized entry {} set beyond symbol length {}",
                symbol_len + offset,
                symbol_len
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(input: &[u8]) -> FseContext {
        let mut ctx = FseContext::default();
        ctx.prepare(input.len()).unwrap();
        ctx.count_simple(input);
        ctx.normalize().unwrap();
        ctx
    }

    #[test]
    fn test_slot_total() {
        assert_eq!(slot_total(&[]), 0);
        assert_eq!(slot_total(&[3, -1, 0, 28]), 32);
    }

    #[test]
    fn test_valid_distribution_passes() {
        let ctx = normalized(&b"the quick brown fox jumps over the lazy dog".repeat(10));
        assert!(ctx.check_distribution().is_ok());
    }

    #[test]
    fn test_sum_mismatch_fails() {
        let mut ctx = normalized(&b"aaaabbbccd".repeat(4));
        let symbol = b'a' as usize;
        ctx.norm[symbol] += 1;
        let err = ctx.check_distribution().unwrap_err();
        assert!(matches!(err, Error::Inconsistent { .. }));
        assert!(err.to_string().contains("sums to"));
    }

    #[test]
    fn test_count_beyond_symbol_len_fails() {
        let mut ctx = normalized(&b"aaaabbbccd".repeat(4));
        ctx.count[200] = 1;
        let err = ctx.check_distribution().unwrap_err();
        assert!(err.to_string().contains("symbol 200"));
    }

    #[test]
    fn test_missing_slot_fails() {
        let mut ctx = normalized(&b"aaaabbbccd".repeat(4));
        let largest = b'a' as usize;
        let dropped = b'd' as usize;
        ctx.norm[largest] += ctx.norm[dropped].abs();
        ctx.norm[dropped] = 0;
        let err = ctx.check_distribution().unwrap_err();
        assert!(err.to_string().contains("no table slot"));
    }
}
