//! Byte histogram construction.

use crate::context::{CountState, FseContext};

/// Summary of a counted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Histogram {
    /// Largest single-symbol count.
    pub max_count: usize,
    /// One past the highest symbol present.
    pub symbol_len: usize,
    /// Number of distinct symbols present.
    pub distinct: usize,
}

impl Histogram {
    /// Whether the input was one byte value repeated `length` times.
    ///
    /// Such blocks belong to an RLE path in the caller; normalization still
    /// yields a well-formed single-entry table for them.
    #[inline]
    pub fn is_single_symbol(&self, length: usize) -> bool {
        length > 0 && self.max_count == length
    }

    /// Whether the input is too evenly spread for this coder to help.
    ///
    /// True when no symbol repeats, or when the most frequent symbol covers
    /// less than 1/128 of the input.
    #[inline]
    pub fn is_incompressible(&self, length: usize) -> bool {
        self.max_count == 1 || self.max_count < (length >> 7)
    }
}

impl FseContext {
    /// Add every byte of `input` to the histogram.
    ///
    /// Records the active symbol range and returns the count summary. The
    /// histogram is left dirty; the next [`prepare`](Self::prepare) clears it.
    pub fn count_simple(&mut self, input: &[u8]) -> Histogram {
        self.count_state = CountState::Dirty;

        let chunks = input.chunks_exact(4);
        let remainder = chunks.remainder();
        for chunk in chunks {
            self.count[chunk[0] as usize] += 1;
            self.count[chunk[1] as usize] += 1;
            self.count[chunk[2] as usize] += 1;
            self.count[chunk[3] as usize] += 1;
        }
        for &b in remainder {
            self.count[b as usize] += 1;
        }

        let mut max_count = 0u32;
        let mut distinct = 0usize;
        for (symbol, &c) in self.count.iter().enumerate() {
            if c > max_count {
                max_count = c;
            }
            if c > 0 {
                self.symbol_len = symbol + 1;
                distinct += 1;
            }
        }

        Histogram {
            max_count: max_count as usize,
            symbol_len: self.symbol_len,
            distinct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counted(input: &[u8]) -> (FseContext, Histogram) {
        let mut ctx = FseContext::default();
        ctx.prepare(input.len()).unwrap();
        let histogram = ctx.count_simple(input);
        (ctx, histogram)
    }

    #[test]
    fn test_counts_every_byte() {
        let (ctx, histogram) = counted(b"aaaabbbccd");
        assert_eq!(ctx.counts()[b'a' as usize], 4);
        assert_eq!(ctx.counts()[b'b' as usize], 3);
        assert_eq!(ctx.counts()[b'c' as usize], 2);
        assert_eq!(ctx.counts()[b'd' as usize], 1);
        assert_eq!(histogram.max_count, 4);
        assert_eq!(histogram.symbol_len, b'd' as usize + 1);
        assert_eq!(histogram.distinct, 4);
    }

    #[test]
    fn test_single_symbol() {
        let input = vec![0x41u8; 300];
        let (ctx, histogram) = counted(&input);
        assert_eq!(histogram.max_count, 300);
        assert_eq!(histogram.distinct, 1);
        assert_eq!(ctx.symbol_len(), 0x42);
        assert!(histogram.is_single_symbol(input.len()));
    }

    #[test]
    fn test_symbol_zero_only() {
        let (_, histogram) = counted(&[0u8; 17]);
        assert_eq!(histogram.symbol_len, 1);
        assert!(histogram.is_single_symbol(17));
    }

    #[test]
    fn test_incompressible_thresholds() {
        let all_distinct: Vec<u8> = (0..=255).collect();
        let (_, histogram) = counted(&all_distinct);
        assert_eq!(histogram.max_count, 1);
        assert!(histogram.is_incompressible(all_distinct.len()));

        let skewed = Histogram {
            max_count: 9,
            symbol_len: 256,
            distinct: 256,
        };
        // 1024 / 128 = 8
        assert!(!skewed.is_incompressible(1024));
        assert!(skewed.is_incompressible(2048));
    }
}
