//! Header parsing.
//!
//! Mirrors the writer field for field, so a header read back yields the exact
//! distribution and table log that produced it.

use super::NormalizedCounts;
use crate::{MAX_TABLE_LOG, MIN_TABLE_LOG};
use haagenti_core::{Error, Result};

/// LSB-first bit reader that keeps up to 64 unread bits in an accumulator.
struct BitReader<'a> {
    data: &'a [u8],
    /// Next byte to load into `acc`.
    next: usize,
    /// Unread bits, lowest first.
    acc: u64,
    acc_bits: u32,
    /// Bits handed out so far.
    consumed: usize,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            next: 0,
            acc: 0,
            acc_bits: 0,
            consumed: 0,
        }
    }

    fn refill(&mut self) {
        while self.acc_bits <= 56 {
            let Some(&byte) = self.data.get(self.next) else {
                break;
            };
            self.acc |= (byte as u64) << self.acc_bits;
            self.acc_bits += 8;
            self.next += 1;
        }
    }

    /// Look at the next `n` bits (at most 32) without consuming them.
    fn peek(&mut self, n: u32) -> Result<u32> {
        debug_assert!(n <= 32);
        if self.acc_bits < n {
            self.refill();
            if self.acc_bits < n {
                return Err(Error::unexpected_eof(self.data.len()));
            }
        }
        Ok((self.acc & ((1u64 << n) - 1)) as u32)
    }

    /// Drop `n` bits that a successful [`peek`](Self::peek) covered.
    #[inline]
    fn skip(&mut self, n: u32) {
        self.acc >>= n;
        self.acc_bits -= n;
        self.consumed += n as usize;
    }

    #[inline]
    fn read(&mut self, n: u32) -> Result<u32> {
        let value = self.peek(n)?;
        self.skip(n);
        Ok(value)
    }

    /// Bytes touched so far, rounding a partial byte up.
    #[inline]
    fn bytes_consumed(&self) -> usize {
        (self.consumed + 7) / 8
    }
}

/// Parse a header written by [`write_normalized_counts`](super::write_normalized_counts).
///
/// Returns the distribution and the number of bytes consumed; any payload
/// appended after the header starts at that offset.
///
/// # Errors
///
/// - [`Error::CorruptedData`] for a table log above the maximum, a symbol
///   beyond `max_symbol_value`, or a field that overspends the budget.
/// - [`Error::UnexpectedEof`] if the data ends mid-header.
pub fn read_normalized_counts(
    data: &[u8],
    max_symbol_value: u8,
) -> Result<(NormalizedCounts, usize)> {
    if data.is_empty() {
        return Err(Error::corrupted("empty normalized count header"));
    }

    let mut reader = BitReader::new(data);

    let table_log = reader.read(4)? as u8 + MIN_TABLE_LOG;
    if table_log > MAX_TABLE_LOG {
        return Err(Error::corrupted(format!(
            "table log {} exceeds maximum {}",
            table_log, MAX_TABLE_LOG
        )));
    }

    let max_symbols = max_symbol_value as usize + 1;
    let table_size = 1i32 << table_log;
    let mut remaining = table_size + 1;
    let mut threshold = table_size;
    let mut nb_bits = table_log as u32 + 1;
    let mut previous0 = false;
    let mut norm: Vec<i16> = Vec::with_capacity(max_symbols);

    while remaining > 1 {
        if previous0 {
            // A 16-bit all-ones chunk is eight `3` codes, so 24-zero runs need
            // no special case here.
            let mut run = 0usize;
            loop {
                let code = reader.read(2)?;
                run += code as usize;
                if code < 3 {
                    break;
                }
            }
            if norm.len() + run > max_symbols {
                return Err(Error::corrupted_at(
                    format!("zero run passes max symbol {}", max_symbol_value),
                    reader.bytes_consumed(),
                ));
            }
            norm.resize(norm.len() + run, 0);
        }

        if norm.len() >= max_symbols {
            return Err(Error::corrupted_at(
                format!("symbol beyond max symbol {}", max_symbol_value),
                reader.bytes_consumed(),
            ));
        }

        let max = (2 * threshold - 1) - remaining;
        let low = reader.peek(nb_bits - 1)? as i32;
        let mut value = if low < max {
            reader.skip(nb_bits - 1);
            low
        } else {
            reader.read(nb_bits)? as i32
        };
        if value >= threshold {
            value -= max;
        }

        // -1 for extra accuracy
        let count = value - 1;
        remaining -= count.abs();
        norm.push(count as i16);
        previous0 = count == 0;

        if remaining < 1 {
            return Err(Error::corrupted_at(
                format!("symbol {} overspends the table budget", norm.len() - 1),
                reader.bytes_consumed(),
            ));
        }
        while remaining < threshold {
            nb_bits -= 1;
            threshold >>= 1;
        }
    }

    Ok((NormalizedCounts { norm, table_log }, reader.bytes_consumed()))
}
