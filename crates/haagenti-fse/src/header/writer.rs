//! Header bit packing.

use crate::{MAX_TABLE_LOG, MIN_TABLE_LOG};
use haagenti_core::{Error, Result};

/// Flush the low 16 bits of the accumulator as two little-endian bytes.
#[inline]
fn flush16(out: &mut Vec<u8>, bit_stream: &mut u32) {
    out.extend_from_slice(&(*bit_stream as u16).to_le_bytes());
    *bit_stream >>= 16;
}

/// Append the header for `norm` at `table_log` to `out`.
///
/// `norm` is the active symbol range of a distribution summing to
/// `1 << table_log`, with `-1` counting as one slot. Returns the number of
/// bytes appended.
///
/// # Errors
///
/// [`Error::InvariantViolation`] if the distribution overspends the budget or
/// runs out of symbols before the budget is spent; either means it was not a
/// valid normalized distribution.
pub fn write_normalized_counts(norm: &[i16], table_log: u8, out: &mut Vec<u8>) -> Result<usize> {
    if !(MIN_TABLE_LOG..=MAX_TABLE_LOG).contains(&table_log) {
        return Err(Error::invalid_precision(table_log, MAX_TABLE_LOG));
    }

    let start_len = out.len();
    let symbol_len = norm.len();
    let table_size = 1i32 << table_log;

    let mut bit_stream = (table_log - MIN_TABLE_LOG) as u32;
    let mut bit_count = 4u32;
    // +1 for extra accuracy
    let mut remaining = table_size + 1;
    let mut threshold = table_size;
    let mut nb_bits = table_log as u32 + 1;
    let mut previous0 = false;
    let mut charnum = 0usize;

    // stops at 1
    while remaining > 1 {
        if previous0 {
            let mut start = charnum;
            while charnum < symbol_len && norm[charnum] == 0 {
                charnum += 1;
            }
            if charnum == symbol_len {
                return Err(Error::invariant(format!(
                    "zero run reaches the end of {} symbols with {} slots unspent",
                    symbol_len,
                    remaining - 1
                )));
            }
            while charnum >= start + 24 {
                start += 24;
                bit_stream += 0xFFFF << bit_count;
                flush16(out, &mut bit_stream);
            }
            while charnum >= start + 3 {
                start += 3;
                bit_stream += 3 << bit_count;
                bit_count += 2;
            }
            bit_stream += ((charnum - start) as u32) << bit_count;
            bit_count += 2;
            if bit_count > 16 {
                flush16(out, &mut bit_stream);
                bit_count -= 16;
            }
        }

        if charnum >= symbol_len {
            return Err(Error::invariant(format!(
                "wrote {} symbols but symbol length is {}",
                charnum + 1,
                symbol_len
            )));
        }
        let mut count = norm[charnum] as i32;
        charnum += 1;

        let max = (2 * threshold - 1) - remaining;
        remaining -= count.abs();
        // +1 for extra accuracy
        count += 1;
        if count >= threshold {
            // [0..max[ [max..threshold[ (...) [threshold+max 2*threshold[
            count += max;
        }
        bit_stream += (count as u32) << bit_count;
        bit_count += nb_bits;
        if count < max {
            bit_count -= 1;
        }
        previous0 = count == 1;

        if remaining < 1 {
            return Err(Error::invariant(format!(
                "distribution overspends the budget at symbol {}",
                charnum - 1
            )));
        }
        while remaining < threshold {
            nb_bits -= 1;
            threshold >>= 1;
        }

        if bit_count > 16 {
            flush16(out, &mut bit_stream);
            bit_count -= 16;
        }
    }

    let tail = ((bit_count + 7) / 8) as usize;
    out.extend_from_slice(&bit_stream.to_le_bytes()[..tail]);

    if charnum > symbol_len {
        return Err(Error::invariant(format!(
            "wrote {} symbols but symbol length is {}",
            charnum, symbol_len
        )));
    }

    Ok(out.len() - start_len)
}
