//! Count normalization.
//!
//! Rescales a raw histogram into a distribution summing to exactly
//! `1 << table_log`. Symbols too rare to earn a full slot are marked
//! low-probability and still reserve one slot, so every present symbol stays
//! decodable.
//!
//! ## Methods
//!
//! - **Primary**: 62-bit fixed-point scaling, a rounding-bias correction for
//!   small probabilities, and a single adjustment on the largest entry that
//!   absorbs the accumulated rounding error.
//! - **Fallback**: used when that adjustment would eat more than half of the
//!   largest entry. Classifies rare symbols against two thresholds and spreads
//!   the rest of the budget proportionally over the remaining symbols.
//!
//! Both methods work on tagged [`NormEntry`] values; the signed `i16` form with
//! its `-1` sentinel only appears once construction is complete.

mod fallback;

use tracing::debug;

use crate::context::FseContext;
use crate::{ALPHABET_SIZE, MAX_TABLE_LOG, MIN_TABLE_LOG};
use haagenti_core::{Error, Result};

pub(crate) use fallback::normalize_fallback;

/// Round-up thresholds for probabilities below 8, in units of 2^-20.
///
/// Truncating `count * 2^table_log / total` biases small probabilities
/// downward. A probability `p < 8` is rounded up when its fractional part
/// exceeds `RTB_TABLE[p] / 2^20`. The curve is empirically tuned; changing it
/// changes compressed output.
pub const RTB_TABLE: [u32; 8] = [0, 473195, 504333, 520860, 550000, 700000, 750000, 830000];

/// Which normalizer produced a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Fixed-point scaling with a single correction on the largest entry.
    Primary,
    /// Threshold classification with proportional redistribution.
    Fallback,
}

/// A normalized entry under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NormEntry {
    /// Symbol does not occur.
    Absent,
    /// Symbol occurs but is below one slot; reserves exactly one.
    LowProbability,
    /// Symbol owns this many slots.
    Count(u16),
    /// Fallback only: not yet classified.
    Unassigned,
}

impl NormEntry {
    /// Slots this entry occupies in the table.
    #[inline]
    pub(crate) fn slots(self) -> u32 {
        match self {
            NormEntry::Absent | NormEntry::Unassigned => 0,
            NormEntry::LowProbability => 1,
            NormEntry::Count(n) => n as u32,
        }
    }

    /// Collapse to the serialized form. `None` for unassigned entries.
    #[inline]
    pub(crate) fn to_signed(self) -> Option<i16> {
        match self {
            NormEntry::Absent => Some(0),
            NormEntry::LowProbability => Some(-1),
            NormEntry::Count(n) => i16::try_from(n).ok(),
            NormEntry::Unassigned => None,
        }
    }
}

/// Primary normalization.
///
/// Returns `true` when the distribution is final, `false` when the rounding
/// correction is too large for the largest entry and the fallback must run.
pub(crate) fn normalize_primary(
    counts: &[u32],
    total: usize,
    table_log: u8,
    entries: &mut [NormEntry],
) -> bool {
    let scale = 62 - table_log as u32;
    let step = (1u64 << 62) / total as u64;
    let v_step = 1u64 << (scale - 20);
    let low_threshold = (total >> table_log) as u64;

    let mut still_to_distribute: i32 = 1 << table_log;
    let mut largest: Option<usize> = None;
    let mut largest_p = 0u64;

    for (symbol, (&cnt, entry)) in counts.iter().zip(entries.iter_mut()).enumerate() {
        if cnt == 0 {
            *entry = NormEntry::Absent;
            continue;
        }
        if cnt as u64 <= low_threshold {
            *entry = NormEntry::LowProbability;
            still_to_distribute -= 1;
            continue;
        }

        let scaled = cnt as u64 * step;
        let mut proba = scaled >> scale;
        if proba < 8 {
            let rest_to_beat = v_step * RTB_TABLE[proba as usize] as u64;
            if scaled - (proba << scale) > rest_to_beat {
                proba += 1;
            }
        }
        if proba > largest_p {
            largest_p = proba;
            largest = Some(symbol);
        }
        *entry = NormEntry::Count(proba as u16);
        still_to_distribute -= proba as i32;
    }

    let Some(largest) = largest else {
        return false;
    };
    let largest_p = largest_p as i32;
    if -still_to_distribute >= (largest_p >> 1) {
        return false;
    }
    entries[largest] = NormEntry::Count((largest_p + still_to_distribute) as u16);
    true
}

/// Normalize `counts` to sum to `1 << table_log`.
///
/// `counts` is indexed by symbol; its length is the active symbol range. Runs
/// the primary method and falls back when needed.
pub fn normalize_counts(counts: &[u32], table_log: u8) -> Result<(Vec<i16>, Normalization)> {
    if !(MIN_TABLE_LOG..=MAX_TABLE_LOG).contains(&table_log) {
        return Err(Error::invalid_precision(table_log, MAX_TABLE_LOG));
    }
    if counts.len() > ALPHABET_SIZE {
        return Err(Error::SymbolOutOfRange {
            symbol: counts.len() - 1,
            max: (ALPHABET_SIZE - 1) as u8,
        });
    }
    let total: u64 = counts.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return Err(Error::invariant("cannot normalize an empty histogram"));
    }

    let mut entries = vec![NormEntry::Absent; counts.len()];
    let method = run(counts, total as usize, table_log, &mut entries)?;
    let mut norm = vec![0i16; counts.len()];
    collapse(&entries, &mut norm)?;
    Ok((norm, method))
}

fn run(
    counts: &[u32],
    total: usize,
    table_log: u8,
    entries: &mut [NormEntry],
) -> Result<Normalization> {
    if normalize_primary(counts, total, table_log, entries) {
        return Ok(Normalization::Primary);
    }
    normalize_fallback(counts, total, table_log, entries)?;
    Ok(Normalization::Fallback)
}

/// Write the signed form of `entries` into the front of `norm`.
fn collapse(entries: &[NormEntry], norm: &mut [i16]) -> Result<()> {
    for (symbol, (slot, entry)) in norm.iter_mut().zip(entries).enumerate() {
        *slot = entry.to_signed().ok_or_else(|| {
            Error::invariant(format!("symbol {} left unassigned by normalization", symbol))
        })?;
    }
    Ok(())
}

impl FseContext {
    /// Normalize the counted histogram at the selected table log.
    ///
    /// Selects the table log first if that has not happened yet. On success
    /// [`norm`](Self::norm) holds the distribution and every entry beyond the
    /// active range is zero.
    pub fn normalize(&mut self) -> Result<Normalization> {
        if self.length == 0 || self.symbol_len == 0 {
            return Err(Error::invariant("cannot normalize an empty histogram"));
        }
        if self.actual_table_log == 0 {
            self.select_table_log();
        }

        let symbol_len = self.symbol_len;
        let method = run(
            &self.count[..symbol_len],
            self.length,
            self.actual_table_log,
            &mut self.entries[..symbol_len],
        )?;

        collapse(&self.entries[..symbol_len], &mut self.norm)?;
        self.norm[symbol_len..].fill(0);
        self.normalization = Some(method);

        debug!(
            ?method,
            table_log = self.actual_table_log,
            symbol_len,
            "normalized counts"
        );
        Ok(method)
    }
}
