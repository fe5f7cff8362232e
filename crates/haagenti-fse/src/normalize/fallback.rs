//! Secondary normalization for skewed histograms.
//!
//! Rare symbols are pinned to one slot (low probability or a count of 1)
//! before any scaling happens, so they cannot steal budget through rounding.
//! What is left is spread over the remaining symbols using cumulative
//! fixed-point interval boundaries, which hands out exactly the remaining
//! budget with no correction step.

use tracing::trace;

use super::NormEntry;
use haagenti_core::{Error, Result};

pub(crate) fn normalize_fallback(
    counts: &[u32],
    total: usize,
    table_log: u8,
    entries: &mut [NormEntry],
) -> Result<()> {
    let budget = 1u64 << table_log;
    let mut total = total as u64;
    let mut distributed = 0u64;

    let low_threshold = total >> table_log;
    let mut low_one = (total * 3) >> (table_log + 1);

    for (&cnt, entry) in counts.iter().zip(entries.iter_mut()) {
        let cnt = cnt as u64;
        *entry = if cnt == 0 {
            NormEntry::Absent
        } else if cnt <= low_threshold {
            distributed += 1;
            total -= cnt;
            NormEntry::LowProbability
        } else if cnt <= low_one {
            distributed += 1;
            total -= cnt;
            NormEntry::Count(1)
        } else {
            NormEntry::Unassigned
        };
    }

    let mut to_distribute = remaining_budget(budget, distributed)?;

    // Average weight per remaining slot still exceeds low_one: raise the bar
    // so symbols that would round to zero get pinned to one slot.
    if to_distribute > 0 && total / to_distribute > low_one {
        low_one = (total * 3) / (to_distribute * 2);
        for (&cnt, entry) in counts.iter().zip(entries.iter_mut()) {
            if *entry == NormEntry::Unassigned && cnt as u64 <= low_one {
                *entry = NormEntry::Count(1);
                distributed += 1;
                total -= cnt as u64;
            }
        }
        to_distribute = remaining_budget(budget, distributed)?;
    }

    trace!(
        distributed,
        to_distribute,
        remaining_total = total,
        low_one,
        "fallback classification"
    );

    let present = counts.iter().filter(|&&c| c > 0).count() as u64;
    if distributed == present {
        // Every present symbol was pinned: probably incompressible. The most
        // frequent symbol takes whatever is left.
        let mut max_symbol = 0;
        let mut max_count = 0u32;
        for (symbol, &cnt) in counts.iter().enumerate() {
            if cnt > max_count {
                max_symbol = symbol;
                max_count = cnt;
            }
        }
        let slots = entries[max_symbol].slots() as u64 + to_distribute;
        entries[max_symbol] = NormEntry::Count(slot_count(slots)?);
        return verify_budget(entries, budget);
    }

    let v_step_log = 62 - table_log as u32;
    let mid = (1u64 << (v_step_log - 1)) - 1;
    let r_step = ((1u64 << v_step_log) * to_distribute + mid) / total;
    let mut tmp_total = mid;

    for (symbol, (&cnt, entry)) in counts.iter().zip(entries.iter_mut()).enumerate() {
        if *entry != NormEntry::Unassigned {
            continue;
        }
        let end = tmp_total + cnt as u64 * r_step;
        let s_start = tmp_total >> v_step_log;
        let s_end = end >> v_step_log;
        let weight = s_end - s_start;
        if weight < 1 {
            return Err(Error::invariant(format!(
                "symbol {} received weight < 1 during fallback distribution",
                symbol
            )));
        }
        *entry = NormEntry::Count(slot_count(weight)?);
        tmp_total = end;
    }

    verify_budget(entries, budget)
}

#[inline]
fn remaining_budget(budget: u64, distributed: u64) -> Result<u64> {
    budget.checked_sub(distributed).ok_or_else(|| {
        Error::invariant(format!(
            "{} pinned symbols exceed the table budget of {}",
            distributed, budget
        ))
    })
}

#[inline]
fn slot_count(slots: u64) -> Result<u16> {
    u16::try_from(slots)
        .map_err(|_| Error::invariant(format!("slot count {} does not fit the table", slots)))
}

fn verify_budget(entries: &[NormEntry], budget: u64) -> Result<()> {
    let used: u64 = entries.iter().map(|e| e.slots() as u64).sum();
    if used != budget {
        return Err(Error::invariant(format!(
            "fallback distributed {} slots, expected {}",
            used, budget
        )));
    }
    Ok(())
}
