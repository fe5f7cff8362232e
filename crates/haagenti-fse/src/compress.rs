//! Header pipeline: histogram, precision, normalization, serialization.

use tracing::debug;

use crate::config::FseConfig;
use crate::context::FseContext;
use crate::MAX_INPUT_SIZE;
use haagenti_core::{Error, Result};

/// Reject inputs a single invocation cannot address.
#[inline]
fn ensure_input_size(length: usize) -> Result<()> {
    if length as u64 > MAX_INPUT_SIZE {
        return Err(Error::input_too_large(length, MAX_INPUT_SIZE));
    }
    Ok(())
}

impl FseContext {
    /// Build the normalized-count header for `input`.
    ///
    /// Returns `Ok(None)` when the input is too small or too evenly spread to
    /// benefit; the caller stores it raw. On `Ok(Some(header))` the context
    /// also holds the distribution ([`norm`](Self::norm)) and the table log
    /// ([`actual_table_log`](Self::actual_table_log)) the table builder needs.
    ///
    /// A single repeated byte still produces a valid one-entry header. Callers
    /// with an RLE path should check the input before calling.
    ///
    /// # Errors
    ///
    /// - [`Error::InputTooLarge`] above [`MAX_INPUT_SIZE`] bytes.
    /// - [`Error::InvalidPrecision`] for a configured table log above the maximum.
    /// - [`Error::SymbolOutOfRange`] for a byte above the configured
    ///   `max_symbol_value`.
    /// - [`Error::InvariantViolation`] or [`Error::Inconsistent`] if the
    ///   distribution comes out malformed.
    pub fn compress(&mut self, input: &[u8]) -> Result<Option<&[u8]>> {
        if input.len() <= 1 {
            debug!(length = input.len(), "input too small for a table");
            return Ok(None);
        }
        ensure_input_size(input.len())?;

        self.prepare(input.len())?;
        let histogram = self.count_simple(input);

        if histogram.symbol_len > self.max_symbol_value as usize + 1 {
            return Err(Error::SymbolOutOfRange {
                symbol: histogram.symbol_len - 1,
                max: self.max_symbol_value,
            });
        }

        if histogram.is_single_symbol(input.len()) {
            debug!(
                symbol = histogram.symbol_len - 1,
                length = input.len(),
                "single repeated symbol"
            );
        } else if histogram.is_incompressible(input.len()) {
            debug!(
                max_count = histogram.max_count,
                length = input.len(),
                "input judged incompressible"
            );
            return Ok(None);
        }

        self.select_table_log();
        self.normalize()?;
        self.write_header()?;
        self.check_distribution()?;

        Ok(Some(self.out.as_slice()))
    }
}

/// One-shot header construction with a fresh context.
///
/// Prefer a reused [`FseContext`] when encoding many blocks.
pub fn compress_header(input: &[u8], config: FseConfig) -> Result<Option<Vec<u8>>> {
    let mut ctx = FseContext::new(config);
    Ok(ctx.compress(input)?.map(<[u8]>::to_vec))
}
