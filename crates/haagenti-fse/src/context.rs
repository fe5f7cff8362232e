//! Reusable encoding context.
//!
//! The context owns every buffer the pipeline touches: the raw histogram, the
//! normalized distribution, the header output and the transition-table
//! storage handed to the table builder. Buffers only grow, so a context reused
//! for a stream of similarly sized blocks stops allocating after the first.
//!
//! A context is not meant to be shared; use one per concurrent task.

use crate::buffer::HeaderBuffer;
use crate::config::FseConfig;
use crate::normalize::{NormEntry, Normalization};
use crate::{ALPHABET_SIZE, DEFAULT_TABLE_LOG, MAX_SYMBOL_VALUE};
use haagenti_core::Result;

/// Lifecycle of the histogram buffer.
///
/// Counting leaves the buffer dirty; the next [`FseContext::prepare`] zeroes
/// it. A context dropped after a single use never pays for the clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CountState {
    Clean,
    Dirty,
}

/// Mutable state for normalized-count construction.
pub struct FseContext {
    /// Caller-supplied parameters.
    pub(crate) config: FseConfig,
    /// Occurrences of each byte value in the current input.
    pub(crate) count: [u32; ALPHABET_SIZE],
    /// Whether `count` still holds the previous input's histogram.
    pub(crate) count_state: CountState,
    /// Tagged distribution used while normalizing.
    pub(crate) entries: [NormEntry; ALPHABET_SIZE],
    /// Final signed distribution (`-1` = low probability, one unit).
    pub(crate) norm: [i16; ALPHABET_SIZE],
    /// Length of the current input.
    pub(crate) length: usize,
    /// One past the highest symbol present.
    pub(crate) symbol_len: usize,
    /// Requested table log, defaults applied.
    pub(crate) table_log: u8,
    /// Alphabet ceiling, defaults applied.
    pub(crate) max_symbol_value: u8,
    /// Table log selected for the current input.
    pub(crate) actual_table_log: u8,
    /// Which normalizer produced `norm`.
    pub(crate) normalization: Option<Normalization>,
    /// Serialized header.
    pub(crate) out: HeaderBuffer,
    /// Transition-table storage, filled by the table builder.
    pub(crate) ctable: Vec<u32>,
}

// Manual Debug impl: the 256-entry arrays would drown the useful fields.
impl core::fmt::Debug for FseContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FseContext")
            .field("config", &self.config)
            .field("count_state", &self.count_state)
            .field("length", &self.length)
            .field("symbol_len", &self.symbol_len)
            .field("actual_table_log", &self.actual_table_log)
            .field("normalization", &self.normalization)
            .field("header_len", &self.out.as_slice().len())
            .field("header_capacity", &self.out.capacity())
            .field("header_peak", &self.out.peak_len())
            .field("ctable_len", &self.ctable.len())
            .finish()
    }
}

impl Default for FseContext {
    fn default() -> Self {
        Self::new(FseConfig::default())
    }
}

impl FseContext {
    /// Create a new context. No buffers are allocated until first use.
    pub fn new(config: FseConfig) -> Self {
        Self {
            config,
            count: [0; ALPHABET_SIZE],
            count_state: CountState::Clean,
            entries: [NormEntry::Absent; ALPHABET_SIZE],
            norm: [0; ALPHABET_SIZE],
            length: 0,
            symbol_len: 0,
            table_log: DEFAULT_TABLE_LOG,
            max_symbol_value: MAX_SYMBOL_VALUE,
            actual_table_log: 0,
            normalization: None,
            out: HeaderBuffer::default(),
            ctable: Vec::new(),
        }
    }

    /// Current configuration.
    #[inline]
    pub fn config(&self) -> &FseConfig {
        &self.config
    }

    /// Replace the configuration for subsequent blocks.
    ///
    /// Validation happens on the next [`prepare`](Self::prepare).
    #[inline]
    pub fn set_config(&mut self, config: FseConfig) {
        self.config = config;
    }

    /// Get ready for an input of `length` bytes.
    ///
    /// Validates the requested precision, applies defaults, pre-sizes the
    /// header buffer, performs a pending histogram clear and sizes the
    /// transition-table storage to
    /// `1 + 2^(table_log - 1) + 2 * (max_symbol_value + 1)` entries.
    pub fn prepare(&mut self, length: usize) -> Result<()> {
        self.config.validate()?;

        self.length = length;
        self.table_log = self.config.resolved_table_log();
        self.max_symbol_value = self.config.resolved_max_symbol_value();
        self.actual_table_log = 0;
        self.normalization = None;

        if self.out.is_unallocated() {
            self.out.reserve(length);
        }
        self.out.reset();

        if self.count_state == CountState::Dirty {
            self.count = [0; ALPHABET_SIZE];
            self.symbol_len = 0;
            self.count_state = CountState::Clean;
        }

        // table_log >= 1 after defaults, so the shift is well-defined.
        let ctable_size =
            1 + (1usize << (self.table_log - 1)) + 2 * (self.max_symbol_value as usize + 1);
        self.ctable.resize(ctable_size, 0);

        Ok(())
    }

    /// Raw histogram of the current input.
    #[inline]
    pub fn counts(&self) -> &[u32; ALPHABET_SIZE] {
        &self.count
    }

    /// Normalized distribution over the active symbol range.
    ///
    /// `-1` marks a low-probability symbol occupying exactly one table slot.
    #[inline]
    pub fn norm(&self) -> &[i16] {
        &self.norm[..self.symbol_len]
    }

    /// One past the highest symbol present in the current input.
    #[inline]
    pub fn symbol_len(&self) -> usize {
        self.symbol_len
    }

    /// Length of the current input.
    #[inline]
    pub fn input_len(&self) -> usize {
        self.length
    }

    /// Table log selected for the current input (0 before selection).
    #[inline]
    pub fn actual_table_log(&self) -> u8 {
        self.actual_table_log
    }

    /// Which normalizer produced the current distribution.
    #[inline]
    pub fn normalization(&self) -> Option<Normalization> {
        self.normalization
    }

    /// Header bytes from the last successful serialization.
    #[inline]
    pub fn header(&self) -> &[u8] {
        self.out.as_slice()
    }

    /// Transition-table storage. Sized by [`prepare`](Self::prepare); its
    /// contents belong to the table builder.
    #[inline]
    pub fn ctable(&self) -> &[u32] {
        &self.ctable
    }

    /// Mutable transition-table storage for the table builder.
    #[inline]
    pub fn ctable_mut(&mut self) -> &mut [u32] {
        &mut self.ctable
    }
}
