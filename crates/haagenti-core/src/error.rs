//! Error types for entropy-table operations.

use thiserror::Error;

/// Result type alias for entropy-table operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Entropy-table error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested table precision exceeds the supported ceiling.
    #[error("invalid precision: table log {requested} exceeds maximum {max}")]
    InvalidPrecision { requested: u8, max: u8 },

    /// Input contains a symbol above the configured alphabet ceiling.
    #[error("symbol {symbol} out of range: max symbol value is {max}")]
    SymbolOutOfRange { symbol: usize, max: u8 },

    /// Input is larger than a single invocation can address.
    #[error("input too large: {size} bytes exceeds maximum {max}")]
    InputTooLarge { size: usize, max: u64 },

    /// Normalization or serialization produced a malformed distribution.
    #[error("invariant violation: {message}")]
    InvariantViolation { message: String },

    /// Post-hoc consistency check failed.
    #[error("inconsistent distribution: {message}")]
    Inconsistent { message: String },

    /// Header data is corrupted or invalid.
    #[error("corrupted data: {message}")]
    CorruptedData { message: String },

    /// Unexpected end of header data.
    #[error("unexpected EOF after {bytes_read} bytes")]
    UnexpectedEof { bytes_read: usize },
}

impl Error {
    /// Create an invalid precision error.
    pub fn invalid_precision(requested: u8, max: u8) -> Self {
        Error::InvalidPrecision { requested, max }
    }

    /// Create an input too large error.
    pub fn input_too_large(size: usize, max: u64) -> Self {
        Error::InputTooLarge { size, max }
    }

    /// Create an invariant violation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Error::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create a consistency check error.
    pub fn inconsistent(message: impl Into<String>) -> Self {
        Error::Inconsistent {
            message: message.into(),
        }
    }

    /// Create a corrupted data error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Error::CorruptedData {
            message: message.into(),
        }
    }

    /// Create a corrupted data error with offset context.
    pub fn corrupted_at(message: impl Into<String>, offset: usize) -> Self {
        Error::CorruptedData {
            message: format!("{} at offset {}", message.into(), offset),
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(bytes_read: usize) -> Self {
        Error::UnexpectedEof { bytes_read }
    }

    /// Check if error is recoverable (can retry with more data).
    ///
    /// Configuration and resource errors need a changed request, and
    /// invariant violations are bugs, so only truncated input qualifies.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UnexpectedEof { .. })
    }

    /// Check if error indicates a bug in table construction rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::InvariantViolation { .. } | Error::Inconsistent { .. }
        )
    }

    /// Get error category for metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Error::InvalidPrecision { .. } => "invalid_precision",
            Error::SymbolOutOfRange { .. } => "symbol_out_of_range",
            Error::InputTooLarge { .. } => "input_too_large",
            Error::InvariantViolation { .. } => "invariant_violation",
            Error::Inconsistent { .. } => "inconsistent",
            Error::CorruptedData { .. } => "corrupted_data",
            Error::UnexpectedEof { .. } => "unexpected_eof",
        }
    }
}
