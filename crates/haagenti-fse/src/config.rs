//! Per-block tuning parameters.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_TABLE_LOG, MAX_SYMBOL_VALUE, MAX_TABLE_LOG};
use haagenti_core::{Error, Result};

/// Configuration for normalized-count construction.
///
/// A value of `0` in either field means "use the default", so a config
/// deserialized from an empty object behaves like [`FseConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FseConfig {
    /// Largest symbol value the input may contain (alphabet ceiling).
    pub max_symbol_value: u8,
    /// Requested precision exponent. The selected table log may be lower for
    /// short inputs or higher for large alphabets.
    pub table_log: u8,
}

impl Default for FseConfig {
    fn default() -> Self {
        Self {
            max_symbol_value: MAX_SYMBOL_VALUE,
            table_log: DEFAULT_TABLE_LOG,
        }
    }
}

impl FseConfig {
    /// Create a config with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested table log.
    pub fn with_table_log(mut self, table_log: u8) -> Self {
        self.table_log = table_log;
        self
    }

    /// Set the alphabet ceiling.
    pub fn with_max_symbol_value(mut self, max_symbol_value: u8) -> Self {
        self.max_symbol_value = max_symbol_value;
        self
    }

    /// Requested table log with the unset value replaced by the default.
    #[inline]
    pub fn resolved_table_log(&self) -> u8 {
        if self.table_log == 0 {
            DEFAULT_TABLE_LOG
        } else {
            self.table_log
        }
    }

    /// Alphabet ceiling with the unset value replaced by the default.
    #[inline]
    pub fn resolved_max_symbol_value(&self) -> u8 {
        if self.max_symbol_value == 0 {
            MAX_SYMBOL_VALUE
        } else {
            self.max_symbol_value
        }
    }

    /// Reject a requested precision above [`MAX_TABLE_LOG`].
    pub fn validate(&self) -> Result<()> {
        if self.table_log > MAX_TABLE_LOG {
            return Err(Error::invalid_precision(self.table_log, MAX_TABLE_LOG));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FseConfig::default();
        assert_eq!(config.max_symbol_value, 255);
        assert_eq!(config.table_log, 11);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_means_default() {
        let config = FseConfig::new().with_table_log(0).with_max_symbol_value(0);
        assert_eq!(config.resolved_table_log(), DEFAULT_TABLE_LOG);
        assert_eq!(config.resolved_max_symbol_value(), MAX_SYMBOL_VALUE);
    }

    #[test]
    fn test_validate_rejects_high_precision() {
        assert!(FseConfig::new().with_table_log(12).validate().is_ok());
        let err = FseConfig::new().with_table_log(13).validate().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidPrecision {
                requested: 13,
                max: 12
            }
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = FseConfig::new()
            .with_table_log(9)
            .with_max_symbol_value(127);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: FseConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let empty: FseConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, FseConfig::default());
    }
}
