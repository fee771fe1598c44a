//! Channel configuration.

use crate::bus::TransactionType;
use crate::error::{AuxError, Result};

/// Retries used by the `*_default` channel operations.
pub const DEFAULT_RETRIES: u32 = 7;

/// Largest `default_retries` accepted by [`ChannelConfig::validate`].
pub const MAX_DEFAULT_RETRIES: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Budget handed to each `read_default` / `write_default` call
    pub default_retries: u32,
    /// Addressing mode for every transaction the channel issues
    pub transaction_type: TransactionType,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            default_retries: DEFAULT_RETRIES,
            transaction_type: TransactionType::Native,
        }
    }
}

impl ChannelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_retries(mut self, retries: u32) -> Self {
        self.default_retries = retries;
        self
    }

    pub fn with_transaction_type(mut self, kind: TransactionType) -> Self {
        self.transaction_type = kind;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_retries > MAX_DEFAULT_RETRIES {
            return Err(AuxError::InvalidConfig(format!(
                "default_retries {} above {}",
                self.default_retries, MAX_DEFAULT_RETRIES
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChannelConfig::default();
        assert_eq!(config.default_retries, 7);
        assert_eq!(config.transaction_type, TransactionType::Native);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = ChannelConfig::new()
            .with_default_retries(2)
            .with_transaction_type(TransactionType::I2c);
        assert_eq!(config.default_retries, 2);
        assert_eq!(config.transaction_type, TransactionType::I2c);
    }

    #[test]
    fn test_rejects_runaway_retries() {
        let config = ChannelConfig::new().with_default_retries(MAX_DEFAULT_RETRIES + 1);
        assert!(matches!(config.validate(), Err(AuxError::InvalidConfig(_))));
    }
}
