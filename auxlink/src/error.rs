//! Error types for auxlink.
//!
//! Transaction outcomes are values ([`LogicalOutcome`](crate::LogicalOutcome));
//! these errors cover misuse that would otherwise break the chunking loop.

pub type Result<T> = std::result::Result<T, AuxError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuxError {
    #[error("bus reports a zero transaction size")]
    ZeroTransactionSize,

    #[error("chunk of {size} bytes exceeds transaction size {limit}")]
    ChunkTooLarge { size: usize, limit: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
