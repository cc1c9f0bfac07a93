//! Errors raised when constructing fundamental values.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid account id: {0}")]
    InvalidAddress(String),

    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("invalid asset code: {0}")]
    InvalidAssetCode(String),

    #[error("memo is {len} bytes, limit is {limit}")]
    MemoTooLong { len: usize, limit: usize },

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("unknown network: {0}")]
    InvalidNetwork(String),
}
