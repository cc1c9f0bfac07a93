use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("invalid split configuration: {0}")]
    InvalidSplitConfig(String),

    #[error("split distributes {distributed}, exceeding total {total}")]
    SplitOverflow { distributed: String, total: String },

    #[error("transaction has no operations")]
    NoOperations,

    #[error("transaction has {count} operations, limit is {limit}")]
    TooManyOperations { count: usize, limit: usize },

    #[error("transaction timeout was not set")]
    MissingTimeout,

    #[error("amount overflow: {0}")]
    AmountOverflow(String),

    #[error("account sequence {0} cannot be incremented")]
    SequenceOverflow(i64),

    #[error("invalid account {0}")]
    InvalidAccount(String),

    #[error("invalid claimable balance id {0}")]
    InvalidBalanceId(String),

    #[error("envelope encoding error: {0}")]
    Encoding(String),

    #[error("{0}")]
    Other(String),
}
