use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown asset symbol: {0}")]
    UnknownAsset(String),

    #[error("invalid asset entry {symbol}: {reason}")]
    InvalidAsset { symbol: String, reason: String },

    #[error("config error: {0}")]
    Config(String),
}
