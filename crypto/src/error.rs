use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid strkey: {0}")]
    InvalidStrkey(String),

    #[error("strkey checksum mismatch")]
    ChecksumMismatch,

    #[error("unexpected strkey version byte {found:#04x}, expected {expected:#04x}")]
    WrongVersion { expected: u8, found: u8 },
}
