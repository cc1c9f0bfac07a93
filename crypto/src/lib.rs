//! Cryptographic primitives for paylink.
//!
//! - **Ed25519** for signing and signature verification
//! - **SHA-256** for network ids and transaction hashes
//! - Strkey encoding (`G...` account ids, `S...` seeds): base32 + CRC16-XModem

pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;
pub mod strkey;

pub use error::CryptoError;
pub use hash::{network_id, sha256, transaction_hash};
pub use keys::KeyPair;
pub use sign::{signature_hint, verify_signature};
pub use strkey::{
    decode_account_id, decode_secret_seed, encode_account_id, encode_secret_seed,
    validate_account_id,
};
