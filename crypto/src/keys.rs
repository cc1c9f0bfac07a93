//! Ed25519 key pairs.

use ed25519_dalek::{Signer, SigningKey};
use paylink_types::AccountId;

use crate::error::CryptoError;
use crate::strkey::{decode_secret_seed, encode_account_id, encode_secret_seed};

/// An Ed25519 key pair. The secret half is zeroized on drop by `ed25519-dalek`.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Derive a key pair from a 32-byte seed (deterministic).
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parse an `S...` secret seed.
    pub fn from_secret(secret: &str) -> Result<Self, CryptoError> {
        Ok(Self::from_seed(&decode_secret_seed(secret)?))
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The `G...` account id for this key.
    pub fn account_id(&self) -> AccountId {
        encode_account_id(&self.public_key())
    }

    pub fn secret(&self) -> String {
        encode_secret_seed(&self.signing_key.to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_seed_is_deterministic() {
        let a = KeyPair::from_seed(&[42u8; 32]);
        let b = KeyPair::from_seed(&[42u8; 32]);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.account_id(), b.account_id());
    }

    #[test]
    fn different_seeds_produce_different_accounts() {
        let a = KeyPair::from_seed(&[1u8; 32]);
        let b = KeyPair::from_seed(&[2u8; 32]);
        assert_ne!(a.account_id(), b.account_id());
    }

    #[test]
    fn secret_roundtrip() {
        let kp = KeyPair::from_seed(&[9u8; 32]);
        let restored = KeyPair::from_secret(&kp.secret()).unwrap();
        assert_eq!(restored.account_id(), kp.account_id());
    }
}
