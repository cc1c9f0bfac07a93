//! Transaction bodies and their base64 XDR envelope form.
//!
//! The envelope is the only form that crosses a boundary: the builder
//! returns it unsigned, a signer returns it with signatures attached, and the
//! network client submits it. Application code treats it as an opaque string.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use paylink_crypto::{signature_hint, transaction_hash, verify_signature, KeyPair};
use paylink_types::{AccountId, Memo, Timestamp, TxHash};
use serde::{Deserialize, Serialize};
use std::fmt;
use stellar_xdr::curr::{Limits, ReadXdr, WriteXdr};

use crate::error::TransactionError;
use crate::operation::Operation;
use crate::xdr;

/// Validity window of a transaction, in Unix seconds. `max_time == 0` means unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

impl TimeBounds {
    pub fn contains(&self, now: Timestamp) -> bool {
        let t = now.as_secs();
        t >= self.min_time && (self.max_time == 0 || t <= self.max_time)
    }
}

/// An unsigned transaction body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub source: AccountId,
    /// Total fee in stroops (base fee × operation count).
    pub fee: u32,
    /// Must equal the source account's current sequence + 1 at submission.
    pub sequence: i64,
    pub time_bounds: TimeBounds,
    pub memo: Option<Memo>,
    pub operations: Vec<Operation>,
}

impl Transaction {
    /// XDR encoding of the body; the bytes that get hashed.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(xdr::transaction_to_xdr(self)?.to_xdr(Limits::none())?)
    }

    /// Network-specific hash; the payload every signer signs.
    pub fn hash(&self, network_passphrase: &str) -> Result<TxHash, TransactionError> {
        Ok(transaction_hash(network_passphrase, &self.to_bytes()?))
    }
}

/// A signature plus the hint identifying which key produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedSignature {
    pub hint: [u8; 4],
    pub signature: Vec<u8>,
}

/// A transaction with zero or more signatures; the decoded envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub tx: Transaction,
    pub signatures: Vec<DecoratedSignature>,
}

impl SignedTransaction {
    pub fn unsigned(tx: Transaction) -> Self {
        Self {
            tx,
            signatures: Vec::new(),
        }
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Sign the transaction hash for `network_passphrase` and attach the signature.
    pub fn sign(&mut self, key: &KeyPair, network_passphrase: &str) -> Result<(), TransactionError> {
        let hash = self.tx.hash(network_passphrase)?;
        let signature = key.sign(hash.as_bytes());
        self.signatures.push(DecoratedSignature {
            hint: signature_hint(&key.public_key()),
            signature: signature.to_vec(),
        });
        Ok(())
    }

    /// Whether some attached signature verifies for `public_key`.
    pub fn is_signed_by(&self, public_key: &[u8; 32], network_passphrase: &str) -> bool {
        let Ok(hash) = self.tx.hash(network_passphrase) else {
            return false;
        };
        let hint = signature_hint(public_key);
        self.signatures.iter().any(|sig| {
            let Ok(bytes) = <[u8; 64]>::try_from(sig.signature.as_slice()) else {
                return false;
            };
            sig.hint == hint && verify_signature(hash.as_bytes(), &bytes, public_key)
        })
    }

    pub fn to_envelope(&self) -> Result<TransactionEnvelope, TransactionError> {
        let bytes = xdr::envelope_to_xdr(self)?.to_xdr(Limits::none())?;
        Ok(TransactionEnvelope(STANDARD.encode(bytes)))
    }
}

/// Base64 of the XDR `TransactionEnvelope` (v1) for a [`SignedTransaction`].
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionEnvelope(String);

impl TransactionEnvelope {
    /// Wrap an envelope string received from a signer or the network.
    pub fn from_base64(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn decode(&self) -> Result<SignedTransaction, TransactionError> {
        let bytes = STANDARD
            .decode(self.0.as_bytes())
            .map_err(|e| TransactionError::Encoding(format!("base64: {e}")))?;
        let envelope = stellar_xdr::curr::TransactionEnvelope::from_xdr(bytes, Limits::none())?;
        xdr::envelope_from_xdr(&envelope)
    }

    /// Network hash of the enclosed transaction.
    pub fn hash(&self, network_passphrase: &str) -> Result<TxHash, TransactionError> {
        self.decode()?.tx.hash(network_passphrase)
    }
}

impl fmt::Debug for TransactionEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(16).collect();
        write!(f, "TransactionEnvelope({head}…, {} chars)", self.0.len())
    }
}

impl fmt::Display for TransactionEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
