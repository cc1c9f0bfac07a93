//! SHA-256 hashing for network ids and transaction hashes.

use paylink_types::TxHash;
use sha2::{Digest, Sha256};

/// Envelope type discriminant mixed into the signature payload.
const ENVELOPE_TYPE_TX: u32 = 2;

/// Compute SHA-256 of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha256::digest(data));
    output
}

/// Network id: SHA-256 of the network passphrase.
pub fn network_id(passphrase: &str) -> [u8; 32] {
    sha256(passphrase.as_bytes())
}

/// Hash of an XDR-encoded transaction body for a given network.
///
/// `SHA-256(network_id ‖ ENVELOPE_TYPE_TX ‖ tx_bytes)`, the XDR encoding of
/// the ledger's signature payload. This is the value
/// signers sign, so the same body never verifies on another network.
pub fn transaction_hash(passphrase: &str, tx_bytes: &[u8]) -> TxHash {
    let mut hasher = Sha256::new();
    hasher.update(network_id(passphrase));
    hasher.update(ENVELOPE_TYPE_TX.to_be_bytes());
    hasher.update(tx_bytes);
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    TxHash::new(output)
}
