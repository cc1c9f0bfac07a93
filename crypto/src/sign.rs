//! Ed25519 signature verification and signature hints.

use ed25519_dalek::{Verifier, VerifyingKey};

/// Last four bytes of the public key; lets the network match a signature
/// to a signer without trying every key.
pub fn signature_hint(public_key: &[u8; 32]) -> [u8; 4] {
    let mut hint = [0u8; 4];
    hint.copy_from_slice(&public_key[28..]);
    hint
}

/// Verify a signature against a message and public key.
///
/// Returns `true` if the signature is valid, `false` otherwise.
pub fn verify_signature(message: &[u8], signature: &[u8; 64], public_key: &[u8; 32]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(signature);
    verifying_key.verify(message, &dalek_sig).is_ok()
}
