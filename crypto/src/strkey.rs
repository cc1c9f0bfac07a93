//! Strkey encoding for account ids and secret seeds.
//!
//! Format: base32(version_byte ‖ payload(32) ‖ crc16_xmodem_le(2)).
//!
//! 35 bytes encode to exactly 56 RFC 4648 base32 characters with no padding.
//! The version byte fixes the leading character: `6 << 3` yields `G`
//! (public account), `18 << 3` yields `S` (secret seed).

use paylink_types::AccountId;

use crate::error::CryptoError;

/// Base32 alphabet (RFC 4648, upper case).
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE32_ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

const VERSION_ACCOUNT_ID: u8 = 6 << 3;
const VERSION_SEED: u8 = 18 << 3;

/// version(1) + key(32) + checksum(2).
const RAW_LEN: usize = 35;
const ENCODED_LEN: usize = 56;

/// Encode a byte slice as unpadded base32.
fn encode_base32(bytes: &[u8]) -> String {
    let total_bits = bytes.len() * 8;
    let num_chars = total_bits.div_ceil(5);
    let mut result = String::with_capacity(num_chars);

    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

/// Decode unpadded base32 into a fixed-size array. `None` on invalid
/// characters or short input.
fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        if c >= 128 {
            return None;
        }
        let val = BASE32_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos < N {
                result[pos] = (buffer >> bits_in_buffer) as u8;
                pos += 1;
            }
        }
    }

    if pos < N {
        return None;
    }
    Some(result)
}

/// CRC16-XModem (poly 0x1021, init 0).
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

fn encode(version: u8, key: &[u8; 32]) -> String {
    let mut raw = [0u8; RAW_LEN];
    raw[0] = version;
    raw[1..33].copy_from_slice(key);
    let checksum = crc16_xmodem(&raw[..33]);
    raw[33..].copy_from_slice(&checksum.to_le_bytes());
    encode_base32(&raw)
}

fn decode(version: u8, encoded: &str) -> Result<[u8; 32], CryptoError> {
    if encoded.len() != ENCODED_LEN {
        return Err(CryptoError::InvalidStrkey(encoded.to_string()));
    }
    let raw: [u8; RAW_LEN] = decode_base32_fixed(encoded)
        .ok_or_else(|| CryptoError::InvalidStrkey(encoded.to_string()))?;

    if raw[0] != version {
        return Err(CryptoError::WrongVersion {
            expected: version,
            found: raw[0],
        });
    }
    let expected = crc16_xmodem(&raw[..33]).to_le_bytes();
    if raw[33..] != expected {
        return Err(CryptoError::ChecksumMismatch);
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&raw[1..33]);
    Ok(key)
}

/// Encode an Ed25519 public key as a `G...` account id.
pub fn encode_account_id(public_key: &[u8; 32]) -> AccountId {
    AccountId::parse(encode(VERSION_ACCOUNT_ID, public_key))
        .expect("version byte 6 << 3 always encodes to a G-prefixed 56-char id")
}

/// Extract the public key from an account id, verifying the checksum.
pub fn decode_account_id(account: &str) -> Result<[u8; 32], CryptoError> {
    decode(VERSION_ACCOUNT_ID, account)
}

/// Validate that an account id is well-formed and its checksum is correct.
pub fn validate_account_id(account: &str) -> bool {
    decode_account_id(account).is_ok()
}

/// Encode a 32-byte Ed25519 seed as an `S...` secret.
pub fn encode_secret_seed(seed: &[u8; 32]) -> String {
    encode(VERSION_SEED, seed)
}

pub fn decode_secret_seed(secret: &str) -> Result<[u8; 32], CryptoError> {
    decode(VERSION_SEED, secret)
}
