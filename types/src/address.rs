//! Ledger account id in strkey form (`G...`, 56 characters).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// A public ledger account id, always `G` followed by 55 base32 characters.
///
/// Only the shape is checked here. Checksum verification lives in
/// `paylink_crypto::decode_account_id`, which needs the CRC16 routine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// The version prefix for public account ids.
    pub const PREFIX: char = 'G';

    /// Total encoded length.
    pub const LEN: usize = 56;

    /// Parse and validate an account id.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if Self::is_well_formed(&s) {
            Ok(Self(s))
        } else {
            Err(TypesError::InvalidAddress(s))
        }
    }

    /// Whether `s` has the shape of an account id (prefix, length, base32 alphabet).
    pub fn is_well_formed(s: &str) -> bool {
        s.len() == Self::LEN
            && s.starts_with(Self::PREFIX)
            && s.bytes().all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}
