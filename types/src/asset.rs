//! Ledger-native asset references.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::AccountId;
use crate::error::TypesError;

/// Longest asset code the ledger accepts (alphanum12).
pub const MAX_ASSET_CODE_LEN: usize = 12;

/// Either the chain's base currency or an asset identified by code + issuer.
///
/// Two references are equal iff the tag and every field match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRef {
    Native,
    Issued { code: String, issuer: AccountId },
}

impl AssetRef {
    /// Build an issued asset, validating the code (1-12 ASCII alphanumerics).
    pub fn issued(code: impl Into<String>, issuer: AccountId) -> Result<Self, TypesError> {
        let code = code.into();
        let valid = !code.is_empty()
            && code.len() <= MAX_ASSET_CODE_LEN
            && code.bytes().all(|b| b.is_ascii_alphanumeric());
        if !valid {
            return Err(TypesError::InvalidAssetCode(code));
        }
        Ok(Self::Issued { code, issuer })
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Asset code, `XLM` for the native asset.
    pub fn code(&self) -> &str {
        match self {
            Self::Native => "XLM",
            Self::Issued { code, .. } => code,
        }
    }

    pub fn issuer(&self) -> Option<&AccountId> {
        match self {
            Self::Native => None,
            Self::Issued { issuer, .. } => Some(issuer),
        }
    }

    /// Horizon's canonical query form: `native` or `CODE:ISSUER`.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Issued { code, issuer } => write!(f, "{code}:{issuer}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> AccountId {
        AccountId::parse("GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN").unwrap()
    }

    #[test]
    fn equality_is_structural() {
        let a = AssetRef::issued("USDC", issuer()).unwrap();
        let b = AssetRef::issued("USDC", issuer()).unwrap();
        let c = AssetRef::issued("EURC", issuer()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, AssetRef::Native);
    }

    #[test]
    fn rejects_bad_codes() {
        assert!(AssetRef::issued("", issuer()).is_err());
        assert!(AssetRef::issued("TOOLONGCODE13", issuer()).is_err());
        assert!(AssetRef::issued("US-D", issuer()).is_err());
    }

    #[test]
    fn canonical_form() {
        assert_eq!(AssetRef::Native.canonical(), "native");
        assert_eq!(AssetRef::Native.code(), "XLM");
        let usdc = AssetRef::issued("USDC", issuer()).unwrap();
        assert_eq!(
            usdc.canonical(),
            "USDC:GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN"
        );
    }
}
