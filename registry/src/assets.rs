//! Symbol → asset mapping.

use std::collections::BTreeMap;

use paylink_types::{AccountId, AssetRef};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Circle's USDC issuing account.
pub const USDC_ISSUER: &str = "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN";

/// A supported currency and its ledger representation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub asset: AssetRef,
}

/// Read-only table of supported assets, keyed by upper-case symbol.
#[derive(Clone, Debug, Default)]
pub struct AssetRegistry {
    assets: BTreeMap<String, AssetInfo>,
}

impl AssetRegistry {
    /// The platform's built-in assets: `XLM` (native) and `USDC`.
    pub fn defaults() -> Self {
        let usdc_issuer = AccountId::parse(USDC_ISSUER).expect("built-in issuer is well-formed");
        let entries = [
            AssetInfo {
                symbol: "USDC".into(),
                name: "USD Coin".into(),
                decimals: 7,
                asset: AssetRef::Issued {
                    code: "USDC".into(),
                    issuer: usdc_issuer,
                },
            },
            AssetInfo {
                symbol: "XLM".into(),
                name: "Stellar Lumens".into(),
                decimals: 7,
                asset: AssetRef::Native,
            },
        ];
        Self::from_entries(entries)
    }

    /// Build a registry from explicit entries (later entries win).
    pub fn from_entries(entries: impl IntoIterator<Item = AssetInfo>) -> Self {
        let assets = entries
            .into_iter()
            .map(|info| (info.symbol.to_ascii_uppercase(), info))
            .collect();
        Self { assets }
    }

    /// Add or replace an entry. Only used while assembling the registry.
    pub fn with(mut self, info: AssetInfo) -> Self {
        self.assets.insert(info.symbol.to_ascii_uppercase(), info);
        self
    }

    /// Resolve a currency symbol (case-insensitive) to its asset reference.
    pub fn resolve(&self, symbol: &str) -> Result<AssetRef, RegistryError> {
        self.info(symbol)
            .map(|info| info.asset.clone())
            .ok_or_else(|| RegistryError::UnknownAsset(symbol.to_string()))
    }

    pub fn info(&self, symbol: &str) -> Option<&AssetInfo> {
        self.assets.get(&symbol.to_ascii_uppercase())
    }

    /// Reverse lookup: the symbol registered for `asset`, if any.
    pub fn symbol_for(&self, asset: &AssetRef) -> Option<&str> {
        self.assets
            .values()
            .find(|info| &info.asset == asset)
            .map(|info| info.symbol.as_str())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
