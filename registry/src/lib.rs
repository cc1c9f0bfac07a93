//! Asset & network registry.
//!
//! Maps human currency symbols (`"USDC"`, `"XLM"`) to ledger asset
//! references and holds the per-network endpoint, fee and timeout
//! constants. Both are built once at startup from [`PaylinkConfig`] and are
//! read-only afterwards; callers share them behind an `Arc` and pass them
//! into the builders explicitly.

pub mod assets;
pub mod config;
pub mod error;
pub mod network;

pub use assets::{AssetInfo, AssetRegistry};
pub use config::{AssetEntry, PaylinkConfig};
pub use error::RegistryError;
pub use network::NetworkConfig;
