//! Per-network endpoint, passphrase, fee and timeout constants.

use paylink_types::{Amount, NetworkId};
use serde::{Deserialize, Serialize};

pub const MAINNET_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

pub const MAINNET_HORIZON_URL: &str = "https://horizon.stellar.org";
pub const TESTNET_HORIZON_URL: &str = "https://horizon-testnet.stellar.org";

/// Fee per operation in stroops (0.001 XLM).
pub const DEFAULT_BASE_FEE: u32 = 10_000;

/// Envelope validity window.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Everything a builder needs to know about the target network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network: NetworkId,
    pub horizon_url: String,
    pub network_passphrase: String,
    /// Fee per operation, in stroops.
    pub base_fee: u32,
    pub timeout_secs: u64,
    /// Smallest amount a payment intent may carry.
    pub min_amount: Amount,
    /// Largest amount a payment intent may carry.
    pub max_amount: Amount,
}

impl NetworkConfig {
    /// Built-in constants for `network`.
    pub fn for_network(network: NetworkId) -> Self {
        let (horizon_url, network_passphrase) = match network {
            NetworkId::Mainnet => (MAINNET_HORIZON_URL, MAINNET_PASSPHRASE),
            NetworkId::Testnet => (TESTNET_HORIZON_URL, TESTNET_PASSPHRASE),
        };
        Self {
            network,
            horizon_url: horizon_url.to_string(),
            network_passphrase: network_passphrase.to_string(),
            base_fee: DEFAULT_BASE_FEE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_amount: Amount::from_stroops(100_000).unwrap_or(Amount::ZERO),
            max_amount: Amount::from_units(10_000).unwrap_or(Amount::MAX),
        }
    }

    pub fn is_mainnet(&self) -> bool {
        self.network == NetworkId::Mainnet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testnet_constants() {
        let cfg = NetworkConfig::for_network(NetworkId::Testnet);
        assert_eq!(cfg.horizon_url, TESTNET_HORIZON_URL);
        assert_eq!(cfg.network_passphrase, TESTNET_PASSPHRASE);
        assert_eq!(cfg.base_fee, 10_000);
        assert_eq!(cfg.timeout_secs, 300);
        assert!(!cfg.is_mainnet());
    }

    #[test]
    fn mainnet_constants() {
        let cfg = NetworkConfig::for_network(NetworkId::Mainnet);
        assert_eq!(cfg.horizon_url, MAINNET_HORIZON_URL);
        assert_eq!(cfg.network_passphrase, MAINNET_PASSPHRASE);
        assert!(cfg.is_mainnet());
    }

    #[test]
    fn amount_bounds() {
        let cfg = NetworkConfig::for_network(NetworkId::Testnet);
        assert_eq!(cfg.min_amount.to_string(), "0.0100000");
        assert_eq!(cfg.max_amount.to_string(), "10000.0000000");
    }
}
