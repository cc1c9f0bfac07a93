//! Shared collaborators for the payment operations.

use std::sync::Arc;

use paylink_horizon::NetworkClient;
use paylink_registry::{AssetRegistry, NetworkConfig, PaylinkConfig, RegistryError};
use paylink_types::{Clock, SystemClock};

use crate::intent::DEFAULT_ESCROW_RELEASE_SECS;
use crate::paths::DEFAULT_SLIPPAGE_PCT;

/// Network client, asset registry, network constants and clock, bundled so
/// each builder takes one argument for its environment.
///
/// Cheap to clone; the registry and client are shared.
#[derive(Clone)]
pub struct PaymentContext {
    pub network: Arc<dyn NetworkClient>,
    pub registry: Arc<AssetRegistry>,
    pub config: NetworkConfig,
    pub clock: Arc<dyn Clock>,
    /// Escrow delay used when the caller gives none.
    pub default_release_secs: u64,
    /// Path-payment slippage used when the caller gives none.
    pub slippage_pct: f64,
}

impl PaymentContext {
    pub fn new(
        network: Arc<dyn NetworkClient>,
        registry: Arc<AssetRegistry>,
        config: NetworkConfig,
    ) -> Self {
        Self {
            network,
            registry,
            config,
            clock: Arc::new(SystemClock),
            default_release_secs: DEFAULT_ESCROW_RELEASE_SECS,
            slippage_pct: DEFAULT_SLIPPAGE_PCT,
        }
    }

    /// Build a context from a loaded configuration file.
    pub fn from_config(
        config: &PaylinkConfig,
        network: Arc<dyn NetworkClient>,
    ) -> Result<Self, RegistryError> {
        let mut ctx = Self::new(network, Arc::new(config.asset_registry()?), config.network_config());
        ctx.default_release_secs = config.escrow_release_secs;
        ctx.slippage_pct = config.slippage_pct;
        Ok(ctx)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for PaymentContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentContext")
            .field("network", &self.config.network)
            .field("horizon_url", &self.config.horizon_url)
            .field("assets", &self.registry.len())
            .finish()
    }
}
