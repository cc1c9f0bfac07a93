//! Paylink configuration with TOML file support.

use std::time::Duration;

use paylink_types::{AccountId, Amount, AssetRef, NetworkId};
use paylink_utils::{LogFormat, LoggingError};
use serde::{Deserialize, Serialize};

use crate::assets::{AssetInfo, AssetRegistry};
use crate::error::RegistryError;
use crate::network::{NetworkConfig, DEFAULT_BASE_FEE, DEFAULT_TIMEOUT_SECS};

/// Environment variable selecting mainnet vs testnet.
pub const NETWORK_ENV_VAR: &str = "PAYLINK_NETWORK";

/// Configuration for the payment core.
///
/// Can be loaded from a TOML file via [`PaylinkConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaylinkConfig {
    /// Which network to build transactions for.
    #[serde(default)]
    pub network: NetworkId,

    /// Override for the Horizon endpoint (defaults per network).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_url: Option<String>,

    /// Fee per operation, in stroops.
    #[serde(default = "default_base_fee")]
    pub base_fee: u32,

    /// Envelope validity window in seconds.
    #[serde(default = "default_tx_timeout_secs")]
    pub tx_timeout_secs: u64,

    #[serde(default = "default_min_amount")]
    pub min_amount: Amount,

    #[serde(default = "default_max_amount")]
    pub max_amount: Amount,

    /// Slippage margin applied to path-payment quotes, in percent.
    #[serde(default = "default_slippage_pct")]
    pub slippage_pct: f64,

    /// Default escrow release delay in seconds.
    #[serde(default = "default_escrow_release_secs")]
    pub escrow_release_secs: u64,

    /// Number of settlement lookups after a submission before giving up.
    #[serde(default = "default_confirm_attempts")]
    pub confirm_attempts: u32,

    /// Delay between settlement lookups, in milliseconds.
    #[serde(default = "default_confirm_interval_ms")]
    pub confirm_interval_ms: u64,

    /// Period of the payment-link expiry check, in milliseconds.
    #[serde(default = "default_expiry_tick_ms")]
    pub expiry_tick_ms: u64,

    /// HTTP request timeout for the Horizon client, in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Extra assets on top of the built-in XLM and USDC.
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
}

/// One `[[assets]]` table in the config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub symbol: String,
    pub code: String,
    /// Omit for the native asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_base_fee() -> u32 {
    DEFAULT_BASE_FEE
}

fn default_tx_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_min_amount() -> Amount {
    Amount::from_stroops(100_000).unwrap_or(Amount::ZERO)
}

fn default_max_amount() -> Amount {
    Amount::from_units(10_000).unwrap_or(Amount::MAX)
}

fn default_slippage_pct() -> f64 {
    5.0
}

fn default_escrow_release_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_confirm_attempts() -> u32 {
    5
}

fn default_confirm_interval_ms() -> u64 {
    1_000
}

fn default_expiry_tick_ms() -> u64 {
    1_000
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_decimals() -> u8 {
    7
}

// ── Impl ───────────────────────────────────────────────────────────────

impl PaylinkConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, RegistryError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RegistryError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, RegistryError> {
        toml::from_str(s).map_err(|e| RegistryError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("PaylinkConfig is always serializable to TOML")
    }

    /// Apply `PAYLINK_NETWORK` if set.
    pub fn with_env_overrides(self) -> Result<Self, RegistryError> {
        self.with_network_override(std::env::var(NETWORK_ENV_VAR).ok().as_deref())
    }

    /// Apply a network override value (the env var's content, if present).
    pub fn with_network_override(mut self, value: Option<&str>) -> Result<Self, RegistryError> {
        if let Some(raw) = value {
            self.network = raw
                .parse()
                .map_err(|e: paylink_types::TypesError| RegistryError::Config(e.to_string()))?;
            tracing::debug!(network = %self.network, "network selected from environment");
        }
        Ok(self)
    }

    /// Network constants with this config's overrides applied.
    pub fn network_config(&self) -> NetworkConfig {
        let mut net = NetworkConfig::for_network(self.network);
        if let Some(url) = &self.horizon_url {
            net.horizon_url = url.clone();
        }
        net.base_fee = self.base_fee;
        net.timeout_secs = self.tx_timeout_secs;
        net.min_amount = self.min_amount;
        net.max_amount = self.max_amount;
        net
    }

    /// Install the global subscriber with `log_format` and `log_level`.
    /// `RUST_LOG`, when set, takes precedence over the level.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        paylink_utils::init_logging(self.log_format, &self.log_level)
    }

    /// Delay between settlement lookups.
    pub fn confirm_interval(&self) -> Duration {
        Duration::from_millis(self.confirm_interval_ms)
    }

    /// Period of the payment-link expiry check.
    pub fn expiry_tick(&self) -> Duration {
        Duration::from_millis(self.expiry_tick_ms)
    }

    /// Request timeout for the Horizon client.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Built-in assets plus the `[[assets]]` entries from the file.
    pub fn asset_registry(&self) -> Result<AssetRegistry, RegistryError> {
        let mut registry = AssetRegistry::defaults();
        for entry in &self.assets {
            registry = registry.with(entry.to_info()?);
        }
        Ok(registry)
    }
}

impl AssetEntry {
    fn to_info(&self) -> Result<AssetInfo, RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidAsset {
            symbol: self.symbol.clone(),
            reason,
        };
        let asset = match &self.issuer {
            None => AssetRef::Native,
            Some(issuer) => {
                let issuer = AccountId::parse(issuer.as_str()).map_err(|e| invalid(e.to_string()))?;
                AssetRef::issued(self.code.as_str(), issuer).map_err(|e| invalid(e.to_string()))?
            }
        };
        Ok(AssetInfo {
            symbol: self.symbol.clone(),
            name: if self.name.is_empty() {
                self.code.clone()
            } else {
                self.name.clone()
            },
            decimals: self.decimals,
            asset,
        })
    }
}

impl Default for PaylinkConfig {
    fn default() -> Self {
        Self {
            network: NetworkId::default(),
            horizon_url: None,
            base_fee: default_base_fee(),
            tx_timeout_secs: default_tx_timeout_secs(),
            min_amount: default_min_amount(),
            max_amount: default_max_amount(),
            slippage_pct: default_slippage_pct(),
            escrow_release_secs: default_escrow_release_secs(),
            confirm_attempts: default_confirm_attempts(),
            confirm_interval_ms: default_confirm_interval_ms(),
            expiry_tick_ms: default_expiry_tick_ms(),
            http_timeout_secs: default_http_timeout_secs(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            assets: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = PaylinkConfig::default();
        let toml_str = config.to_toml_string();
        let parsed = PaylinkConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.base_fee, config.base_fee);
        assert_eq!(parsed.max_amount, config.max_amount);
        assert_eq!(parsed.network, config.network);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = PaylinkConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.network, NetworkId::Testnet);
        assert_eq!(config.base_fee, 10_000);
        assert_eq!(config.tx_timeout_secs, 300);
        assert_eq!(config.escrow_release_secs, 604_800);
        assert_eq!(config.log_format, LogFormat::Human);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            network = "mainnet"
            base_fee = 200
            slippage_pct = 1.5
            log_format = "json"
        "#;
        let config = PaylinkConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.network, NetworkId::Mainnet);
        assert_eq!(config.base_fee, 200);
        assert!((config.slippage_pct - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.confirm_attempts, 5); // default

        let net = config.network_config();
        assert!(net.is_mainnet());
        assert_eq!(net.base_fee, 200);
    }

    #[test]
    fn extra_assets_extend_registry() {
        let toml = r#"
            [[assets]]
            symbol = "EURC"
            code = "EURC"
            issuer = "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN"
            name = "Euro Coin"
        "#;
        let config = PaylinkConfig::from_toml_str(toml).unwrap();
        let registry = config.asset_registry().unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.resolve("EURC").unwrap().code(), "EURC");
        assert_eq!(registry.info("EURC").unwrap().name, "Euro Coin");
    }

    #[test]
    fn bad_asset_issuer_is_reported() {
        let toml = r#"
            [[assets]]
            symbol = "BAD"
            code = "BAD"
            issuer = "nope"
        "#;
        let config = PaylinkConfig::from_toml_str(toml).unwrap();
        assert!(matches!(
            config.asset_registry(),
            Err(RegistryError::InvalidAsset { symbol, .. }) if symbol == "BAD"
        ));
    }

    #[test]
    fn network_override() {
        let config = PaylinkConfig::default()
            .with_network_override(Some("mainnet"))
            .unwrap();
        assert_eq!(config.network, NetworkId::Mainnet);
        assert!(PaylinkConfig::default()
            .with_network_override(Some("moon"))
            .is_err());
        let untouched = PaylinkConfig::default().with_network_override(None).unwrap();
        assert_eq!(untouched.network, NetworkId::Testnet);
    }

    #[test]
    fn timing_fields_become_durations() {
        let toml = r#"
            confirm_interval_ms = 250
            expiry_tick_ms = 500
            http_timeout_secs = 12
        "#;
        let config = PaylinkConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.confirm_interval(), Duration::from_millis(250));
        assert_eq!(config.expiry_tick(), Duration::from_millis(500));
        assert_eq!(config.http_timeout(), Duration::from_secs(12));

        let defaults = PaylinkConfig::default();
        assert_eq!(defaults.expiry_tick(), Duration::from_secs(1));
        assert_eq!(defaults.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn logging_uses_configured_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = PaylinkConfig::from_toml_str(r#"log_level = "paylink=loudest""#).unwrap();
        assert!(matches!(config.init_logging(), Err(LoggingError::InvalidFilter(level)) if level == "paylink=loudest"));
    }

    #[test]
    fn horizon_url_override() {
        let config = PaylinkConfig::from_toml_str(r#"horizon_url = "http://localhost:8000""#).unwrap();
        assert_eq!(config.network_config().horizon_url, "http://localhost:8000");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "confirm_attempts = 9").unwrap();
        let config = PaylinkConfig::from_toml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.confirm_attempts, 9);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = PaylinkConfig::from_toml_file("/nonexistent/paylink.toml");
        assert!(matches!(result, Err(RegistryError::Config(_))));
    }
}
