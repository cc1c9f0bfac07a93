//! Wallet bridge: the contract with an external signing provider.
//!
//! The provider holds the payer's keys and asks the payer to approve each
//! signature, so every call may suspend for as long as the payer takes.
//! No timeouts are applied here; the payment link's deadline bounds the
//! overall attempt.

use std::sync::Arc;

use async_trait::async_trait;
use paylink_horizon::NetworkClient;
use paylink_transactions::TransactionEnvelope;
use paylink_types::{AccountId, TransactionResult};

use crate::error::WalletError;

/// Request/response contract against a signing provider.
#[async_trait]
pub trait WalletBridge: Send + Sync {
    /// Whether a provider is installed. Never fails.
    async fn is_provider_present(&self) -> bool;

    /// Ask the payer to grant access. No-op when already granted.
    /// Fails with [`WalletError::AuthorizationDenied`] if refused.
    async fn request_authorization(&self) -> Result<(), WalletError>;

    /// Address of the authorized account. Fails with
    /// [`WalletError::NotAuthorized`] before authorization.
    async fn active_address(&self) -> Result<AccountId, WalletError>;

    /// Ask the payer to sign `envelope` for the given network. Closing the
    /// prompt surfaces as [`WalletError::UserDeclined`].
    async fn request_signature(
        &self,
        envelope: &TransactionEnvelope,
        network_passphrase: &str,
    ) -> Result<TransactionEnvelope, WalletError>;

    /// Send a signed envelope to the network.
    async fn submit(&self, signed: &TransactionEnvelope) -> Result<TransactionResult, WalletError>;
}

/// Discover the provider, obtain authorization and return the payer's address.
pub async fn connect_wallet(bridge: &dyn WalletBridge) -> Result<AccountId, WalletError> {
    if !bridge.is_provider_present().await {
        tracing::warn!("no signing provider present");
        return Err(WalletError::ProviderMissing);
    }
    bridge.request_authorization().await?;
    let address = bridge.active_address().await?;
    tracing::info!(address = %address, "wallet connected");
    Ok(address)
}

/// Sign `envelope` through the bridge and submit the result.
pub async fn sign_and_submit(
    bridge: &dyn WalletBridge,
    envelope: &TransactionEnvelope,
    network_passphrase: &str,
) -> Result<TransactionResult, WalletError> {
    let signed = bridge.request_signature(envelope, network_passphrase).await?;
    bridge.submit(&signed).await
}

/// Submission half of a bridge, backed by any [`NetworkClient`].
///
/// Bridge implementations whose provider only signs delegate `submit` here.
#[derive(Clone)]
pub struct HorizonSubmitter {
    network: Arc<dyn NetworkClient>,
}

impl HorizonSubmitter {
    pub fn new(network: Arc<dyn NetworkClient>) -> Self {
        Self { network }
    }

    pub async fn submit(&self, signed: &TransactionEnvelope) -> Result<TransactionResult, WalletError> {
        let result = self.network.submit_transaction(signed).await?;
        tracing::debug!(hash = %result.hash, ledger = result.ledger, "submitted signed envelope");
        Ok(result)
    }
}
