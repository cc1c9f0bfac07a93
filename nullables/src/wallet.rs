//! Nullable signing wallet backed by a local key instead of a browser provider.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use paylink_crypto::KeyPair;
use paylink_horizon::NetworkClient;
use paylink_transactions::TransactionEnvelope;
use paylink_types::{AccountId, TransactionResult};
use paylink_wallet_core::{HorizonSubmitter, WalletBridge, WalletError};

/// What the simulated payer does when asked to sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignBehavior {
    Approve,
    Decline,
    /// The provider fails with this message.
    Fail(String),
    /// The prompt is left open forever.
    Hang,
}

/// A wallet bridge backed by an in-process key pair.
///
/// Signs envelopes for real, so submitted envelopes carry a verifiable
/// signature, and submits through a [`HorizonSubmitter`].
pub struct NullWallet {
    key: KeyPair,
    submitter: HorizonSubmitter,
    present: bool,
    grant_authorization: bool,
    authorized: AtomicBool,
    sign_behavior: SignBehavior,
    signature_requests: AtomicUsize,
}

impl NullWallet {
    pub fn new(key: KeyPair, network: Arc<dyn NetworkClient>) -> Self {
        Self {
            key,
            submitter: HorizonSubmitter::new(network),
            present: true,
            grant_authorization: true,
            authorized: AtomicBool::new(false),
            sign_behavior: SignBehavior::Approve,
            signature_requests: AtomicUsize::new(0),
        }
    }

    /// No provider installed.
    pub fn missing(mut self) -> Self {
        self.present = false;
        self
    }

    /// The payer refuses the authorization prompt.
    pub fn denying_authorization(mut self) -> Self {
        self.grant_authorization = false;
        self
    }

    pub fn with_sign_behavior(mut self, behavior: SignBehavior) -> Self {
        self.sign_behavior = behavior;
        self
    }

    pub fn address(&self) -> AccountId {
        self.key.account_id()
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.key.public_key()
    }

    pub fn signature_requests(&self) -> usize {
        self.signature_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletBridge for NullWallet {
    async fn is_provider_present(&self) -> bool {
        self.present
    }

    async fn request_authorization(&self) -> Result<(), WalletError> {
        if !self.present {
            return Err(WalletError::ProviderMissing);
        }
        if !self.grant_authorization {
            return Err(WalletError::AuthorizationDenied);
        }
        self.authorized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn active_address(&self) -> Result<AccountId, WalletError> {
        if !self.authorized.load(Ordering::SeqCst) {
            return Err(WalletError::NotAuthorized);
        }
        Ok(self.key.account_id())
    }

    async fn request_signature(
        &self,
        envelope: &TransactionEnvelope,
        network_passphrase: &str,
    ) -> Result<TransactionEnvelope, WalletError> {
        self.signature_requests.fetch_add(1, Ordering::SeqCst);
        if !self.authorized.load(Ordering::SeqCst) {
            return Err(WalletError::NotAuthorized);
        }
        match &self.sign_behavior {
            SignBehavior::Approve => {}
            SignBehavior::Decline => return Err(WalletError::UserDeclined),
            SignBehavior::Fail(msg) => return Err(WalletError::Provider(msg.clone())),
            SignBehavior::Hang => std::future::pending::<()>().await,
        }
        let provider = |e: paylink_transactions::TransactionError| WalletError::Provider(e.to_string());
        let mut signed = envelope.decode().map_err(provider)?;
        signed.sign(&self.key, network_passphrase).map_err(provider)?;
        signed.to_envelope().map_err(provider)
    }

    async fn submit(&self, signed: &TransactionEnvelope) -> Result<TransactionResult, WalletError> {
        self.submitter.submit(signed).await
    }
}
