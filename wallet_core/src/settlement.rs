//! Settlement lookups by transaction hash.

use std::sync::Arc;

use paylink_horizon::NetworkClient;
use paylink_types::TransactionResult;

use crate::error::PaymentError;

/// Reports whether a submitted transaction made it into a ledger.
///
/// Lookups are idempotent and never retried here; polling is up to the caller.
#[derive(Clone)]
pub struct SettlementVerifier {
    network: Arc<dyn NetworkClient>,
}

impl SettlementVerifier {
    pub fn new(network: Arc<dyn NetworkClient>) -> Self {
        Self { network }
    }

    /// Fails with [`PaymentError::NotFound`] until the network knows the hash.
    pub async fn fetch_by_hash(&self, hash: &str) -> Result<TransactionResult, PaymentError> {
        Ok(self.network.fetch_transaction(hash).await?)
    }

    /// Like [`fetch_by_hash`](Self::fetch_by_hash), but any failure reads as "unknown".
    pub async fn transaction_status(&self, hash: &str) -> Option<TransactionResult> {
        match self.fetch_by_hash(hash).await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::debug!(hash, error = %e, "transaction status unavailable");
                None
            }
        }
    }
}
