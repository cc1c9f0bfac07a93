//! Network client trait and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use paylink_registry::PaylinkConfig;
use paylink_transactions::TransactionEnvelope;
use paylink_types::{AccountId, Amount, AssetRef, BalanceId, TransactionResult};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::HorizonError;
use crate::models::{AccountInfo, ClaimableBalance, PathRecord};
use crate::wire::{
    asset_query, Page, Problem, WireAccount, WireClaimableBalance, WirePath, WireTransaction,
};

/// Connection timeout for every request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Page size for claimable-balance listings.
const CLAIMABLE_PAGE_LIMIT: u32 = 200;

/// Everything the payment core asks of the ledger network.
///
/// Implementations never retry; callers decide whether and how often.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Current sequence number and balances. Fails with `AccountNotFound`
    /// for unfunded accounts.
    async fn load_account(&self, account: &AccountId) -> Result<AccountInfo, HorizonError>;

    /// Routes that deliver exactly `dest_amount` of `dest_asset`, paid from
    /// assets `source_account` holds, cheapest first.
    async fn find_strict_receive_paths(
        &self,
        source_account: &AccountId,
        dest_asset: &AssetRef,
        dest_amount: Amount,
    ) -> Result<Vec<PathRecord>, HorizonError>;

    /// Submit a signed envelope and wait for ledger inclusion.
    async fn submit_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<TransactionResult, HorizonError>;

    /// Look up a transaction by hex hash. Fails with `NotFound` if unknown.
    async fn fetch_transaction(&self, hash: &str) -> Result<TransactionResult, HorizonError>;

    /// Claimable balances naming `claimant`.
    async fn claimable_balances_for(
        &self,
        claimant: &AccountId,
    ) -> Result<Vec<ClaimableBalance>, HorizonError>;

    async fn claimable_balance(&self, id: &BalanceId) -> Result<ClaimableBalance, HorizonError>;
}

/// HTTP client for a Horizon-compatible endpoint.
#[derive(Clone, Debug)]
pub struct HorizonClient {
    http: reqwest::Client,
    base_url: String,
}

impl HorizonClient {
    /// Create a client for `base_url` (e.g. `https://horizon-testnet.stellar.org`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HorizonError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| HorizonError::Unavailable(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Client for the configured network's Horizon endpoint, honouring the
    /// `horizon_url` override and `http_timeout_secs`.
    pub fn from_config(config: &PaylinkConfig) -> Result<Self, HorizonError> {
        let network = config.network_config();
        tracing::debug!(
            url = %network.horizon_url,
            timeout_secs = config.http_timeout_secs,
            "creating horizon client"
        );
        Self::new(network.horizon_url, config.http_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, HorizonError> {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(HorizonError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(HorizonError::Unavailable(format!("{path} returned HTTP {status}")));
        }
        response
            .json()
            .await
            .map_err(|e| HorizonError::InvalidResponse(format!("{path}: {e}")))
    }
}

fn transport_error(e: reqwest::Error) -> HorizonError {
    if e.is_timeout() {
        HorizonError::Unavailable(format!("request timed out: {e}"))
    } else if e.is_connect() {
        HorizonError::Unavailable(format!("connection failed: {e}"))
    } else {
        HorizonError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl NetworkClient for HorizonClient {
    async fn load_account(&self, account: &AccountId) -> Result<AccountInfo, HorizonError> {
        let path = format!("accounts/{account}");
        let wire: WireAccount = match self.get_json(&path, &[]).await {
            Err(HorizonError::NotFound(_)) => {
                return Err(HorizonError::AccountNotFound(account.to_string()))
            }
            other => other?,
        };
        let info = wire.into_model()?;
        tracing::debug!(account = %account, sequence = info.sequence, "loaded account");
        Ok(info)
    }

    async fn find_strict_receive_paths(
        &self,
        source_account: &AccountId,
        dest_asset: &AssetRef,
        dest_amount: Amount,
    ) -> Result<Vec<PathRecord>, HorizonError> {
        let mut query = vec![("source_account".to_string(), source_account.to_string())];
        query.extend(asset_query("destination_", dest_asset));
        query.push(("destination_amount".to_string(), dest_amount.to_string()));

        let page: Page<WirePath> = self.get_json("paths/strict-receive", &query).await?;
        page.embedded
            .records
            .into_iter()
            .map(WirePath::into_model)
            .collect()
    }

    async fn submit_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<TransactionResult, HorizonError> {
        let response = self
            .http
            .post(self.url("transactions"))
            .form(&[("tx", envelope.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            let wire: WireTransaction = response
                .json()
                .await
                .map_err(|e| HorizonError::InvalidResponse(format!("transactions: {e}")))?;
            tracing::info!(hash = %wire.hash, ledger = wire.ledger, "transaction included");
            return Ok(wire.into());
        }
        if status == StatusCode::BAD_REQUEST {
            let problem: Problem = response.json().await.unwrap_or_default();
            let rejection = problem.into_rejection();
            tracing::warn!(%rejection, "transaction rejected");
            return Err(HorizonError::SubmissionRejected(rejection));
        }
        Err(HorizonError::Unavailable(format!("submit returned HTTP {status}")))
    }

    async fn fetch_transaction(&self, hash: &str) -> Result<TransactionResult, HorizonError> {
        let wire: WireTransaction = self.get_json(&format!("transactions/{hash}"), &[]).await?;
        Ok(wire.into())
    }

    async fn claimable_balances_for(
        &self,
        claimant: &AccountId,
    ) -> Result<Vec<ClaimableBalance>, HorizonError> {
        let query = [
            ("claimant".to_string(), claimant.to_string()),
            ("limit".to_string(), CLAIMABLE_PAGE_LIMIT.to_string()),
        ];
        let page: Page<WireClaimableBalance> = self.get_json("claimable_balances", &query).await?;
        page.embedded
            .records
            .into_iter()
            .map(WireClaimableBalance::into_model)
            .collect()
    }

    async fn claimable_balance(&self, id: &BalanceId) -> Result<ClaimableBalance, HorizonError> {
        let wire: WireClaimableBalance = self
            .get_json(&format!("claimable_balances/{id}"), &[])
            .await?;
        wire.into_model()
    }
}
