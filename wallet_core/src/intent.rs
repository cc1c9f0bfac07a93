//! Caller-supplied parameters for each builder.

use paylink_registry::NetworkConfig;
use paylink_transactions::SplitRecipientInput;
use paylink_types::{AccountId, Amount, BalanceId};
use serde::{Deserialize, Serialize};

use crate::error::PaymentError;

/// Escrow release delay when none is given: seven days.
pub const DEFAULT_ESCROW_RELEASE_SECS: u64 = 7 * SECS_PER_DAY;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// A single direct payment. Consumed by exactly one builder call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub source: AccountId,
    pub destination: AccountId,
    pub amount: Amount,
    pub asset_symbol: String,
    #[serde(default)]
    pub memo: Option<String>,
    /// Overrides the network's default validity window.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl PaymentIntent {
    pub fn new(
        source: AccountId,
        destination: AccountId,
        amount: Amount,
        asset_symbol: impl Into<String>,
    ) -> Self {
        Self {
            source,
            destination,
            amount,
            asset_symbol: asset_symbol.into(),
            memo: None,
            timeout_secs: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// One total divided among several recipients in a single envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitPaymentParams {
    pub source: AccountId,
    pub recipients: Vec<SplitRecipientInput>,
    pub total_amount: Amount,
    pub asset_symbol: String,
    #[serde(default)]
    pub memo: Option<String>,
}

/// Funds locked in a claimable balance for one claimant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EscrowParams {
    pub source: AccountId,
    pub claimant: AccountId,
    pub amount: Amount,
    pub asset_symbol: String,
    /// Seconds after creation before the claimant may claim. Defaults to
    /// the context's release delay.
    #[serde(default)]
    pub release_after_secs: Option<u64>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl EscrowParams {
    /// Set the release delay in whole days.
    pub fn release_after_days(mut self, days: u64) -> Self {
        self.release_after_secs = Some(days.saturating_mul(SECS_PER_DAY));
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBalanceParams {
    pub claimer: AccountId,
    pub balance_id: BalanceId,
}

/// Pay in one asset so the destination receives an exact amount of another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPaymentParams {
    pub source: AccountId,
    pub destination: AccountId,
    /// What the payer sends.
    pub send_symbol: String,
    /// What the destination receives.
    pub dest_symbol: String,
    /// Exact amount the destination must receive.
    pub dest_amount: Amount,
    /// Defaults to the context's slippage.
    #[serde(default)]
    pub max_slippage_pct: Option<f64>,
    #[serde(default)]
    pub memo: Option<String>,
}

/// Reject amounts outside the network's configured range.
pub(crate) fn check_amount(amount: Amount, config: &NetworkConfig) -> Result<(), PaymentError> {
    if amount < config.min_amount || amount > config.max_amount || amount.is_zero() {
        return Err(PaymentError::AmountOutOfRange {
            amount: amount.to_string(),
            min: config.min_amount.to_string(),
            max: config.max_amount.to_string(),
        });
    }
    Ok(())
}
