//! Typed views of network state returned by a [`NetworkClient`](crate::NetworkClient).

use paylink_transactions::{Claimant, SourceAccount};
use paylink_types::{AccountId, Amount, AssetRef, BalanceId, Timestamp};
use serde::{Deserialize, Serialize};

/// Account state loaded just before building a transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_id: AccountId,
    pub sequence: i64,
    pub balances: Vec<Balance>,
}

impl AccountInfo {
    pub fn source_account(&self) -> SourceAccount {
        SourceAccount::new(self.account_id.clone(), self.sequence)
    }

    /// Held amount of `asset`, or `None` when there is no trustline.
    pub fn balance_of(&self, asset: &AssetRef) -> Option<Amount> {
        self.balances
            .iter()
            .find(|b| &b.asset == asset)
            .map(|b| b.amount)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub asset: AssetRef,
    pub amount: Amount,
}

/// One conversion route returned by strict-receive path finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRecord {
    pub source_asset: AssetRef,
    /// What the sender must part with at the current book price.
    pub source_amount: Amount,
    /// Intermediate assets, excluding source and destination.
    pub path: Vec<AssetRef>,
}

/// Funds set aside on-ledger for one or more claimants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimableBalance {
    pub id: BalanceId,
    pub asset: AssetRef,
    pub amount: Amount,
    pub sponsor: Option<AccountId>,
    pub claimants: Vec<Claimant>,
    /// Close time of the creating ledger, when the source reports it.
    /// The network rewrites relative predicates to absolute ones at
    /// creation, so this is only needed for balances built locally.
    pub created_at: Option<Timestamp>,
}

impl ClaimableBalance {
    pub fn claimant(&self, account: &AccountId) -> Option<&Claimant> {
        self.claimants.iter().find(|c| &c.destination == account)
    }
}
