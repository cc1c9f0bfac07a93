//! Nullable ledger network: scripted responses and recorded submissions.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use paylink_horizon::{
    AccountInfo, Balance, ClaimableBalance, HorizonError, NetworkClient, PathRecord,
};
use paylink_transactions::TransactionEnvelope;
use paylink_types::{AccountId, Amount, AssetRef, BalanceId, TransactionResult};

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, AccountInfo>,
    paths: Vec<PathRecord>,
    submit_script: VecDeque<Result<TransactionResult, HorizonError>>,
    transactions: HashMap<String, TransactionResult>,
    /// Lookups of a known hash that still answer `NotFound` first.
    pending_lookups: u32,
    claimable: Vec<ClaimableBalance>,
    unavailable: bool,
    submitted: Vec<TransactionEnvelope>,
    account_loads: usize,
    lookups: usize,
}

/// An in-memory ledger network for tests.
///
/// Accounts, path quotes, submission outcomes and claimable balances are
/// scripted up front; every call is recorded for assertions.
#[derive(Default)]
pub struct NullNetwork {
    state: Mutex<State>,
}

impl NullNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a funded account at `sequence` with no balances.
    pub fn with_account(self, account: &AccountId, sequence: i64) -> Self {
        self.state().accounts.insert(
            account.clone(),
            AccountInfo {
                account_id: account.clone(),
                sequence,
                balances: Vec::new(),
            },
        );
        self
    }

    /// Give a registered account a balance of `asset`.
    pub fn with_balance(self, account: &AccountId, asset: AssetRef, amount: Amount) -> Self {
        if let Some(info) = self.state().accounts.get_mut(account) {
            info.balances.push(Balance { asset, amount });
        }
        self
    }

    /// Path records returned by every path query, cheapest first.
    pub fn with_paths(self, paths: Vec<PathRecord>) -> Self {
        self.state().paths = paths;
        self
    }

    pub fn with_claimable_balance(self, balance: ClaimableBalance) -> Self {
        self.state().claimable.push(balance);
        self
    }

    /// A settled transaction the network already knows about.
    pub fn with_transaction(self, result: TransactionResult) -> Self {
        self.state().transactions.insert(result.hash.clone(), result);
        self
    }

    /// Queue the outcome of the next submission.
    pub fn script_submit(&self, outcome: Result<TransactionResult, HorizonError>) {
        self.state().submit_script.push_back(outcome);
    }

    /// Make the next `n` lookups of known hashes answer `NotFound`.
    pub fn delay_lookups(&self, n: u32) {
        self.state().pending_lookups = n;
    }

    /// Simulate a transport outage on every call.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// Envelopes passed to `submit_transaction`, in order.
    pub fn submitted(&self) -> Vec<TransactionEnvelope> {
        self.state().submitted.clone()
    }

    pub fn account_loads(&self) -> usize {
        self.state().account_loads
    }

    pub fn lookups(&self) -> usize {
        self.state().lookups
    }

    fn check_available(state: &State) -> Result<(), HorizonError> {
        if state.unavailable {
            Err(HorizonError::Unavailable("null network offline".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NetworkClient for NullNetwork {
    async fn load_account(&self, account: &AccountId) -> Result<AccountInfo, HorizonError> {
        let mut state = self.state();
        state.account_loads += 1;
        Self::check_available(&state)?;
        state
            .accounts
            .get(account)
            .cloned()
            .ok_or_else(|| HorizonError::AccountNotFound(account.to_string()))
    }

    async fn find_strict_receive_paths(
        &self,
        _source_account: &AccountId,
        _dest_asset: &AssetRef,
        _dest_amount: Amount,
    ) -> Result<Vec<PathRecord>, HorizonError> {
        let state = self.state();
        Self::check_available(&state)?;
        Ok(state.paths.clone())
    }

    async fn submit_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<TransactionResult, HorizonError> {
        let mut state = self.state();
        Self::check_available(&state)?;
        state.submitted.push(envelope.clone());
        let n = state.submitted.len();
        let outcome = state.submit_script.pop_front().unwrap_or_else(|| {
            Ok(TransactionResult {
                hash: format!("{n:064x}"),
                ledger: n as u32,
                successful: true,
            })
        });
        if let Ok(result) = &outcome {
            state.transactions.insert(result.hash.clone(), result.clone());
        }
        tracing::trace!(submissions = n, ok = outcome.is_ok(), "null network submit");
        outcome
    }

    async fn fetch_transaction(&self, hash: &str) -> Result<TransactionResult, HorizonError> {
        let mut state = self.state();
        state.lookups += 1;
        Self::check_available(&state)?;
        if state.pending_lookups > 0 {
            state.pending_lookups -= 1;
            return Err(HorizonError::NotFound(format!("transactions/{hash}")));
        }
        state
            .transactions
            .get(hash)
            .cloned()
            .ok_or_else(|| HorizonError::NotFound(format!("transactions/{hash}")))
    }

    async fn claimable_balances_for(
        &self,
        claimant: &AccountId,
    ) -> Result<Vec<ClaimableBalance>, HorizonError> {
        let state = self.state();
        Self::check_available(&state)?;
        Ok(state
            .claimable
            .iter()
            .filter(|b| b.claimant(claimant).is_some())
            .cloned()
            .collect())
    }

    async fn claimable_balance(&self, id: &BalanceId) -> Result<ClaimableBalance, HorizonError> {
        let state = self.state();
        Self::check_available(&state)?;
        state
            .claimable
            .iter()
            .find(|b| &b.id == id)
            .cloned()
            .ok_or_else(|| HorizonError::NotFound(format!("claimable_balances/{id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN";

    #[tokio::test]
    async fn scripted_account_and_outage() {
        let account = AccountId::parse(A).unwrap();
        let network = NullNetwork::new().with_account(&account, 7);
        assert_eq!(network.load_account(&account).await.unwrap().sequence, 7);
        network.set_unavailable(true);
        assert!(matches!(
            network.load_account(&account).await,
            Err(HorizonError::Unavailable(_))
        ));
        assert_eq!(network.account_loads(), 2);
    }

    #[tokio::test]
    async fn submitted_transactions_become_fetchable() {
        let network = NullNetwork::new();
        network.script_submit(Ok(TransactionResult {
            hash: "abc".into(),
            ledger: 100,
            successful: true,
        }));
        let envelope = TransactionEnvelope::from_base64("AAAA");
        let result = network.submit_transaction(&envelope).await.unwrap();
        assert_eq!(result.hash, "abc");
        network.delay_lookups(1);
        assert!(network.fetch_transaction("abc").await.is_err());
        assert_eq!(network.fetch_transaction("abc").await.unwrap().ledger, 100);
        assert_eq!(network.submitted().len(), 1);
    }
}
