//! Account balance and claimable-balance queries.

use paylink_horizon::{ClaimableBalance, HorizonError};
use paylink_types::{AccountId, Amount, BalanceId};

use crate::context::PaymentContext;
use crate::error::PaymentError;

/// Held amount of the asset registered as `symbol`; zero without a trustline.
pub async fn get_account_balance(
    ctx: &PaymentContext,
    account: &AccountId,
    symbol: &str,
) -> Result<Amount, PaymentError> {
    let asset = ctx.registry.resolve(symbol)?;
    let info = ctx.network.load_account(account).await?;
    Ok(info.balance_of(&asset).unwrap_or(Amount::ZERO))
}

/// Whether the account is funded. Transport failures are still errors.
pub async fn account_exists(ctx: &PaymentContext, account: &AccountId) -> Result<bool, PaymentError> {
    match ctx.network.load_account(account).await {
        Ok(_) => Ok(true),
        Err(HorizonError::AccountNotFound(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Claimable balances naming `claimant`, e.g. escrows awaiting release.
pub async fn list_claimable_balances(
    ctx: &PaymentContext,
    claimant: &AccountId,
) -> Result<Vec<ClaimableBalance>, PaymentError> {
    let balances = ctx.network.claimable_balances_for(claimant).await?;
    tracing::debug!(claimant = %claimant, count = balances.len(), "listed claimable balances");
    Ok(balances)
}

/// Whether `claimer` may claim `balance_id` right now.
///
/// A balance whose creation time is unknown is evaluated as if created now,
/// so relative "claimable after" predicates read as not yet open.
pub async fn is_balance_claimable(
    ctx: &PaymentContext,
    balance_id: &BalanceId,
    claimer: &AccountId,
) -> Result<bool, PaymentError> {
    let balance = ctx.network.claimable_balance(balance_id).await?;
    let now = ctx.clock.now();
    let Some(claimant) = balance.claimant(claimer) else {
        return Ok(false);
    };
    Ok(claimant
        .predicate
        .is_satisfied(balance.created_at.unwrap_or(now), now))
}
