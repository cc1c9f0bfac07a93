//! Transaction builders.
//!
//! Every builder follows the same order: validate input locally, resolve
//! assets through the registry, build the operations and check that the
//! ledger can encode them (account checksums included), load the source
//! account's current sequence, then assemble and encode. Nothing reaches the
//! network until local validation has passed.

use paylink_horizon::AccountInfo;
use paylink_transactions::{
    resolve_split_amounts, validate_split, verify_account, ClaimPredicate, Claimant, Operation,
    TransactionBuilder, TransactionEnvelope,
};
use paylink_types::{AccountId, Memo};

use crate::context::PaymentContext;
use crate::error::PaymentError;
use crate::intent::{
    check_amount, ClaimBalanceParams, EscrowParams, PathPaymentParams, PaymentIntent,
    SplitPaymentParams,
};
use crate::paths::{find_path, send_max};

async fn load_source(ctx: &PaymentContext, account: &AccountId) -> Result<AccountInfo, PaymentError> {
    Ok(ctx.network.load_account(account).await?)
}

/// Reject a source or operation the ledger would refuse to decode.
fn check_encodable(source: &AccountId, operations: &[Operation]) -> Result<(), PaymentError> {
    verify_account(source)?;
    for op in operations {
        op.validate()?;
    }
    Ok(())
}

fn assemble(
    ctx: &PaymentContext,
    account: &AccountInfo,
    operations: Vec<Operation>,
    memo: Option<&str>,
    timeout_secs: Option<u64>,
) -> Result<TransactionEnvelope, PaymentError> {
    let envelope = TransactionBuilder::new(&account.source_account(), ctx.config.base_fee)
        .add_operations(operations)
        .memo(memo.and_then(Memo::truncated))
        .set_timeout(timeout_secs.unwrap_or(ctx.config.timeout_secs))
        .build(ctx.clock.now())?;
    Ok(envelope)
}

/// Single payment of an exact amount.
pub async fn build_payment_transaction(
    ctx: &PaymentContext,
    intent: &PaymentIntent,
) -> Result<TransactionEnvelope, PaymentError> {
    check_amount(intent.amount, &ctx.config)?;
    let asset = ctx.registry.resolve(&intent.asset_symbol)?;
    let op = Operation::Payment {
        destination: intent.destination.clone(),
        asset,
        amount: intent.amount,
    };
    check_encodable(&intent.source, std::slice::from_ref(&op))?;

    let account = load_source(ctx, &intent.source).await?;
    let envelope = assemble(ctx, &account, vec![op], intent.memo.as_deref(), intent.timeout_secs)?;
    tracing::info!(
        source = %intent.source,
        destination = %intent.destination,
        amount = %intent.amount,
        asset = %intent.asset_symbol,
        "built payment transaction"
    );
    Ok(envelope)
}

/// One payment operation per recipient, all in one atomic envelope.
///
/// Split validation and amount resolution run before the source account is
/// loaded.
pub async fn build_split_payment_transaction(
    ctx: &PaymentContext,
    params: &SplitPaymentParams,
) -> Result<TransactionEnvelope, PaymentError> {
    let recipients = validate_split(&params.recipients)?;
    check_amount(params.total_amount, &ctx.config)?;
    let legs = resolve_split_amounts(&recipients, params.total_amount)?;
    let asset = ctx.registry.resolve(&params.asset_symbol)?;
    let operations = legs
        .into_iter()
        .map(|(destination, amount)| Operation::Payment {
            destination,
            asset: asset.clone(),
            amount,
        })
        .collect::<Vec<_>>();
    check_encodable(&params.source, &operations)?;

    let account = load_source(ctx, &params.source).await?;
    let count = operations.len();
    let envelope = assemble(ctx, &account, operations, params.memo.as_deref(), None)?;
    tracing::info!(
        source = %params.source,
        recipients = count,
        total = %params.total_amount,
        asset = %params.asset_symbol,
        "built split payment transaction"
    );
    Ok(envelope)
}

/// Lock funds in a claimable balance the claimant may take once the
/// release delay has passed.
pub async fn build_escrow_transaction(
    ctx: &PaymentContext,
    params: &EscrowParams,
) -> Result<TransactionEnvelope, PaymentError> {
    check_amount(params.amount, &ctx.config)?;
    let asset = ctx.registry.resolve(&params.asset_symbol)?;
    let release_after = params.release_after_secs.unwrap_or(ctx.default_release_secs);
    let op = Operation::CreateClaimableBalance {
        asset,
        amount: params.amount,
        claimants: vec![Claimant {
            destination: params.claimant.clone(),
            predicate: ClaimPredicate::claimable_after(release_after),
        }],
    };
    check_encodable(&params.source, std::slice::from_ref(&op))?;

    let account = load_source(ctx, &params.source).await?;
    let envelope = assemble(ctx, &account, vec![op], params.memo.as_deref(), None)?;
    tracing::info!(
        source = %params.source,
        claimant = %params.claimant,
        amount = %params.amount,
        release_after_secs = release_after,
        "built escrow transaction"
    );
    Ok(envelope)
}

/// Claim a balance into the claimer's account.
pub async fn build_claim_balance_transaction(
    ctx: &PaymentContext,
    params: &ClaimBalanceParams,
) -> Result<TransactionEnvelope, PaymentError> {
    let op = Operation::ClaimClaimableBalance {
        balance_id: params.balance_id.clone(),
    };
    check_encodable(&params.claimer, std::slice::from_ref(&op))?;

    let account = load_source(ctx, &params.claimer).await?;
    let envelope = assemble(ctx, &account, vec![op], None, None)?;
    tracing::info!(claimer = %params.claimer, balance_id = %params.balance_id, "built claim transaction");
    Ok(envelope)
}

/// Strict-receive path payment: the destination gets exactly
/// `dest_amount`, the payer spends at most the quoted amount plus slippage.
///
/// Paying in the destination asset needs no route, so the destination
/// amount is the basis for the spend cap. Between different assets a missing
/// route is [`PaymentError::NoPath`] and nothing is built.
pub async fn build_path_payment_transaction(
    ctx: &PaymentContext,
    params: &PathPaymentParams,
) -> Result<TransactionEnvelope, PaymentError> {
    check_amount(params.dest_amount, &ctx.config)?;
    let send_asset = ctx.registry.resolve(&params.send_symbol)?;
    let dest_asset = ctx.registry.resolve(&params.dest_symbol)?;
    let slippage = params.max_slippage_pct.unwrap_or(ctx.slippage_pct);
    verify_account(&params.source)?;
    verify_account(&params.destination)?;

    let quote = find_path(
        ctx,
        &params.send_symbol,
        &params.dest_symbol,
        params.dest_amount,
        &params.source,
    )
    .await?;
    let basis = if quote.available {
        quote.source_amount
    } else if send_asset == dest_asset {
        params.dest_amount
    } else {
        return Err(PaymentError::NoPath {
            send: params.send_symbol.clone(),
            dest: params.dest_symbol.clone(),
        });
    };
    let cap = send_max(basis, slippage)?;

    let op = Operation::PathPaymentStrictReceive {
        send_asset,
        send_max: cap,
        destination: params.destination.clone(),
        dest_asset,
        dest_amount: params.dest_amount,
        path: quote.path,
    };
    check_encodable(&params.source, std::slice::from_ref(&op))?;

    let account = load_source(ctx, &params.source).await?;
    let envelope = assemble(ctx, &account, vec![op], params.memo.as_deref(), None)?;
    tracing::info!(
        source = %params.source,
        destination = %params.destination,
        send = %params.send_symbol,
        dest = %params.dest_symbol,
        dest_amount = %params.dest_amount,
        send_max = %cap,
        quoted = quote.available,
        "built path payment transaction"
    );
    Ok(envelope)
}
