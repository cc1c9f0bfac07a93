//! Builder behaviour against the nullable network.

use std::sync::Arc;

use paylink_crypto::KeyPair;
use paylink_horizon::{ClaimableBalance, PathRecord};
use paylink_nullables::{NullClock, NullNetwork};
use paylink_registry::{AssetRegistry, NetworkConfig, RegistryError};
use paylink_transactions::{
    ClaimPredicate, Claimant, Operation, SplitRecipientInput, TransactionError, TransactionEnvelope,
};
use paylink_types::{AccountId, Amount, AssetRef, BalanceId, NetworkId};
use paylink_wallet_core::{
    account_exists, build_claim_balance_transaction, build_escrow_transaction,
    build_path_payment_transaction, build_payment_transaction, build_split_payment_transaction,
    find_path, get_account_balance, is_balance_claimable, list_claimable_balances,
    ClaimBalanceParams, EscrowParams, PathPaymentParams, PaymentContext, PaymentError,
    PaymentIntent, SplitPaymentParams,
};

const NOW: u64 = 1_700_000_000;

fn account(seed: u8) -> AccountId {
    KeyPair::from_seed(&[seed; 32]).account_id()
}

fn amt(s: &str) -> Amount {
    Amount::parse(s).unwrap()
}

fn context(network: Arc<NullNetwork>) -> PaymentContext {
    PaymentContext::new(
        network,
        Arc::new(AssetRegistry::defaults()),
        NetworkConfig::for_network(NetworkId::Testnet),
    )
    .with_clock(Arc::new(NullClock::new(NOW)))
}

fn funded(sequence: i64) -> (Arc<NullNetwork>, AccountId) {
    let source = account(1);
    (Arc::new(NullNetwork::new().with_account(&source, sequence)), source)
}

fn operations(envelope: &TransactionEnvelope) -> Vec<Operation> {
    envelope.decode().unwrap().tx.operations
}

fn usdc() -> AssetRef {
    AssetRegistry::defaults().resolve("USDC").unwrap()
}

#[tokio::test]
async fn payment_has_one_operation_with_exact_amount_and_asset() {
    let (network, source) = funded(41);
    let ctx = context(network.clone());
    let intent = PaymentIntent::new(source, account(2), amt("50.00"), "USDC");

    let envelope = build_payment_transaction(&ctx, &intent).await.unwrap();
    let signed = envelope.decode().unwrap();
    assert!(!signed.is_signed());
    assert_eq!(signed.tx.sequence, 42);
    assert_eq!(signed.tx.fee, 10_000);
    assert_eq!(signed.tx.time_bounds.max_time, NOW + 300);
    assert_eq!(
        signed.tx.operations,
        vec![Operation::Payment {
            destination: account(2),
            asset: usdc(),
            amount: amt("50"),
        }]
    );
}

#[tokio::test]
async fn long_memo_is_truncated_to_28_bytes() {
    let (network, source) = funded(1);
    let ctx = context(network);
    let memo = "a".repeat(40);
    let intent = PaymentIntent::new(source, account(2), amt("1"), "XLM").with_memo(memo.clone());

    let envelope = build_payment_transaction(&ctx, &intent).await.unwrap();
    let tx = envelope.decode().unwrap().tx;
    assert_eq!(tx.memo.unwrap().as_str(), &memo[..28]);
}

#[tokio::test]
async fn unfunded_source_is_account_not_found() {
    let network = Arc::new(NullNetwork::new());
    let ctx = context(network);
    let intent = PaymentIntent::new(account(9), account(2), amt("1"), "XLM");
    assert!(matches!(
        build_payment_transaction(&ctx, &intent).await,
        Err(PaymentError::AccountNotFound(_))
    ));
}

#[tokio::test]
async fn outage_is_network_unavailable() {
    let (network, source) = funded(1);
    network.set_unavailable(true);
    let ctx = context(network);
    let intent = PaymentIntent::new(source, account(2), amt("1"), "XLM");
    assert!(matches!(
        build_payment_transaction(&ctx, &intent).await,
        Err(PaymentError::NetworkUnavailable(_))
    ));
}

#[tokio::test]
async fn unknown_asset_fails_before_loading_account() {
    let (network, source) = funded(1);
    let ctx = context(network.clone());
    let intent = PaymentIntent::new(source, account(2), amt("1"), "DOGE");
    assert!(matches!(
        build_payment_transaction(&ctx, &intent).await,
        Err(PaymentError::Registry(RegistryError::UnknownAsset(_)))
    ));
    assert_eq!(network.account_loads(), 0);
}

#[tokio::test]
async fn amount_outside_bounds_is_rejected() {
    let (network, source) = funded(1);
    let ctx = context(network.clone());
    let intent = PaymentIntent::new(source, account(2), amt("10000.01"), "XLM");
    assert!(matches!(
        build_payment_transaction(&ctx, &intent).await,
        Err(PaymentError::AmountOutOfRange { .. })
    ));
    assert_eq!(network.account_loads(), 0);
}

fn pct(seed: u8, p: f64) -> SplitRecipientInput {
    SplitRecipientInput {
        address: account(seed).to_string(),
        description: format!("recipient {seed}"),
        amount: None,
        percentage: Some(p),
    }
}

#[tokio::test]
async fn split_builds_one_payment_per_recipient() {
    let (network, source) = funded(10);
    let ctx = context(network);
    let params = SplitPaymentParams {
        source,
        recipients: vec![pct(2, 60.0), pct(3, 40.0)],
        total_amount: amt("100"),
        asset_symbol: "XLM".into(),
        memo: Some("team payout".into()),
    };

    let envelope = build_split_payment_transaction(&ctx, &params).await.unwrap();
    let tx = envelope.decode().unwrap().tx;
    assert_eq!(tx.operations.len(), 2);
    assert_eq!(tx.fee, 20_000);
    let amounts: Vec<_> = tx
        .operations
        .iter()
        .map(|op| op.outgoing_amount().unwrap())
        .collect();
    assert_eq!(amounts, vec![amt("60.00"), amt("40.00")]);
}

#[tokio::test]
async fn invalid_split_never_touches_network() {
    let (network, source) = funded(10);
    let ctx = context(network.clone());
    let params = SplitPaymentParams {
        source,
        recipients: vec![pct(2, 50.0), pct(3, 40.0)],
        total_amount: amt("100"),
        asset_symbol: "XLM".into(),
        memo: None,
    };
    assert!(matches!(
        build_split_payment_transaction(&ctx, &params).await,
        Err(PaymentError::Transaction(TransactionError::InvalidSplitConfig(_)))
    ));
    assert_eq!(network.account_loads(), 0);
}

#[tokio::test]
async fn oversubscribed_split_overflows() {
    let (network, source) = funded(10);
    let ctx = context(network.clone());
    let fixed = |seed: u8, s: &str| SplitRecipientInput {
        address: account(seed).to_string(),
        description: String::new(),
        amount: Some(amt(s)),
        percentage: None,
    };
    let params = SplitPaymentParams {
        source,
        recipients: vec![fixed(2, "70"), fixed(3, "40")],
        total_amount: amt("100"),
        asset_symbol: "XLM".into(),
        memo: None,
    };
    assert!(matches!(
        build_split_payment_transaction(&ctx, &params).await,
        Err(PaymentError::Transaction(TransactionError::SplitOverflow { .. }))
    ));
    assert_eq!(network.account_loads(), 0);
}

fn escrow(source: AccountId) -> EscrowParams {
    EscrowParams {
        source,
        claimant: account(2),
        amount: amt("25"),
        asset_symbol: "USDC".into(),
        release_after_secs: None,
        memo: None,
    }
}

#[tokio::test]
async fn escrow_defaults_to_seven_days() {
    let (network, source) = funded(3);
    let ctx = context(network);

    let explicit = build_escrow_transaction(&ctx, &escrow(source.clone()).release_after_days(7))
        .await
        .unwrap();
    let default = build_escrow_transaction(&ctx, &escrow(source)).await.unwrap();

    for envelope in [explicit, default] {
        let ops = operations(&envelope);
        assert_eq!(ops.len(), 1);
        let Operation::CreateClaimableBalance { claimants, amount, asset } = &ops[0] else {
            panic!("expected a claimable balance, got {:?}", ops[0]);
        };
        assert_eq!(*amount, amt("25"));
        assert_eq!(*asset, usdc());
        assert_eq!(claimants.len(), 1);
        assert_eq!(claimants[0].destination, account(2));
        assert_eq!(claimants[0].predicate.release_after_secs(), Some(604_800));
    }
}

#[tokio::test]
async fn claim_references_balance_id() {
    let claimer = account(2);
    let network = Arc::new(NullNetwork::new().with_account(&claimer, 5));
    let ctx = context(network);
    let balance_id =
        BalanceId::parse("00000000da0d57da7d4850e7fc10d2a9d0ebc731f7afb40574c03395b17d49149b91f5be").unwrap();
    let params = ClaimBalanceParams {
        claimer,
        balance_id: balance_id.clone(),
    };
    let envelope = build_claim_balance_transaction(&ctx, &params).await.unwrap();
    assert_eq!(
        operations(&envelope),
        vec![Operation::ClaimClaimableBalance { balance_id }]
    );
}

fn path_params(source: AccountId) -> PathPaymentParams {
    PathPaymentParams {
        source,
        destination: account(2),
        send_symbol: "XLM".into(),
        dest_symbol: "USDC".into(),
        dest_amount: amt("50"),
        max_slippage_pct: None,
        memo: None,
    }
}

#[tokio::test]
async fn path_payment_uses_quote_plus_slippage() {
    let source = account(1);
    let network = Arc::new(NullNetwork::new().with_account(&source, 1).with_paths(vec![
        PathRecord {
            source_asset: usdc(),
            source_amount: amt("50"),
            path: vec![],
        },
        PathRecord {
            source_asset: AssetRef::Native,
            source_amount: amt("400"),
            path: vec![],
        },
    ]));
    let ctx = context(network);

    let quote = find_path(&ctx, "XLM", "USDC", amt("50"), &source).await.unwrap();
    assert!(quote.available);
    assert_eq!(quote.source_amount, amt("400"));

    let envelope = build_path_payment_transaction(&ctx, &path_params(source)).await.unwrap();
    let Operation::PathPaymentStrictReceive { send_max, dest_amount, send_asset, .. } =
        &operations(&envelope)[0]
    else {
        panic!("expected a path payment");
    };
    assert_eq!(*send_asset, AssetRef::Native);
    assert_eq!(*dest_amount, amt("50"));
    assert_eq!(*send_max, amt("420"));
}

#[tokio::test]
async fn path_payment_without_route_is_no_path() {
    let (network, source) = funded(1);
    let ctx = context(network.clone());

    let quote = find_path(&ctx, "XLM", "USDC", amt("50"), &source).await.unwrap();
    assert!(!quote.available);
    assert!(quote.source_amount.is_zero());

    let err = build_path_payment_transaction(&ctx, &path_params(source))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        PaymentError::NoPath {
            send: "XLM".into(),
            dest: "USDC".into(),
        }
    );
    assert_eq!(network.account_loads(), 0);
    assert!(network.submitted().is_empty());
}

#[tokio::test]
async fn same_asset_path_payment_caps_at_destination_amount() {
    let (network, source) = funded(1);
    let ctx = context(network);

    let mut params = path_params(source);
    params.send_symbol = "USDC".into();
    params.max_slippage_pct = Some(2.0);
    let envelope = build_path_payment_transaction(&ctx, &params).await.unwrap();
    let Operation::PathPaymentStrictReceive { send_max, path, .. } = &operations(&envelope)[0] else {
        panic!("expected a path payment");
    };
    assert_eq!(*send_max, amt("51"));
    assert!(path.is_empty());
}

#[tokio::test]
async fn path_lookup_runs_before_source_account_loads() {
    let network = Arc::new(NullNetwork::new());
    let ctx = context(network.clone());

    let err = build_path_payment_transaction(&ctx, &path_params(account(9)))
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::NoPath { .. }));
    assert_eq!(network.account_loads(), 0);

    network.set_unavailable(true);
    assert!(matches!(
        build_path_payment_transaction(&ctx, &path_params(account(9))).await,
        Err(PaymentError::NetworkUnavailable(_))
    ));
    assert_eq!(network.account_loads(), 0);
}

/// The Circle issuer with its checksum character altered.
fn corrupted_account() -> AccountId {
    let good = "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN";
    AccountId::parse(format!("{}A", &good[..55])).unwrap()
}

#[tokio::test]
async fn bad_checksum_destination_fails_before_loading_account() {
    let (network, source) = funded(1);
    let ctx = context(network.clone());
    let intent = PaymentIntent::new(source, corrupted_account(), amt("1"), "XLM");

    let err = build_payment_transaction(&ctx, &intent).await.unwrap_err();
    assert_eq!(
        err,
        PaymentError::Transaction(TransactionError::InvalidAccount(corrupted_account().to_string()))
    );
    assert_eq!(err.category(), paylink_wallet_core::ErrorCategory::Validation);
    assert_eq!(network.account_loads(), 0);
}

#[tokio::test]
async fn bad_checksum_anywhere_is_rejected_locally() {
    let (network, source) = funded(1);
    let ctx = context(network.clone());

    let mut recipient = pct(3, 50.0);
    recipient.address = corrupted_account().to_string();
    let split = SplitPaymentParams {
        source: source.clone(),
        recipients: vec![pct(2, 50.0), recipient],
        total_amount: amt("10"),
        asset_symbol: "XLM".into(),
        memo: None,
    };
    assert!(matches!(
        build_split_payment_transaction(&ctx, &split).await,
        Err(PaymentError::Transaction(TransactionError::InvalidSplitConfig(_)))
    ));

    let mut held = escrow(source.clone());
    held.claimant = corrupted_account();
    assert!(matches!(
        build_escrow_transaction(&ctx, &held).await,
        Err(PaymentError::Transaction(TransactionError::InvalidAccount(_)))
    ));

    let claim = ClaimBalanceParams {
        claimer: corrupted_account(),
        balance_id: BalanceId::parse(format!("00000000{}", "11".repeat(32))).unwrap(),
    };
    assert!(matches!(
        build_claim_balance_transaction(&ctx, &claim).await,
        Err(PaymentError::Transaction(TransactionError::InvalidAccount(_)))
    ));

    let mut path = path_params(source);
    path.destination = corrupted_account();
    assert!(matches!(
        build_path_payment_transaction(&ctx, &path).await,
        Err(PaymentError::Transaction(TransactionError::InvalidAccount(_)))
    ));
    assert_eq!(network.account_loads(), 0);
}

#[tokio::test]
async fn truncated_balance_id_is_rejected_locally() {
    let claimer = account(2);
    let network = Arc::new(NullNetwork::new().with_account(&claimer, 5));
    let ctx = context(network.clone());
    let params = ClaimBalanceParams {
        claimer,
        balance_id: BalanceId::parse("00000000da0d57da").unwrap(),
    };
    assert!(matches!(
        build_claim_balance_transaction(&ctx, &params).await,
        Err(PaymentError::Transaction(TransactionError::InvalidBalanceId(_)))
    ));
    assert_eq!(network.account_loads(), 0);
}

#[tokio::test]
async fn balances_and_existence() {
    let source = account(1);
    let network = Arc::new(
        NullNetwork::new()
            .with_account(&source, 1)
            .with_balance(&source, AssetRef::Native, amt("12.5")),
    );
    let ctx = context(network);
    assert_eq!(get_account_balance(&ctx, &source, "XLM").await.unwrap(), amt("12.5"));
    assert_eq!(get_account_balance(&ctx, &source, "USDC").await.unwrap(), Amount::ZERO);
    assert!(account_exists(&ctx, &source).await.unwrap());
    assert!(!account_exists(&ctx, &account(7)).await.unwrap());
}

#[tokio::test]
async fn claimable_balances_follow_predicates() {
    let claimer = account(2);
    let open = ClaimableBalance {
        id: BalanceId::parse("aa").unwrap(),
        asset: usdc(),
        amount: amt("10"),
        sponsor: Some(account(1)),
        claimants: vec![Claimant {
            destination: claimer.clone(),
            predicate: ClaimPredicate::Not(Box::new(ClaimPredicate::BeforeAbsoluteTime(
                paylink_types::Timestamp::new(NOW - 1),
            ))),
        }],
        created_at: None,
    };
    let locked = ClaimableBalance {
        id: BalanceId::parse("bb").unwrap(),
        claimants: vec![Claimant {
            destination: claimer.clone(),
            predicate: ClaimPredicate::claimable_after(604_800),
        }],
        created_at: Some(paylink_types::Timestamp::new(NOW - 60)),
        ..open.clone()
    };
    let network = Arc::new(
        NullNetwork::new()
            .with_claimable_balance(open.clone())
            .with_claimable_balance(locked.clone()),
    );
    let ctx = context(network);

    assert_eq!(list_claimable_balances(&ctx, &claimer).await.unwrap().len(), 2);
    assert!(list_claimable_balances(&ctx, &account(5)).await.unwrap().is_empty());
    assert!(is_balance_claimable(&ctx, &open.id, &claimer).await.unwrap());
    assert!(!is_balance_claimable(&ctx, &locked.id, &claimer).await.unwrap());
    assert!(!is_balance_claimable(&ctx, &open.id, &account(5)).await.unwrap());
    assert!(matches!(
        is_balance_claimable(&ctx, &BalanceId::parse("cc").unwrap(), &claimer).await,
        Err(PaymentError::NotFound(_))
    ));
}
