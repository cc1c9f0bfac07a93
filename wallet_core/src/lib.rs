//! Network-facing half of the payment core.
//!
//! - **Builders**: direct, split, escrow create/claim and path payments;
//!   each validates locally, loads the source account, and returns an
//!   unsigned envelope
//! - **Paths**: strict-receive path quotes and slippage bounds
//! - **Bridge**: the signing-provider contract and its helpers
//! - **Settlement**: transaction lookup by hash
//! - **Balance**: account balance and claimable-balance queries

pub mod balance;
pub mod bridge;
pub mod builders;
pub mod context;
pub mod error;
pub mod intent;
pub mod paths;
pub mod settlement;

pub use balance::{account_exists, get_account_balance, is_balance_claimable, list_claimable_balances};
pub use bridge::{connect_wallet, sign_and_submit, HorizonSubmitter, WalletBridge};
pub use builders::{
    build_claim_balance_transaction, build_escrow_transaction, build_path_payment_transaction,
    build_payment_transaction, build_split_payment_transaction,
};
pub use context::PaymentContext;
pub use error::{ErrorCategory, PaymentError, WalletError};
pub use intent::{
    ClaimBalanceParams, EscrowParams, PathPaymentParams, PaymentIntent, SplitPaymentParams,
    DEFAULT_ESCROW_RELEASE_SECS,
};
pub use paths::{find_path, send_max, PathQuote, DEFAULT_SLIPPAGE_PCT};
pub use settlement::SettlementVerifier;
