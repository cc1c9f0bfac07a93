//! Ledger operations and the pure half of transaction construction.
//!
//! - **Operation**: payment, strict-receive path payment, create / claim
//!   claimable balance
//! - **TransactionBuilder**: assembles operations into one envelope with a
//!   shared fee, sequence, memo and validity window
//! - **TransactionEnvelope**: base64 XDR wire form handed to signers and the network
//! - **Split**: recipient validation and amount resolution for split payments
//!
//! Nothing in this crate touches the network; loading the source account is
//! the caller's job.

pub mod builder;
pub mod envelope;
pub mod error;
pub mod operation;
pub mod split;
pub mod xdr;

pub use builder::{SourceAccount, TransactionBuilder, MAX_OPERATIONS};
pub use envelope::{DecoratedSignature, SignedTransaction, TimeBounds, Transaction, TransactionEnvelope};
pub use error::TransactionError;
pub use operation::{ClaimPredicate, Claimant, Operation};
pub use xdr::{balance_id_hash, verify_account};
pub use split::{resolve_split_amounts, validate_split, Share, SplitRecipient, SplitRecipientInput};
