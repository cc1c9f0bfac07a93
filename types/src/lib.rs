//! Fundamental types for paylink.
//!
//! This crate defines the values shared across every other crate in the workspace:
//! account ids, fixed-point amounts, asset references, memos, hashes, timestamps
//! and settlement results.

pub mod address;
pub mod amount;
pub mod asset;
pub mod error;
pub mod hash;
pub mod memo;
pub mod network;
pub mod result;
pub mod time;

pub use address::AccountId;
pub use amount::Amount;
pub use asset::AssetRef;
pub use error::TypesError;
pub use hash::{BalanceId, TxHash};
pub use memo::Memo;
pub use network::NetworkId;
pub use result::TransactionResult;
pub use time::{Clock, SystemClock, Timestamp};
