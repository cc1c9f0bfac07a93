//! Outcome of a submitted transaction.

use serde::{Deserialize, Serialize};

/// Ledger inclusion report for one submitted envelope. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionResult {
    /// Hex transaction hash as reported by the network.
    pub hash: String,
    /// Ledger sequence the transaction was included in.
    pub ledger: u32,
    pub successful: bool,
}
