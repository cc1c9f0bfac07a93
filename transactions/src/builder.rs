//! Transaction builder: operations plus shared fee, sequence, memo and
//! validity window, assembled into one unsigned envelope.

use paylink_types::{AccountId, Memo, Timestamp};
use serde::{Deserialize, Serialize};

use crate::envelope::{SignedTransaction, TimeBounds, Transaction, TransactionEnvelope};
use crate::error::TransactionError;
use crate::operation::Operation;

/// Ledger limit on operations in one envelope.
pub const MAX_OPERATIONS: usize = 100;

/// Source account state as loaded from the network just before building.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAccount {
    pub account_id: AccountId,
    /// Current sequence number; the next transaction must use `sequence + 1`.
    pub sequence: i64,
}

impl SourceAccount {
    pub fn new(account_id: AccountId, sequence: i64) -> Self {
        Self {
            account_id,
            sequence,
        }
    }
}

/// Builder for a single transaction.
///
/// ```ignore
/// let envelope = TransactionBuilder::new(&account, net.base_fee)
///     .add_operation(op)
///     .memo(Memo::truncated("invoice 42"))
///     .set_timeout(net.timeout_secs)
///     .build(clock.now())?;
/// ```
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    source: SourceAccount,
    base_fee: u32,
    operations: Vec<Operation>,
    memo: Option<Memo>,
    timeout_secs: Option<u64>,
}

impl TransactionBuilder {
    pub fn new(source: &SourceAccount, base_fee: u32) -> Self {
        Self {
            source: source.clone(),
            base_fee,
            operations: Vec::new(),
            memo: None,
            timeout_secs: None,
        }
    }

    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn add_operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(operations);
        self
    }

    pub fn memo(mut self, memo: Option<Memo>) -> Self {
        self.memo = memo;
        self
    }

    /// Validity window measured from the `now` passed to [`build`](Self::build).
    pub fn set_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Assemble the transaction body without encoding it.
    pub fn build_transaction(self, now: Timestamp) -> Result<Transaction, TransactionError> {
        let count = self.operations.len();
        if count == 0 {
            return Err(TransactionError::NoOperations);
        }
        if count > MAX_OPERATIONS {
            return Err(TransactionError::TooManyOperations {
                count,
                limit: MAX_OPERATIONS,
            });
        }
        let timeout = self.timeout_secs.ok_or(TransactionError::MissingTimeout)?;
        let sequence = self
            .source
            .sequence
            .checked_add(1)
            .ok_or(TransactionError::SequenceOverflow(self.source.sequence))?;
        // count <= 100, so the cast is lossless
        let fee = self
            .base_fee
            .checked_mul(count as u32)
            .ok_or_else(|| TransactionError::Other(format!("fee overflow: {} x {count}", self.base_fee)))?;

        Ok(Transaction {
            source: self.source.account_id,
            fee,
            sequence,
            time_bounds: TimeBounds {
                min_time: 0,
                max_time: now.saturating_add(timeout).as_secs(),
            },
            memo: self.memo,
            operations: self.operations,
        })
    }

    /// Assemble and encode as an unsigned envelope.
    pub fn build(self, now: Timestamp) -> Result<TransactionEnvelope, TransactionError> {
        let tx = self.build_transaction(now)?;
        tracing::debug!(
            source = %tx.source,
            sequence = tx.sequence,
            operations = ?tx.operations.iter().map(Operation::kind).collect::<Vec<_>>(),
            fee = tx.fee,
            "built transaction"
        );
        SignedTransaction::unsigned(tx).to_envelope()
    }
}
