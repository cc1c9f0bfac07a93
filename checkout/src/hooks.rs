//! Collaborators told about a completed payment.
//!
//! Both are fire-and-forget from the session's point of view: a failure is
//! logged and never rolls back the ledger payment.

use std::time::Duration;

use async_trait::async_trait;
use paylink_types::Amount;
use serde::{Deserialize, Serialize};

use crate::error::HookError;

/// Event name attached to completed-payment notifications.
pub const PAYMENT_COMPLETED_EVENT: &str = "payment.completed";

/// Marks a payment link or invoice as used.
#[async_trait]
pub trait SettlementSink: Send + Sync {
    async fn mark_settled(&self, link_id: &str, tx_hash: &str) -> Result<(), HookError>;
}

/// Hands notifications to the external webhook/email delivery layer.
#[async_trait]
pub trait PaymentNotifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), HookError>;
}

/// Payload of a `payment.completed` notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCompleted {
    pub link_id: String,
    pub amount: Amount,
    pub currency: String,
    pub tx_hash: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub event: String,
    pub data: PaymentCompleted,
}

impl Notification {
    pub fn payment_completed(data: PaymentCompleted) -> Self {
        Self {
            event: PAYMENT_COMPLETED_EVENT.to_string(),
            data,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "event": self.event, "data": self.data })
    }
}

/// Exponential backoff for notification delivery: `2^attempt` seconds,
/// at most `max_attempts` tries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetrySchedule {
    pub attempt: u32,
    pub max_attempts: u32,
}

impl RetrySchedule {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts,
        }
    }

    /// Delay before the current attempt.
    pub fn delay(&self) -> Duration {
        Duration::from_secs(2u64.saturating_pow(self.attempt))
    }

    /// Schedule for the following attempt, or `None` once the cap is reached.
    pub fn next(self) -> Option<Self> {
        (!self.is_exhausted()).then_some(Self {
            attempt: self.attempt + 1,
            ..self
        })
    }

    /// True when the current attempt is the last one allowed.
    pub fn is_exhausted(&self) -> bool {
        self.attempt.saturating_add(1) >= self.max_attempts
    }
}
