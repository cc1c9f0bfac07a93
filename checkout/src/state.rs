//! The payment UI state machine.
//!
//! ```text
//! Pending    --WalletConnected-->   Connected
//! Connected  --PayClicked-->        Signing
//! Signing    --SignatureObtained--> Submitted
//! Submitted  --NetworkAccepted-->   Confirming
//! Confirming --LedgerConfirmed-->   Completed | Failed
//! Signing/Submitted/Confirming --StepFailed--> Failed
//! Failed     --Retry-->             Connected
//! any but Completed/Expired --DeadlineElapsed--> Expired
//! ```

use std::fmt;

use paylink_types::{AccountId, TransactionResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when the ledger reports the transaction as unsuccessful.
const LEDGER_FAILURE: &str = "The transaction failed on the ledger.";

/// What the payer sees. Exactly one per payment attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentUiState {
    #[default]
    Pending,
    Connected {
        wallet: AccountId,
    },
    Signing {
        wallet: AccountId,
    },
    Submitted {
        wallet: AccountId,
    },
    Confirming {
        wallet: AccountId,
        hash: String,
    },
    Completed {
        wallet: AccountId,
        result: TransactionResult,
    },
    Failed {
        wallet: AccountId,
        error: String,
    },
    Expired,
}

/// Inputs that drive [`PaymentUiState::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentEvent {
    WalletConnected(AccountId),
    PayClicked,
    SignatureObtained,
    NetworkAccepted { hash: String },
    LedgerConfirmed(TransactionResult),
    StepFailed(String),
    DeadlineElapsed,
    Retry,
}

impl PaymentEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::WalletConnected(_) => "wallet_connected",
            Self::PayClicked => "pay_clicked",
            Self::SignatureObtained => "signature_obtained",
            Self::NetworkAccepted { .. } => "network_accepted",
            Self::LedgerConfirmed(_) => "ledger_confirmed",
            Self::StepFailed(_) => "step_failed",
            Self::DeadlineElapsed => "deadline_elapsed",
            Self::Retry => "retry",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot apply {event} in state {from}")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub event: &'static str,
}

impl PaymentUiState {
    /// The state reached by applying `event`, or an error when the table has
    /// no such edge. `self` is left untouched either way.
    pub fn apply(&self, event: PaymentEvent) -> Result<PaymentUiState, InvalidTransition> {
        use PaymentEvent as E;
        use PaymentUiState as S;

        let next = match (self, event) {
            (s, E::DeadlineElapsed) if s.can_expire() => S::Expired,
            (S::Pending, E::WalletConnected(wallet)) => S::Connected { wallet },
            (S::Connected { wallet }, E::PayClicked) => S::Signing {
                wallet: wallet.clone(),
            },
            (S::Signing { wallet }, E::SignatureObtained) => S::Submitted {
                wallet: wallet.clone(),
            },
            (S::Submitted { wallet }, E::NetworkAccepted { hash }) => S::Confirming {
                wallet: wallet.clone(),
                hash,
            },
            (S::Confirming { wallet, .. }, E::LedgerConfirmed(result)) => {
                if result.successful {
                    S::Completed {
                        wallet: wallet.clone(),
                        result,
                    }
                } else {
                    S::Failed {
                        wallet: wallet.clone(),
                        error: LEDGER_FAILURE.to_string(),
                    }
                }
            }
            (
                S::Signing { wallet } | S::Submitted { wallet } | S::Confirming { wallet, .. },
                E::StepFailed(error),
            ) => S::Failed {
                wallet: wallet.clone(),
                error,
            },
            (S::Failed { wallet, .. }, E::Retry) => S::Connected {
                wallet: wallet.clone(),
            },
            (s, event) => {
                return Err(InvalidTransition {
                    from: s.name(),
                    event: event.name(),
                })
            }
        };
        Ok(next)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Connected { .. } => "connected",
            Self::Signing { .. } => "signing",
            Self::Submitted { .. } => "submitted",
            Self::Confirming { .. } => "confirming",
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
            Self::Expired => "expired",
        }
    }

    pub fn wallet(&self) -> Option<&AccountId> {
        match self {
            Self::Pending | Self::Expired => None,
            Self::Connected { wallet }
            | Self::Signing { wallet }
            | Self::Submitted { wallet }
            | Self::Confirming { wallet, .. }
            | Self::Completed { wallet, .. }
            | Self::Failed { wallet, .. } => Some(wallet),
        }
    }

    /// Hash of the submitted transaction, once the network has accepted it.
    pub fn tx_hash(&self) -> Option<&str> {
        match self {
            Self::Confirming { hash, .. } => Some(hash),
            Self::Completed { result, .. } => Some(&result.hash),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }

    /// Whether the deadline can still move this state to `Expired`.
    pub fn can_expire(&self) -> bool {
        !matches!(self, Self::Completed { .. } | Self::Expired)
    }

    /// No further transition can happen without a retry.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. } | Self::Expired)
    }

    /// A signature, submission or confirmation is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::Signing { .. } | Self::Submitted { .. } | Self::Confirming { .. }
        )
    }
}

impl fmt::Display for PaymentUiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
