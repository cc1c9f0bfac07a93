use paylink_wallet_core::PaymentError;
use thiserror::Error;

use crate::state::InvalidTransition;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// The step failed before the session left its current state.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The link deadline passed while the step was in flight; its result was discarded.
    #[error("payment link expired")]
    Expired,
}

/// A persistence or notification collaborator failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HookError(pub String);
