//! Payer-facing orchestration of one payment attempt.
//!
//! [`PaymentSession`] sequences the wallet bridge, the transaction builder
//! and the settlement verifier, and publishes a [`PaymentUiState`] the UI
//! renders. The state machine itself is the pure [`PaymentUiState::apply`].
//! Expiry is driven by [`spawn_expiry_watch`], and completed payments are
//! reported through the [`SettlementSink`] and [`PaymentNotifier`] hooks.

pub mod error;
pub mod expiry;
pub mod hooks;
pub mod session;
pub mod state;

pub use error::{CheckoutError, HookError};
pub use expiry::spawn_expiry_watch;
pub use hooks::{
    Notification, PaymentCompleted, PaymentNotifier, RetrySchedule, SettlementSink,
    PAYMENT_COMPLETED_EVENT,
};
pub use session::{PaymentRequest, PaymentSession, SessionSettings};
pub use state::{InvalidTransition, PaymentEvent, PaymentUiState};
