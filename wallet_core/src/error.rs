use paylink_horizon::{HorizonError, Rejection};
use paylink_registry::RegistryError;
use paylink_transactions::TransactionError;
use paylink_types::TypesError;
use thiserror::Error;

/// Failures reported by a signing provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    #[error("no signing provider is installed")]
    ProviderMissing,

    #[error("wallet authorization was denied")]
    AuthorizationDenied,

    #[error("wallet has not been authorized")]
    NotAuthorized,

    #[error("signature request was declined")]
    UserDeclined,

    #[error("signing provider error: {0}")]
    Provider(String),

    #[error("transaction rejected: {0}")]
    SubmissionRejected(Rejection),

    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),
}

impl From<HorizonError> for WalletError {
    fn from(e: HorizonError) -> Self {
        match e {
            HorizonError::SubmissionRejected(rejection) => Self::SubmissionRejected(rejection),
            HorizonError::Unavailable(msg) => Self::NetworkUnavailable(msg),
            other => Self::Provider(other.to_string()),
        }
    }
}

/// Every error the payment operations can surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaymentError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("invalid input: {0}")]
    Invalid(#[from] TypesError),

    #[error("amount {amount} outside allowed range {min}..={max}")]
    AmountOutOfRange { amount: String, min: String, max: String },

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("no conversion path from {send} to {dest}")]
    NoPath { send: String, dest: String },

    #[error("transaction rejected: {0}")]
    SubmissionRejected(Rejection),

    #[error(transparent)]
    Wallet(WalletError),
}

impl From<HorizonError> for PaymentError {
    fn from(e: HorizonError) -> Self {
        match e {
            HorizonError::AccountNotFound(account) => Self::AccountNotFound(account),
            HorizonError::NotFound(what) => Self::NotFound(what),
            HorizonError::Unavailable(msg) => Self::NetworkUnavailable(msg),
            HorizonError::SubmissionRejected(rejection) => Self::SubmissionRejected(rejection),
            HorizonError::InvalidResponse(msg) => Self::NetworkUnavailable(format!("invalid response: {msg}")),
        }
    }
}

impl From<WalletError> for PaymentError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::SubmissionRejected(rejection) => Self::SubmissionRejected(rejection),
            WalletError::NetworkUnavailable(msg) => Self::NetworkUnavailable(msg),
            other => Self::Wallet(other),
        }
    }
}

/// Coarse grouping that decides what remediation the UI offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input; the caller must correct it. Never retried.
    Validation,
    /// Account or network state; "try again later".
    NetworkState,
    /// User choice or missing client software.
    Wallet,
    /// The ledger refused the envelope; rebuild from scratch.
    Submission,
}

impl PaymentError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Registry(_) | Self::Transaction(_) | Self::Invalid(_) | Self::AmountOutOfRange { .. } => {
                ErrorCategory::Validation
            }
            Self::AccountNotFound(_) | Self::NetworkUnavailable(_) | Self::NotFound(_) | Self::NoPath { .. } => {
                ErrorCategory::NetworkState
            }
            Self::SubmissionRejected(_) => ErrorCategory::Submission,
            Self::Wallet(_) => ErrorCategory::Wallet,
        }
    }

    /// Text shown to the payer when a payment attempt fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Registry(RegistryError::UnknownAsset(symbol)) => {
                format!("{symbol} is not a supported currency")
            }
            Self::Transaction(TransactionError::InvalidSplitConfig(reason)) => {
                format!("Invalid split configuration: {reason}")
            }
            Self::Transaction(TransactionError::SplitOverflow { .. }) => {
                "Split amounts exceed the payment total".to_string()
            }
            Self::Transaction(TransactionError::InvalidAccount(account)) => {
                format!("{account} is not a valid account address")
            }
            Self::AmountOutOfRange { min, max, .. } => {
                format!("Amount must be between {min} and {max}")
            }
            Self::Registry(_) | Self::Transaction(_) | Self::Invalid(_) => {
                format!("Invalid payment details: {self}")
            }
            Self::AccountNotFound(_) => {
                "Your account is not funded yet. Add funds and try again.".to_string()
            }
            Self::NetworkUnavailable(_) | Self::NotFound(_) => {
                "The network is unavailable. Please try again later.".to_string()
            }
            Self::NoPath { send, dest } => {
                format!("No route from {send} to {dest} is available right now.")
            }
            Self::SubmissionRejected(rejection) if rejection.is_underfunded() => {
                "Insufficient balance for this payment.".to_string()
            }
            Self::SubmissionRejected(rejection) if rejection.is_missing_trustline() => {
                "The account cannot hold this asset (missing trustline).".to_string()
            }
            Self::SubmissionRejected(rejection) if rejection.is_bad_sequence() => {
                "Your account changed while signing. Please try again.".to_string()
            }
            Self::SubmissionRejected(rejection) => {
                format!("The network rejected the payment: {rejection}")
            }
            Self::Wallet(WalletError::ProviderMissing) => {
                "No wallet extension found. Install a wallet to continue.".to_string()
            }
            Self::Wallet(WalletError::AuthorizationDenied | WalletError::NotAuthorized) => {
                "Wallet access was not granted.".to_string()
            }
            Self::Wallet(WalletError::UserDeclined) => "You declined the transaction.".to_string(),
            Self::Wallet(other) => format!("Wallet error: {other}"),
        }
    }
}
