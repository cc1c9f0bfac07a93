use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HorizonError {
    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("network unavailable: {0}")]
    Unavailable(String),

    #[error("transaction rejected: {0}")]
    SubmissionRejected(Rejection),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// The network's structured reason for refusing a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rejection {
    /// Human summary, e.g. "Transaction Failed".
    pub reason: String,
    /// Transaction-level result code, e.g. `tx_bad_seq`.
    pub transaction_code: Option<String>,
    /// One result code per operation, e.g. `op_underfunded`.
    pub operation_codes: Vec<String>,
}

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            ..Default::default()
        }
    }

    /// Stale sequence number: the envelope must be rebuilt.
    pub fn is_bad_sequence(&self) -> bool {
        self.transaction_code.as_deref() == Some("tx_bad_seq")
    }

    pub fn is_underfunded(&self) -> bool {
        self.operation_codes.iter().any(|c| c == "op_underfunded")
            || self.transaction_code.as_deref() == Some("tx_insufficient_balance")
    }

    pub fn is_missing_trustline(&self) -> bool {
        self.operation_codes.iter().any(|c| c == "op_no_trust" || c == "op_src_no_trust")
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)?;
        if let Some(code) = &self.transaction_code {
            write!(f, " ({code}")?;
            if !self.operation_codes.is_empty() {
                write!(f, ": {}", self.operation_codes.join(", "))?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_display_and_codes() {
        let r = Rejection {
            reason: "Transaction Failed".into(),
            transaction_code: Some("tx_failed".into()),
            operation_codes: vec!["op_underfunded".into()],
        };
        assert_eq!(r.to_string(), "Transaction Failed (tx_failed: op_underfunded)");
        assert!(r.is_underfunded());
        assert!(!r.is_bad_sequence());
        assert_eq!(Rejection::new("boom").to_string(), "boom");
    }
}
