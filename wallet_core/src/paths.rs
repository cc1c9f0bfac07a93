//! Path resolution for cross-asset payments.

use paylink_types::{AccountId, Amount, AssetRef};
use serde::{Deserialize, Serialize};

use crate::context::PaymentContext;
use crate::error::PaymentError;

/// Slippage applied to quotes when the caller gives none, in percent.
pub const DEFAULT_SLIPPAGE_PCT: f64 = 5.0;

/// Best conversion route found for a strict-receive payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathQuote {
    /// What the sender must part with at the quoted price; zero when unavailable.
    pub source_amount: Amount,
    pub path: Vec<AssetRef>,
    /// False when no route exists. Callers must check this.
    pub available: bool,
}

impl PathQuote {
    pub fn unavailable() -> Self {
        Self {
            source_amount: Amount::ZERO,
            path: Vec::new(),
            available: false,
        }
    }
}

/// Cheapest route paying `dest_amount` of `dest_symbol` from `source_symbol`
/// held by `source_account`.
///
/// "No route" is reported through [`PathQuote::available`], not as an error.
pub async fn find_path(
    ctx: &PaymentContext,
    source_symbol: &str,
    dest_symbol: &str,
    dest_amount: Amount,
    source_account: &AccountId,
) -> Result<PathQuote, PaymentError> {
    let source_asset = ctx.registry.resolve(source_symbol)?;
    let dest_asset = ctx.registry.resolve(dest_symbol)?;

    let records = ctx
        .network
        .find_strict_receive_paths(source_account, &dest_asset, dest_amount)
        .await?;

    // records come back cheapest first
    let quote = records
        .into_iter()
        .find(|r| r.source_asset == source_asset)
        .map(|r| PathQuote {
            source_amount: r.source_amount,
            path: r.path,
            available: true,
        })
        .unwrap_or_else(PathQuote::unavailable);

    tracing::debug!(
        source = source_symbol,
        dest = dest_symbol,
        %dest_amount,
        available = quote.available,
        source_amount = %quote.source_amount,
        "path quote"
    );
    Ok(quote)
}

/// Upper bound the payer accepts: `amount × (1 + slippage_pct / 100)`,
/// rounded up to the next stroop.
pub fn send_max(amount: Amount, slippage_pct: f64) -> Result<Amount, PaymentError> {
    if !slippage_pct.is_finite() || slippage_pct < 0.0 {
        return Err(PaymentError::Invalid(paylink_types::TypesError::InvalidAmount {
            input: slippage_pct.to_string(),
            reason: "slippage must be a non-negative percentage".into(),
        }));
    }
    amount.with_margin(slippage_pct).ok_or_else(|| {
        PaymentError::Transaction(paylink_transactions::TransactionError::AmountOverflow(format!(
            "{amount} + {slippage_pct}%"
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        Amount::parse(s).unwrap()
    }

    #[test]
    fn default_slippage_is_five_percent() {
        assert_eq!(send_max(amt("100"), DEFAULT_SLIPPAGE_PCT).unwrap(), amt("105"));
    }

    #[test]
    fn send_max_rounds_up() {
        // 0.0000003 × 1.05 = 0.000000315 -> 0.0000004
        assert_eq!(send_max(amt("0.0000003"), 5.0).unwrap(), amt("0.0000004"));
        assert_eq!(send_max(amt("10"), 0.0).unwrap(), amt("10"));
    }

    #[test]
    fn negative_slippage_is_rejected() {
        assert!(send_max(amt("10"), -1.0).is_err());
        assert!(send_max(amt("10"), f64::NAN).is_err());
    }

    #[test]
    fn unavailable_quote_is_zero() {
        let q = PathQuote::unavailable();
        assert!(!q.available);
        assert!(q.source_amount.is_zero());
        assert!(q.path.is_empty());
    }
}
