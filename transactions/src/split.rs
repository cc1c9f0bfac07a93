//! Split payments: one total divided among several recipients, paid in a
//! single envelope so the ledger applies every leg or none.

use paylink_types::{AccountId, Amount};
use serde::{Deserialize, Serialize};

use crate::builder::MAX_OPERATIONS;
use crate::error::TransactionError;
use crate::xdr::verify_account;

/// Fewest recipients a split may have.
pub const MIN_RECIPIENTS: usize = 2;

/// Allowed deviation of the percentage sum from 100.
pub const PERCENTAGE_TOLERANCE: f64 = 0.01;

/// Rounding allowance on the distributed total, in tenths of a percent.
const OVERFLOW_PER_MILLE: i128 = 1;

/// A recipient as submitted by the caller, before validation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRecipientInput {
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

/// How a recipient's part of the total is expressed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Share {
    /// Paid as-is.
    Amount(Amount),
    /// Percent of the stated total, 0 < p <= 100.
    Percentage(f64),
}

/// A validated split recipient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitRecipient {
    pub address: AccountId,
    pub description: String,
    pub share: Share,
}

impl SplitRecipientInput {
    fn share(&self) -> Option<Share> {
        if let Some(amount) = self.amount.filter(|a| !a.is_zero()) {
            return Some(Share::Amount(amount));
        }
        self.percentage
            .filter(|p| p.is_finite() && *p > 0.0 && *p <= 100.0)
            .map(Share::Percentage)
    }
}

/// Check recipient count, addresses, shares and the percentage sum.
///
/// Runs without touching the network. A recipient that gives both an amount
/// and a percentage is paid the amount; its percentage still counts toward
/// the sum.
pub fn validate_split(recipients: &[SplitRecipientInput]) -> Result<Vec<SplitRecipient>, TransactionError> {
    let invalid = |msg: String| Err(TransactionError::InvalidSplitConfig(msg));

    if recipients.len() < MIN_RECIPIENTS {
        return invalid(format!(
            "at least {MIN_RECIPIENTS} recipients required, got {}",
            recipients.len()
        ));
    }
    if recipients.len() > MAX_OPERATIONS {
        return invalid(format!(
            "at most {MAX_OPERATIONS} recipients per transaction, got {}",
            recipients.len()
        ));
    }

    let mut validated = Vec::with_capacity(recipients.len());
    for (index, input) in recipients.iter().enumerate() {
        let address = AccountId::parse(input.address.as_str())
            .ok()
            .filter(|address| verify_account(address).is_ok())
            .ok_or_else(|| TransactionError::InvalidSplitConfig(format!("invalid address: {}", input.address)))?;
        let Some(share) = input.share() else {
            return invalid(format!("recipient {index} needs an amount or a percentage"));
        };
        validated.push(SplitRecipient {
            address,
            description: input.description.clone(),
            share,
        });
    }

    if recipients.iter().any(|r| r.percentage.is_some()) {
        let sum: f64 = recipients.iter().filter_map(|r| r.percentage).sum();
        if (sum - 100.0).abs() > PERCENTAGE_TOLERANCE {
            return invalid(format!("percentages sum to {sum}%, must sum to 100%"));
        }
    }

    Ok(validated)
}

/// Resolve each recipient's share against `total`.
///
/// Percentages are taken of the full stated total, rounded to the nearest
/// stroop, even when fixed amounts are mixed in. The distributed sum may
/// exceed `total` by at most 0.1%.
pub fn resolve_split_amounts(
    recipients: &[SplitRecipient],
    total: Amount,
) -> Result<Vec<(AccountId, Amount)>, TransactionError> {
    let mut resolved = Vec::with_capacity(recipients.len());
    let mut distributed: i128 = 0;

    for recipient in recipients {
        let amount = match recipient.share {
            Share::Amount(amount) => amount,
            Share::Percentage(p) => total.percentage(p).ok_or_else(|| {
                TransactionError::AmountOverflow(format!("{p}% of {total}"))
            })?,
        };
        if amount.is_zero() {
            return Err(TransactionError::InvalidSplitConfig(format!(
                "share for {} rounds to zero",
                recipient.address
            )));
        }
        distributed += i128::from(amount.stroops());
        resolved.push((recipient.address.clone(), amount));
    }

    let cap = i128::from(total.stroops()) * (1000 + OVERFLOW_PER_MILLE);
    if distributed * 1000 > cap {
        return Err(TransactionError::SplitOverflow {
            distributed: format_stroops(distributed),
            total: total.to_string(),
        });
    }

    tracing::debug!(recipients = resolved.len(), %total, "resolved split amounts");
    Ok(resolved)
}

fn format_stroops(stroops: i128) -> String {
    let unit = i128::from(paylink_types::amount::STROOPS_PER_UNIT);
    format!("{}.{:07}", stroops / unit, stroops % unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN";

    fn by_pct(p: f64) -> SplitRecipientInput {
        SplitRecipientInput {
            address: A.into(),
            description: "share".into(),
            amount: None,
            percentage: Some(p),
        }
    }

    fn by_amount(s: &str) -> SplitRecipientInput {
        SplitRecipientInput {
            address: A.into(),
            description: "fixed".into(),
            amount: Some(Amount::parse(s).unwrap()),
            percentage: None,
        }
    }

    fn amt(s: &str) -> Amount {
        Amount::parse(s).unwrap()
    }

    #[test]
    fn sixty_forty_of_one_hundred() {
        let recipients = validate_split(&[by_pct(60.0), by_pct(40.0)]).unwrap();
        let resolved = resolve_split_amounts(&recipients, amt("100")).unwrap();
        let amounts: Vec<_> = resolved.iter().map(|(_, a)| *a).collect();
        assert_eq!(amounts, vec![amt("60.00"), amt("40.00")]);
    }

    #[test]
    fn thirds_round_to_seven_places() {
        let third = 100.0 / 3.0;
        let recipients = validate_split(&[by_pct(third), by_pct(third), by_pct(third)]).unwrap();
        let resolved = resolve_split_amounts(&recipients, amt("10")).unwrap();
        for (_, amount) in &resolved {
            assert_eq!(amount.to_string(), "3.3333333");
        }
    }

    #[test]
    fn rejects_single_recipient() {
        assert!(matches!(
            validate_split(&[by_pct(100.0)]),
            Err(TransactionError::InvalidSplitConfig(_))
        ));
    }

    #[test]
    fn rejects_too_many_recipients() {
        let many: Vec<_> = (0..101).map(|_| by_amount("1")).collect();
        assert!(matches!(
            validate_split(&many),
            Err(TransactionError::InvalidSplitConfig(msg)) if msg.contains("101")
        ));
        let hundred: Vec<_> = (0..100).map(|_| by_amount("1")).collect();
        assert_eq!(validate_split(&hundred).unwrap().len(), 100);
    }

    #[test]
    fn rejects_percentages_not_summing_to_hundred() {
        assert!(validate_split(&[by_pct(50.0), by_pct(40.0)]).is_err());
        assert!(validate_split(&[by_pct(50.0), by_pct(49.995)]).is_ok());
    }

    #[test]
    fn rejects_recipient_without_share() {
        let empty = SplitRecipientInput {
            address: A.into(),
            ..Default::default()
        };
        assert!(matches!(
            validate_split(&[by_amount("1"), empty]),
            Err(TransactionError::InvalidSplitConfig(msg)) if msg.contains("recipient 1")
        ));
    }

    #[test]
    fn rejects_bad_address() {
        let mut bad = by_pct(50.0);
        bad.address = "GNOTANADDRESS".into();
        assert!(validate_split(&[by_pct(50.0), bad]).is_err());
    }

    #[test]
    fn rejects_address_with_bad_checksum() {
        let mut bad = by_pct(50.0);
        bad.address = format!("{}A", &A[..55]);
        assert!(matches!(
            validate_split(&[by_pct(50.0), bad]),
            Err(TransactionError::InvalidSplitConfig(msg)) if msg.starts_with("invalid address")
        ));
    }

    #[test]
    fn fixed_amounts_pass_through() {
        let recipients = validate_split(&[by_amount("12.5"), by_amount("7.5")]).unwrap();
        let resolved = resolve_split_amounts(&recipients, amt("20")).unwrap();
        assert_eq!(resolved[0].1, amt("12.5"));
        assert_eq!(resolved[1].1, amt("7.5"));
    }

    #[test]
    fn fixed_amounts_exceeding_total_overflow() {
        let recipients = validate_split(&[by_amount("60"), by_amount("41")]).unwrap();
        assert!(matches!(
            resolve_split_amounts(&recipients, amt("100")),
            Err(TransactionError::SplitOverflow { distributed, .. }) if distributed == "101.0000000"
        ));
    }

    #[test]
    fn overflow_tolerance_is_one_tenth_percent() {
        let recipients = validate_split(&[by_amount("50"), by_amount("50.1")]).unwrap();
        assert!(resolve_split_amounts(&recipients, amt("100")).is_ok());
        let recipients = validate_split(&[by_amount("50"), by_amount("50.1000001")]).unwrap();
        assert!(resolve_split_amounts(&recipients, amt("100")).is_err());
    }

    #[test]
    fn mixed_shares_use_stated_total() {
        let mut both = by_amount("30");
        both.percentage = Some(50.0);
        let recipients = validate_split(&[both, by_pct(50.0)]).unwrap();
        assert_eq!(recipients[0].share, Share::Amount(amt("30")));
        let resolved = resolve_split_amounts(&recipients, amt("100")).unwrap();
        assert_eq!(resolved[1].1, amt("50"));
    }

    #[test]
    fn deserializes_wire_shape() {
        let json = r#"[
            {"address": "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN", "description": "dev", "percentage": 70},
            {"address": "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN", "description": "ops", "amount": "3.5"}
        ]"#;
        let inputs: Vec<SplitRecipientInput> = serde_json::from_str(json).unwrap();
        assert_eq!(inputs[0].percentage, Some(70.0));
        assert_eq!(inputs[1].amount, Some(amt("3.5")));
    }
}
