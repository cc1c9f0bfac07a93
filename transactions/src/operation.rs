//! Ledger operations: the individual instructions inside an envelope.

use paylink_types::{AccountId, Amount, AssetRef, BalanceId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::TransactionError;

/// One instruction inside a transaction envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Pay an exact amount of one asset.
    Payment {
        destination: AccountId,
        asset: AssetRef,
        amount: Amount,
    },
    /// Deliver exactly `dest_amount` of `dest_asset`, spending at most
    /// `send_max` of `send_asset` through the order books on `path`.
    PathPaymentStrictReceive {
        send_asset: AssetRef,
        send_max: Amount,
        destination: AccountId,
        dest_asset: AssetRef,
        dest_amount: Amount,
        path: Vec<AssetRef>,
    },
    /// Set funds aside for the listed claimants.
    CreateClaimableBalance {
        asset: AssetRef,
        amount: Amount,
        claimants: Vec<Claimant>,
    },
    /// Take a claimable balance into the source account.
    ClaimClaimableBalance { balance_id: BalanceId },
}

impl Operation {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Payment { .. } => "payment",
            Self::PathPaymentStrictReceive { .. } => "path_payment_strict_receive",
            Self::CreateClaimableBalance { .. } => "create_claimable_balance",
            Self::ClaimClaimableBalance { .. } => "claim_claimable_balance",
        }
    }

    /// Check that the operation can be encoded for the ledger: account
    /// checksums, asset codes, balance ids and list limits.
    pub fn validate(&self) -> Result<(), TransactionError> {
        crate::xdr::operation_to_xdr(self).map(|_| ())
    }

    /// Amount leaving the source account, if the operation moves funds out.
    pub fn outgoing_amount(&self) -> Option<Amount> {
        match self {
            Self::Payment { amount, .. } => Some(*amount),
            Self::PathPaymentStrictReceive { send_max, .. } => Some(*send_max),
            Self::CreateClaimableBalance { amount, .. } => Some(*amount),
            Self::ClaimClaimableBalance { .. } => None,
        }
    }
}

/// An account allowed to claim a balance, and the condition it must meet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claimant {
    pub destination: AccountId,
    pub predicate: ClaimPredicate,
}

/// Condition under which a claimant may take a claimable balance.
///
/// Relative times are measured from the close time of the ledger that
/// created the balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimPredicate {
    Unconditional,
    /// Claimable until `created_at + secs`.
    BeforeRelativeTime(u64),
    /// Claimable until the given instant.
    BeforeAbsoluteTime(Timestamp),
    Not(Box<ClaimPredicate>),
    And(Box<ClaimPredicate>, Box<ClaimPredicate>),
    Or(Box<ClaimPredicate>, Box<ClaimPredicate>),
}

impl ClaimPredicate {
    /// Claimable once `secs` have elapsed since creation.
    pub fn claimable_after(secs: u64) -> Self {
        Self::Not(Box::new(Self::BeforeRelativeTime(secs)))
    }

    /// Evaluate for a balance created at `created_at`.
    pub fn is_satisfied(&self, created_at: Timestamp, now: Timestamp) -> bool {
        match self {
            Self::Unconditional => true,
            Self::BeforeRelativeTime(secs) => now < created_at.saturating_add(*secs),
            Self::BeforeAbsoluteTime(deadline) => now < *deadline,
            Self::Not(inner) => !inner.is_satisfied(created_at, now),
            Self::And(a, b) => a.is_satisfied(created_at, now) && b.is_satisfied(created_at, now),
            Self::Or(a, b) => a.is_satisfied(created_at, now) || b.is_satisfied(created_at, now),
        }
    }

    /// The release delay when this is a plain "claimable after N seconds" predicate.
    pub fn release_after_secs(&self) -> Option<u64> {
        match self {
            Self::Not(inner) => match inner.as_ref() {
                Self::BeforeRelativeTime(secs) => Some(*secs),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK: u64 = 604_800;

    #[test]
    fn claimable_after_opens_at_release_time() {
        let created = Timestamp::new(1_000);
        let p = ClaimPredicate::claimable_after(WEEK);
        assert!(!p.is_satisfied(created, Timestamp::new(1_000)));
        assert!(!p.is_satisfied(created, Timestamp::new(1_000 + WEEK - 1)));
        assert!(p.is_satisfied(created, Timestamp::new(1_000 + WEEK)));
        assert_eq!(p.release_after_secs(), Some(WEEK));
    }

    #[test]
    fn absolute_and_combinators() {
        let created = Timestamp::new(0);
        let before = ClaimPredicate::BeforeAbsoluteTime(Timestamp::new(100));
        let after = ClaimPredicate::Not(Box::new(before.clone()));
        let both = ClaimPredicate::And(Box::new(before.clone()), Box::new(after.clone()));
        let either = ClaimPredicate::Or(Box::new(before.clone()), Box::new(after));
        assert!(before.is_satisfied(created, Timestamp::new(99)));
        assert!(!before.is_satisfied(created, Timestamp::new(100)));
        assert!(!both.is_satisfied(created, Timestamp::new(50)));
        assert!(either.is_satisfied(created, Timestamp::new(50)));
        assert!(either.is_satisfied(created, Timestamp::new(500)));
        assert!(ClaimPredicate::Unconditional.is_satisfied(created, Timestamp::new(u64::MAX)));
        assert_eq!(before.release_after_secs(), None);
    }

    #[test]
    fn outgoing_amounts() {
        let dest = AccountId::parse("GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN").unwrap();
        let ten = Amount::parse("10").unwrap();
        let pay = Operation::Payment {
            destination: dest,
            asset: AssetRef::Native,
            amount: ten,
        };
        assert_eq!(pay.outgoing_amount(), Some(ten));
        assert_eq!(pay.kind(), "payment");
        let claim = Operation::ClaimClaimableBalance {
            balance_id: BalanceId::parse("00ab").unwrap(),
        };
        assert_eq!(claim.outgoing_amount(), None);
    }

    #[test]
    fn validate_rejects_what_the_ledger_cannot_encode() {
        let good = "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN";
        let corrupted = AccountId::parse(format!("{}A", &good[..55])).unwrap();
        let pay = |destination: AccountId| Operation::Payment {
            destination,
            asset: AssetRef::Native,
            amount: Amount::parse("1").unwrap(),
        };
        assert!(pay(AccountId::parse(good).unwrap()).validate().is_ok());
        assert_eq!(
            pay(corrupted.clone()).validate(),
            Err(TransactionError::InvalidAccount(corrupted.to_string()))
        );

        let short = Operation::ClaimClaimableBalance {
            balance_id: BalanceId::parse("00ab").unwrap(),
        };
        assert!(matches!(short.validate(), Err(TransactionError::InvalidBalanceId(_))));
        let full = Operation::ClaimClaimableBalance {
            balance_id: BalanceId::parse(format!("00000000{}", "ab".repeat(32))).unwrap(),
        };
        assert!(full.validate().is_ok());
    }
}
