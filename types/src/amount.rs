//! Fixed-point ledger amounts.
//!
//! Amounts are represented as integer stroops (i64) to avoid floating-point errors.
//! One whole unit is 10^7 stroops, so every amount has exactly seven decimal places,
//! matching the ledger's own precision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Number of decimal places carried by every amount.
pub const DECIMALS: u32 = 7;

/// Stroops in one whole unit.
pub const STROOPS_PER_UNIT: i64 = 10_000_000;

/// A non-negative asset amount, stored as stroops.
///
/// Serialized as the ledger's decimal string form (`"50.0000000"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Self = Self(0);

    /// Largest representable amount (the ledger's int64 limit).
    pub const MAX: Self = Self(i64::MAX);

    pub fn from_stroops(stroops: i64) -> Result<Self, TypesError> {
        if stroops < 0 {
            return Err(TypesError::InvalidAmount {
                input: stroops.to_string(),
                reason: "amount must not be negative".into(),
            });
        }
        Ok(Self(stroops))
    }

    /// Whole units, e.g. `Amount::from_units(100)` is `100.0000000`.
    pub fn from_units(units: i64) -> Option<Self> {
        units.checked_mul(STROOPS_PER_UNIT).filter(|s| *s >= 0).map(Self)
    }

    /// Parse a decimal string with at most seven fractional digits.
    pub fn parse(input: &str) -> Result<Self, TypesError> {
        let invalid = |reason: &str| TypesError::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }
        if trimmed.starts_with('-') {
            return Err(invalid("amount must not be negative"));
        }

        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected digits before the decimal point"));
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected digits after the decimal point"));
        }
        if frac.len() > DECIMALS as usize {
            return Err(invalid("more than 7 decimal places"));
        }

        let whole: i64 = whole.parse().map_err(|_| invalid("too large"))?;
        let mut frac_stroops: i64 = 0;
        for (i, digit) in frac.bytes().enumerate() {
            frac_stroops += i64::from(digit - b'0') * 10_i64.pow(DECIMALS - 1 - i as u32);
        }

        whole
            .checked_mul(STROOPS_PER_UNIT)
            .and_then(|w| w.checked_add(frac_stroops))
            .map(Self)
            .ok_or_else(|| invalid("too large"))
    }

    pub fn stroops(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).filter(|s| *s >= 0).map(Self)
    }

    /// `self × percentage / 100`, rounded to the nearest stroop.
    pub fn percentage(self, percentage: f64) -> Option<Self> {
        let scaled = (self.0 as f64 * percentage / 100.0).round();
        if !scaled.is_finite() || scaled < 0.0 || scaled > i64::MAX as f64 {
            return None;
        }
        Some(Self(scaled as i64))
    }

    /// `self × (1 + margin_pct / 100)`, rounded up to the next stroop.
    pub fn with_margin(self, margin_pct: f64) -> Option<Self> {
        let extra = (self.0 as f64 * margin_pct / 100.0).ceil();
        if !extra.is_finite() || extra < 0.0 || extra > i64::MAX as f64 {
            return None;
        }
        self.0.checked_add(extra as i64).map(Self)
    }

    /// Lossy conversion for display and tolerance checks.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / STROOPS_PER_UNIT as f64
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:07}",
            self.0 / STROOPS_PER_UNIT,
            self.0 % STROOPS_PER_UNIT
        )
    }
}

impl FromStr for Amount {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Amount {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Amount> for String {
    fn from(a: Amount) -> Self {
        a.to_string()
    }
}
