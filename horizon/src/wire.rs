//! JSON shapes of the ledger's HTTP API and their conversion into models.

use paylink_transactions::{ClaimPredicate, Claimant};
use paylink_types::{AccountId, Amount, AssetRef, BalanceId, Timestamp, TransactionResult};
use serde::Deserialize;

use crate::error::{HorizonError, Rejection};
use crate::models::{AccountInfo, Balance, ClaimableBalance, PathRecord};

fn invalid(what: &str, detail: impl std::fmt::Display) -> HorizonError {
    HorizonError::InvalidResponse(format!("{what}: {detail}"))
}

fn amount(raw: &str) -> Result<Amount, HorizonError> {
    Amount::parse(raw).map_err(|e| invalid("amount", e))
}

fn account(raw: &str) -> Result<AccountId, HorizonError> {
    AccountId::parse(raw).map_err(|e| invalid("account id", e))
}

// ── Assets ─────────────────────────────────────────────────────────────

/// `asset_type` / `asset_code` / `asset_issuer` triple.
#[derive(Debug, Deserialize)]
pub(crate) struct WireAsset {
    pub asset_type: String,
    #[serde(default)]
    pub asset_code: Option<String>,
    #[serde(default)]
    pub asset_issuer: Option<String>,
}

impl WireAsset {
    pub fn into_asset(self) -> Result<AssetRef, HorizonError> {
        asset_from_parts(&self.asset_type, self.asset_code, self.asset_issuer)
    }
}

fn asset_from_parts(
    asset_type: &str,
    code: Option<String>,
    issuer: Option<String>,
) -> Result<AssetRef, HorizonError> {
    if asset_type == "native" {
        return Ok(AssetRef::Native);
    }
    let (Some(code), Some(issuer)) = (code, issuer) else {
        return Err(invalid("asset", format!("{asset_type} without code or issuer")));
    };
    AssetRef::issued(code, account(&issuer)?).map_err(|e| invalid("asset", e))
}

/// Canonical `"native"` / `"CODE:ISSUER"` form used by claimable balances.
fn asset_from_canonical(raw: &str) -> Result<AssetRef, HorizonError> {
    if raw == "native" {
        return Ok(AssetRef::Native);
    }
    let (code, issuer) = raw
        .split_once(':')
        .ok_or_else(|| invalid("asset", raw))?;
    AssetRef::issued(code, account(issuer)?).map_err(|e| invalid("asset", e))
}

/// Query parameters describing `asset` under `prefix` (e.g. `destination_`).
pub(crate) fn asset_query(prefix: &str, asset: &AssetRef) -> Vec<(String, String)> {
    match asset {
        AssetRef::Native => vec![(format!("{prefix}asset_type"), "native".to_string())],
        AssetRef::Issued { code, issuer } => {
            let kind = if code.len() <= 4 {
                "credit_alphanum4"
            } else {
                "credit_alphanum12"
            };
            vec![
                (format!("{prefix}asset_type"), kind.to_string()),
                (format!("{prefix}asset_code"), code.clone()),
                (format!("{prefix}asset_issuer"), issuer.to_string()),
            ]
        }
    }
}

// ── Pages ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Embedded<T> {
    pub records: Vec<T>,
}

// ── Accounts ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct WireAccount {
    pub account_id: String,
    pub sequence: String,
    #[serde(default)]
    pub balances: Vec<WireBalance>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireBalance {
    pub balance: String,
    pub asset_type: String,
    #[serde(default)]
    pub asset_code: Option<String>,
    #[serde(default)]
    pub asset_issuer: Option<String>,
}

impl WireAccount {
    pub fn into_model(self) -> Result<AccountInfo, HorizonError> {
        let sequence = self
            .sequence
            .parse::<i64>()
            .map_err(|e| invalid("sequence", e))?;
        let balances = self
            .balances
            .into_iter()
            // pool shares are not payable assets
            .filter(|b| b.asset_type != "liquidity_pool_shares")
            .map(|b| {
                Ok(Balance {
                    amount: amount(&b.balance)?,
                    asset: asset_from_parts(&b.asset_type, b.asset_code, b.asset_issuer)?,
                })
            })
            .collect::<Result<_, HorizonError>>()?;
        Ok(AccountInfo {
            account_id: account(&self.account_id)?,
            sequence,
            balances,
        })
    }
}

// ── Paths ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct WirePath {
    pub source_amount: String,
    pub source_asset_type: String,
    #[serde(default)]
    pub source_asset_code: Option<String>,
    #[serde(default)]
    pub source_asset_issuer: Option<String>,
    #[serde(default)]
    pub path: Vec<WireAsset>,
}

impl WirePath {
    pub fn into_model(self) -> Result<PathRecord, HorizonError> {
        Ok(PathRecord {
            source_asset: asset_from_parts(
                &self.source_asset_type,
                self.source_asset_code,
                self.source_asset_issuer,
            )?,
            source_amount: amount(&self.source_amount)?,
            path: self
                .path
                .into_iter()
                .map(WireAsset::into_asset)
                .collect::<Result<_, _>>()?,
        })
    }
}

// ── Transactions ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct WireTransaction {
    pub hash: String,
    pub ledger: u32,
    pub successful: bool,
}

impl From<WireTransaction> for TransactionResult {
    fn from(tx: WireTransaction) -> Self {
        TransactionResult {
            hash: tx.hash,
            ledger: tx.ledger,
            successful: tx.successful,
        }
    }
}

/// Problem document returned with 4xx/5xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Problem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub extras: Option<ProblemExtras>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProblemExtras {
    #[serde(default)]
    pub result_codes: Option<ResultCodes>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResultCodes {
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub operations: Vec<String>,
}

impl Problem {
    pub fn into_rejection(self) -> Rejection {
        let codes = self.extras.and_then(|e| e.result_codes).unwrap_or_default();
        let reason = if self.title.is_empty() {
            self.detail.unwrap_or_else(|| "transaction rejected".to_string())
        } else {
            self.title
        };
        Rejection {
            reason,
            transaction_code: codes.transaction,
            operation_codes: codes.operations,
        }
    }
}

// ── Claimable balances ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct WireClaimableBalance {
    pub id: String,
    pub asset: String,
    pub amount: String,
    #[serde(default)]
    pub sponsor: Option<String>,
    #[serde(default)]
    pub claimants: Vec<WireClaimant>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireClaimant {
    pub destination: String,
    pub predicate: WirePredicate,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WirePredicate {
    #[serde(default)]
    pub unconditional: Option<bool>,
    #[serde(default)]
    pub and: Option<Vec<WirePredicate>>,
    #[serde(default)]
    pub or: Option<Vec<WirePredicate>>,
    #[serde(default)]
    pub not: Option<Box<WirePredicate>>,
    #[serde(default)]
    pub abs_before_epoch: Option<String>,
    #[serde(default)]
    pub rel_before: Option<String>,
}

impl WirePredicate {
    pub fn into_predicate(self) -> Result<ClaimPredicate, HorizonError> {
        if self.unconditional == Some(true) {
            return Ok(ClaimPredicate::Unconditional);
        }
        if let Some(inner) = self.not {
            return Ok(ClaimPredicate::Not(Box::new(inner.into_predicate()?)));
        }
        if let Some(pair) = self.and {
            let (a, b) = Self::pair(pair)?;
            return Ok(ClaimPredicate::And(Box::new(a), Box::new(b)));
        }
        if let Some(pair) = self.or {
            let (a, b) = Self::pair(pair)?;
            return Ok(ClaimPredicate::Or(Box::new(a), Box::new(b)));
        }
        if let Some(epoch) = self.abs_before_epoch {
            let secs = epoch.parse::<u64>().map_err(|e| invalid("abs_before_epoch", e))?;
            return Ok(ClaimPredicate::BeforeAbsoluteTime(Timestamp::new(secs)));
        }
        if let Some(rel) = self.rel_before {
            let secs = rel.parse::<u64>().map_err(|e| invalid("rel_before", e))?;
            return Ok(ClaimPredicate::BeforeRelativeTime(secs));
        }
        Err(invalid("predicate", "no recognised clause"))
    }

    fn pair(mut items: Vec<WirePredicate>) -> Result<(ClaimPredicate, ClaimPredicate), HorizonError> {
        if items.len() != 2 {
            return Err(invalid("predicate", format!("expected 2 clauses, got {}", items.len())));
        }
        let b = items.pop().map(WirePredicate::into_predicate);
        let a = items.pop().map(WirePredicate::into_predicate);
        match (a, b) {
            (Some(a), Some(b)) => Ok((a?, b?)),
            _ => Err(invalid("predicate", "missing clause")),
        }
    }
}

impl WireClaimableBalance {
    pub fn into_model(self) -> Result<ClaimableBalance, HorizonError> {
        let claimants = self
            .claimants
            .into_iter()
            .map(|c| {
                Ok(Claimant {
                    destination: account(&c.destination)?,
                    predicate: c.predicate.into_predicate()?,
                })
            })
            .collect::<Result<_, HorizonError>>()?;
        Ok(ClaimableBalance {
            id: BalanceId::parse(self.id).map_err(|e| invalid("balance id", e))?,
            asset: asset_from_canonical(&self.asset)?,
            amount: amount(&self.amount)?,
            sponsor: self.sponsor.as_deref().map(account).transpose()?,
            claimants,
            created_at: None,
        })
    }
}
