//! Conversion between the transaction model and the ledger's XDR types.
//!
//! Only the shapes this crate builds are supported: v1 transaction
//! envelopes, time-bound preconditions, text memos, and the four operation
//! kinds in [`Operation`]. Anything else decodes to an encoding error.

use paylink_crypto::{decode_account_id, encode_account_id};
use paylink_types::{AccountId, Amount, AssetRef, BalanceId, Memo, Timestamp};
use stellar_xdr::curr as xdr;

use crate::envelope::{DecoratedSignature, SignedTransaction, TimeBounds, Transaction};
use crate::error::TransactionError;
use crate::operation::{ClaimPredicate, Claimant, Operation};

/// Type prefix of a v0 claimable balance id in its hex form.
const BALANCE_ID_V0_PREFIX: [u8; 4] = [0, 0, 0, 0];

impl From<xdr::Error> for TransactionError {
    fn from(e: xdr::Error) -> Self {
        Self::Encoding(e.to_string())
    }
}

fn unsupported(what: &str) -> TransactionError {
    TransactionError::Encoding(format!("unsupported {what}"))
}

/// Public key behind `account`, verifying the strkey checksum.
pub fn verify_account(account: &AccountId) -> Result<[u8; 32], TransactionError> {
    decode_account_id(account.as_str()).map_err(|_| TransactionError::InvalidAccount(account.to_string()))
}

/// The 32-byte hash inside a claimable balance id.
///
/// Accepts the network's 72-character form (type prefix included) or the
/// bare 64-character hash.
pub fn balance_id_hash(id: &BalanceId) -> Result<[u8; 32], TransactionError> {
    let invalid = || TransactionError::InvalidBalanceId(id.to_string());
    let bytes = hex::decode(id.as_str()).map_err(|_| invalid())?;
    let hash = match bytes.len() {
        36 if bytes[..4] == BALANCE_ID_V0_PREFIX => &bytes[4..],
        32 => &bytes[..],
        _ => return Err(invalid()),
    };
    let mut out = [0u8; 32];
    out.copy_from_slice(hash);
    Ok(out)
}

fn account_to_xdr(account: &AccountId) -> Result<xdr::AccountId, TransactionError> {
    let key = verify_account(account)?;
    Ok(xdr::AccountId(xdr::PublicKey::PublicKeyTypeEd25519(xdr::Uint256(key))))
}

fn account_from_xdr(account: &xdr::AccountId) -> AccountId {
    let xdr::AccountId(xdr::PublicKey::PublicKeyTypeEd25519(xdr::Uint256(key))) = account;
    encode_account_id(key)
}

fn muxed_to_xdr(account: &AccountId) -> Result<xdr::MuxedAccount, TransactionError> {
    Ok(xdr::MuxedAccount::Ed25519(xdr::Uint256(verify_account(account)?)))
}

fn muxed_from_xdr(account: &xdr::MuxedAccount) -> AccountId {
    match account {
        xdr::MuxedAccount::Ed25519(xdr::Uint256(key)) => encode_account_id(key),
        xdr::MuxedAccount::MuxedEd25519(muxed) => encode_account_id(&muxed.ed25519.0),
    }
}

fn amount_from_xdr(stroops: i64) -> Result<Amount, TransactionError> {
    Amount::from_stroops(stroops).map_err(|e| TransactionError::Encoding(e.to_string()))
}

fn secs_to_xdr(secs: u64) -> Result<i64, TransactionError> {
    i64::try_from(secs).map_err(|_| TransactionError::Encoding(format!("time {secs} out of range")))
}

fn secs_from_xdr(secs: i64) -> Result<u64, TransactionError> {
    u64::try_from(secs).map_err(|_| TransactionError::Encoding(format!("negative time {secs}")))
}

fn asset_to_xdr(asset: &AssetRef) -> Result<xdr::Asset, TransactionError> {
    let AssetRef::Issued { code, issuer } = asset else {
        return Ok(xdr::Asset::Native);
    };
    let issuer = account_to_xdr(issuer)?;
    let bytes = code.as_bytes();
    match bytes.len() {
        1..=4 => {
            let mut padded = [0u8; 4];
            padded[..bytes.len()].copy_from_slice(bytes);
            Ok(xdr::Asset::CreditAlphanum4(xdr::AlphaNum4 {
                asset_code: xdr::AssetCode4(padded),
                issuer,
            }))
        }
        5..=12 => {
            let mut padded = [0u8; 12];
            padded[..bytes.len()].copy_from_slice(bytes);
            Ok(xdr::Asset::CreditAlphanum12(xdr::AlphaNum12 {
                asset_code: xdr::AssetCode12(padded),
                issuer,
            }))
        }
        _ => Err(TransactionError::Encoding(format!("asset code {code:?}"))),
    }
}

fn asset_from_xdr(asset: &xdr::Asset) -> Result<AssetRef, TransactionError> {
    let (code, issuer) = match asset {
        xdr::Asset::Native => return Ok(AssetRef::Native),
        xdr::Asset::CreditAlphanum4(a) => (&a.asset_code.0[..], &a.issuer),
        xdr::Asset::CreditAlphanum12(a) => (&a.asset_code.0[..], &a.issuer),
    };
    let code: String = code.iter().take_while(|b| **b != 0).map(|b| char::from(*b)).collect();
    AssetRef::issued(code, account_from_xdr(issuer)).map_err(|e| TransactionError::Encoding(e.to_string()))
}

fn predicate_to_xdr(predicate: &ClaimPredicate) -> Result<xdr::ClaimPredicate, TransactionError> {
    let pair = |a: &ClaimPredicate, b: &ClaimPredicate| -> Result<xdr::VecM<xdr::ClaimPredicate, 2>, TransactionError> {
        Ok(vec![predicate_to_xdr(a)?, predicate_to_xdr(b)?].try_into()?)
    };
    Ok(match predicate {
        ClaimPredicate::Unconditional => xdr::ClaimPredicate::Unconditional,
        ClaimPredicate::BeforeRelativeTime(secs) => xdr::ClaimPredicate::BeforeRelativeTime(secs_to_xdr(*secs)?),
        ClaimPredicate::BeforeAbsoluteTime(at) => {
            xdr::ClaimPredicate::BeforeAbsoluteTime(secs_to_xdr(at.as_secs())?)
        }
        ClaimPredicate::Not(inner) => xdr::ClaimPredicate::Not(Some(Box::new(predicate_to_xdr(inner)?))),
        ClaimPredicate::And(a, b) => xdr::ClaimPredicate::And(pair(a.as_ref(), b.as_ref())?),
        ClaimPredicate::Or(a, b) => xdr::ClaimPredicate::Or(pair(a.as_ref(), b.as_ref())?),
    })
}

fn predicate_from_xdr(predicate: &xdr::ClaimPredicate) -> Result<ClaimPredicate, TransactionError> {
    type Pair = (Box<ClaimPredicate>, Box<ClaimPredicate>);
    let pair = |list: &xdr::VecM<xdr::ClaimPredicate, 2>| -> Result<Pair, TransactionError> {
        match list.as_slice() {
            [a, b] => Ok((Box::new(predicate_from_xdr(a)?), Box::new(predicate_from_xdr(b)?))),
            _ => Err(unsupported("claim predicate arity")),
        }
    };
    Ok(match predicate {
        xdr::ClaimPredicate::Unconditional => ClaimPredicate::Unconditional,
        xdr::ClaimPredicate::BeforeRelativeTime(secs) => ClaimPredicate::BeforeRelativeTime(secs_from_xdr(*secs)?),
        xdr::ClaimPredicate::BeforeAbsoluteTime(at) => {
            ClaimPredicate::BeforeAbsoluteTime(Timestamp::new(secs_from_xdr(*at)?))
        }
        xdr::ClaimPredicate::Not(Some(inner)) => ClaimPredicate::Not(Box::new(predicate_from_xdr(inner)?)),
        xdr::ClaimPredicate::Not(None) => return Err(unsupported("empty negation")),
        xdr::ClaimPredicate::And(list) => {
            let (a, b) = pair(list)?;
            ClaimPredicate::And(a, b)
        }
        xdr::ClaimPredicate::Or(list) => {
            let (a, b) = pair(list)?;
            ClaimPredicate::Or(a, b)
        }
    })
}

fn claimant_to_xdr(claimant: &Claimant) -> Result<xdr::Claimant, TransactionError> {
    Ok(xdr::Claimant::ClaimantTypeV0(xdr::ClaimantV0 {
        destination: account_to_xdr(&claimant.destination)?,
        predicate: predicate_to_xdr(&claimant.predicate)?,
    }))
}

fn claimant_from_xdr(claimant: &xdr::Claimant) -> Result<Claimant, TransactionError> {
    let xdr::Claimant::ClaimantTypeV0(v0) = claimant;
    Ok(Claimant {
        destination: account_from_xdr(&v0.destination),
        predicate: predicate_from_xdr(&v0.predicate)?,
    })
}

pub(crate) fn operation_to_xdr(operation: &Operation) -> Result<xdr::Operation, TransactionError> {
    let body = match operation {
        Operation::Payment {
            destination,
            asset,
            amount,
        } => xdr::OperationBody::Payment(xdr::PaymentOp {
            destination: muxed_to_xdr(destination)?,
            asset: asset_to_xdr(asset)?,
            amount: amount.stroops(),
        }),
        Operation::PathPaymentStrictReceive {
            send_asset,
            send_max,
            destination,
            dest_asset,
            dest_amount,
            path,
        } => xdr::OperationBody::PathPaymentStrictReceive(xdr::PathPaymentStrictReceiveOp {
            send_asset: asset_to_xdr(send_asset)?,
            send_max: send_max.stroops(),
            destination: muxed_to_xdr(destination)?,
            dest_asset: asset_to_xdr(dest_asset)?,
            dest_amount: dest_amount.stroops(),
            path: path.iter().map(asset_to_xdr).collect::<Result<Vec<_>, _>>()?.try_into()?,
        }),
        Operation::CreateClaimableBalance {
            asset,
            amount,
            claimants,
        } => xdr::OperationBody::CreateClaimableBalance(xdr::CreateClaimableBalanceOp {
            asset: asset_to_xdr(asset)?,
            amount: amount.stroops(),
            claimants: claimants
                .iter()
                .map(claimant_to_xdr)
                .collect::<Result<Vec<_>, _>>()?
                .try_into()?,
        }),
        Operation::ClaimClaimableBalance { balance_id } => {
            xdr::OperationBody::ClaimClaimableBalance(xdr::ClaimClaimableBalanceOp {
                balance_id: xdr::ClaimableBalanceId::ClaimableBalanceIdTypeV0(xdr::Hash(balance_id_hash(
                    balance_id,
                )?)),
            })
        }
    };
    Ok(xdr::Operation {
        source_account: None,
        body,
    })
}

fn operation_from_xdr(operation: &xdr::Operation) -> Result<Operation, TransactionError> {
    if operation.source_account.is_some() {
        return Err(unsupported("per-operation source account"));
    }
    Ok(match &operation.body {
        xdr::OperationBody::Payment(op) => Operation::Payment {
            destination: muxed_from_xdr(&op.destination),
            asset: asset_from_xdr(&op.asset)?,
            amount: amount_from_xdr(op.amount)?,
        },
        xdr::OperationBody::PathPaymentStrictReceive(op) => Operation::PathPaymentStrictReceive {
            send_asset: asset_from_xdr(&op.send_asset)?,
            send_max: amount_from_xdr(op.send_max)?,
            destination: muxed_from_xdr(&op.destination),
            dest_asset: asset_from_xdr(&op.dest_asset)?,
            dest_amount: amount_from_xdr(op.dest_amount)?,
            path: op.path.iter().map(asset_from_xdr).collect::<Result<_, _>>()?,
        },
        xdr::OperationBody::CreateClaimableBalance(op) => Operation::CreateClaimableBalance {
            asset: asset_from_xdr(&op.asset)?,
            amount: amount_from_xdr(op.amount)?,
            claimants: op.claimants.iter().map(claimant_from_xdr).collect::<Result<_, _>>()?,
        },
        xdr::OperationBody::ClaimClaimableBalance(op) => {
            let xdr::ClaimableBalanceId::ClaimableBalanceIdTypeV0(xdr::Hash(hash)) = &op.balance_id;
            let id = format!("{}{}", hex::encode(BALANCE_ID_V0_PREFIX), hex::encode(hash));
            Operation::ClaimClaimableBalance {
                balance_id: BalanceId::parse(id).map_err(|e| TransactionError::Encoding(e.to_string()))?,
            }
        }
        _ => return Err(unsupported("operation type")),
    })
}

pub(crate) fn transaction_to_xdr(tx: &Transaction) -> Result<xdr::Transaction, TransactionError> {
    let memo = match &tx.memo {
        Some(memo) => xdr::Memo::Text(memo.as_str().as_bytes().to_vec().try_into()?),
        None => xdr::Memo::None,
    };
    Ok(xdr::Transaction {
        source_account: muxed_to_xdr(&tx.source)?,
        fee: tx.fee,
        seq_num: xdr::SequenceNumber(tx.sequence),
        cond: xdr::Preconditions::Time(xdr::TimeBounds {
            min_time: xdr::TimePoint(tx.time_bounds.min_time),
            max_time: xdr::TimePoint(tx.time_bounds.max_time),
        }),
        memo,
        operations: tx
            .operations
            .iter()
            .map(operation_to_xdr)
            .collect::<Result<Vec<_>, _>>()?
            .try_into()?,
        ext: xdr::TransactionExt::V0,
    })
}

fn transaction_from_xdr(tx: &xdr::Transaction) -> Result<Transaction, TransactionError> {
    let time_bounds = match &tx.cond {
        xdr::Preconditions::None => TimeBounds {
            min_time: 0,
            max_time: 0,
        },
        xdr::Preconditions::Time(bounds) => TimeBounds {
            min_time: bounds.min_time.0,
            max_time: bounds.max_time.0,
        },
        xdr::Preconditions::V2(_) => return Err(unsupported("preconditions")),
    };
    let memo = match &tx.memo {
        xdr::Memo::None => None,
        xdr::Memo::Text(text) => {
            let text = String::from_utf8(text.to_vec()).map_err(|e| TransactionError::Encoding(e.to_string()))?;
            Some(Memo::new(text).map_err(|e| TransactionError::Encoding(e.to_string()))?)
        }
        _ => return Err(unsupported("memo type")),
    };
    Ok(Transaction {
        source: muxed_from_xdr(&tx.source_account),
        fee: tx.fee,
        sequence: tx.seq_num.0,
        time_bounds,
        memo,
        operations: tx.operations.iter().map(operation_from_xdr).collect::<Result<_, _>>()?,
    })
}

pub(crate) fn envelope_to_xdr(signed: &SignedTransaction) -> Result<xdr::TransactionEnvelope, TransactionError> {
    let signatures = signed
        .signatures
        .iter()
        .map(|sig| -> Result<xdr::DecoratedSignature, TransactionError> {
            Ok(xdr::DecoratedSignature {
                hint: xdr::SignatureHint(sig.hint),
                signature: xdr::Signature(sig.signature.clone().try_into()?),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(xdr::TransactionEnvelope::Tx(xdr::TransactionV1Envelope {
        tx: transaction_to_xdr(&signed.tx)?,
        signatures: signatures.try_into()?,
    }))
}

pub(crate) fn envelope_from_xdr(envelope: &xdr::TransactionEnvelope) -> Result<SignedTransaction, TransactionError> {
    let xdr::TransactionEnvelope::Tx(v1) = envelope else {
        return Err(unsupported("envelope type"));
    };
    Ok(SignedTransaction {
        tx: transaction_from_xdr(&v1.tx)?,
        signatures: v1
            .signatures
            .iter()
            .map(|sig| DecoratedSignature {
                hint: sig.hint.0,
                signature: sig.signature.0.to_vec(),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CIRCLE: &str = "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN";

    fn circle() -> AccountId {
        AccountId::parse(CIRCLE).unwrap()
    }

    #[test]
    fn corrupted_checksum_is_invalid_account() {
        let bad = AccountId::parse(format!("{}A", &CIRCLE[..55])).unwrap();
        assert_eq!(
            verify_account(&bad),
            Err(TransactionError::InvalidAccount(bad.to_string()))
        );
        assert!(verify_account(&circle()).is_ok());
    }

    #[test]
    fn asset_codes_pick_alphanum_width() {
        let usdc = AssetRef::issued("USDC", circle()).unwrap();
        let long = AssetRef::issued("LONGCODE", circle()).unwrap();
        assert!(matches!(asset_to_xdr(&usdc).unwrap(), xdr::Asset::CreditAlphanum4(_)));
        assert!(matches!(asset_to_xdr(&long).unwrap(), xdr::Asset::CreditAlphanum12(_)));
        assert_eq!(asset_from_xdr(&asset_to_xdr(&long).unwrap()).unwrap(), long);
        assert_eq!(asset_to_xdr(&AssetRef::Native).unwrap(), xdr::Asset::Native);
    }

    #[test]
    fn balance_id_accepts_prefixed_and_bare_hash() {
        let bare = "da0d57da7d4850e7fc10d2a9d0ebc731f7afb40574c03395b17d49149b91f5be";
        let prefixed = format!("00000000{bare}");
        let a = balance_id_hash(&BalanceId::parse(bare).unwrap()).unwrap();
        let b = balance_id_hash(&BalanceId::parse(prefixed).unwrap()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0], 0xda);
        assert!(balance_id_hash(&BalanceId::parse("00ab").unwrap()).is_err());
        let wrong_type = format!("00000001{bare}");
        assert!(balance_id_hash(&BalanceId::parse(wrong_type).unwrap()).is_err());
    }

    #[test]
    fn escrow_predicate_maps_to_negated_relative_time() {
        let p = ClaimPredicate::claimable_after(604_800);
        let encoded = predicate_to_xdr(&p).unwrap();
        assert_eq!(
            encoded,
            xdr::ClaimPredicate::Not(Some(Box::new(xdr::ClaimPredicate::BeforeRelativeTime(604_800))))
        );
        assert_eq!(predicate_from_xdr(&encoded).unwrap(), p);
    }

    #[test]
    fn invalid_destination_fails_operation_encoding() {
        let bad = AccountId::parse(format!("{}A", &CIRCLE[..55])).unwrap();
        let op = Operation::Payment {
            destination: bad,
            asset: AssetRef::Native,
            amount: Amount::from_units(1).unwrap(),
        };
        assert!(matches!(operation_to_xdr(&op), Err(TransactionError::InvalidAccount(_))));
    }
}
