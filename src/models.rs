// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use tracing::warn;

/// Synthetic counterparty for reward payouts.
pub const HIVE_REWARDS: &str = "hive.rewards";
/// Synthetic counterparty for the internal market matching engine.
pub const HIVE_MARKET: &str = "hive.market";
/// Synthetic counterparty for the staking pool.
pub const STAKED_HIVE: &str = "staked.hive";
/// Synthetic counterparty for returned delegations.
pub const DELEGATED_HIVE: &str = "delegated.hive";

pub const NAI_HIVE: &str = "@@000000021";
pub const NAI_HBD: &str = "@@000000013";
pub const NAI_VESTS: &str = "@@000000037";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Hive,
    Hbd,
    /// Hive Power: VESTS expressed in HIVE via the vesting ratio.
    Hp,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Currency::Hive => "HIVE",
            Currency::Hbd => "HBD",
            Currency::Hp => "HP",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Incoming,
    Outgoing,
    Stake,
    Unstake,
    Delegate,
    Undelegate,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
            Direction::Stake => "stake",
            Direction::Unstake => "unstake",
            Direction::Delegate => "delegate",
            Direction::Undelegate => "undelegate",
        };
        f.write_str(s)
    }
}

/// The monetary operation kinds included in exports. Non-monetary kinds
/// (votes, comments, account administration) are never queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Transfer,
    Interest,
    FillVestingWithdraw,
    CurationReward,
    ProducerReward,
    FillConvertRequest,
    Convert,
    CommentBenefactorReward,
    AuthorReward,
    FillOrder,
    ProposalPay,
    TransferToVesting,
    DelegateVestingShares,
    ReturnVestingDelegation,
}

impl OperationKind {
    pub const ALL: [OperationKind; 14] = [
        OperationKind::Transfer,
        OperationKind::Interest,
        OperationKind::FillVestingWithdraw,
        OperationKind::CurationReward,
        OperationKind::ProducerReward,
        OperationKind::FillConvertRequest,
        OperationKind::Convert,
        OperationKind::CommentBenefactorReward,
        OperationKind::AuthorReward,
        OperationKind::FillOrder,
        OperationKind::ProposalPay,
        OperationKind::TransferToVesting,
        OperationKind::DelegateVestingShares,
        OperationKind::ReturnVestingDelegation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Transfer => "transfer",
            OperationKind::Interest => "interest",
            OperationKind::FillVestingWithdraw => "fill_vesting_withdraw",
            OperationKind::CurationReward => "curation_reward",
            OperationKind::ProducerReward => "producer_reward",
            OperationKind::FillConvertRequest => "fill_convert_request",
            OperationKind::Convert => "convert",
            OperationKind::CommentBenefactorReward => "comment_benefactor_reward",
            OperationKind::AuthorReward => "author_reward",
            OperationKind::FillOrder => "fill_order",
            OperationKind::ProposalPay => "proposal_pay",
            OperationKind::TransferToVesting => "transfer_to_vesting",
            OperationKind::DelegateVestingShares => "delegate_vesting_shares",
            OperationKind::ReturnVestingDelegation => "return_vesting_delegation",
        }
    }

    pub fn parse(s: &str) -> Option<OperationKind> {
        OperationKind::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// One-line classification summary for the `kinds` listing.
    pub fn summary(self) -> &'static str {
        match self {
            OperationKind::Transfer => "incoming/outgoing by recipient, HIVE or HBD by asset",
            OperationKind::Interest => "incoming HBD interest from hive.rewards",
            OperationKind::FillVestingWithdraw => "unstake, deposited HIVE",
            OperationKind::CurationReward => "incoming HP from hive.rewards (VESTS converted)",
            OperationKind::ProducerReward => "incoming HP from hive.rewards (VESTS converted)",
            OperationKind::FillConvertRequest => "incoming HIVE from a settled conversion",
            OperationKind::Convert => "outgoing HBD into a conversion",
            OperationKind::CommentBenefactorReward => "up to HBD + HIVE + HP payouts, all incoming",
            OperationKind::AuthorReward => "up to HBD + HIVE + HP payouts, all incoming",
            OperationKind::FillOrder => "both trade legs against hive.market",
            OperationKind::ProposalPay => "incoming HBD from the proposal fund",
            OperationKind::TransferToVesting => "stake HIVE into staked.hive",
            OperationKind::DelegateVestingShares => "delegate HP between accounts",
            OperationKind::ReturnVestingDelegation => "undelegate HP from delegated.hive",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset in Hive NAI wire form: `{"amount": "500", "precision": 3, "nai": "@@000000021"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetAmount {
    pub amount: String,
    pub precision: u32,
    pub nai: String,
}

impl AssetAmount {
    pub fn new(amount: &str, precision: u32, nai: &str) -> Self {
        Self {
            amount: amount.to_string(),
            precision,
            nai: nai.to_string(),
        }
    }

    pub fn currency(&self) -> Option<Currency> {
        match self.nai.as_str() {
            NAI_HIVE => Some(Currency::Hive),
            NAI_HBD => Some(Currency::Hbd),
            _ => None,
        }
    }

    /// Amount scaled by the declared precision. Malformed numerics decode
    /// to zero and are suppressed downstream.
    pub fn to_decimal(&self) -> Decimal {
        self.amount
            .parse::<i128>()
            .ok()
            .and_then(|units| Decimal::try_from_i128_with_scale(units, self.precision).ok())
            .unwrap_or_else(|| {
                warn!(
                    "unparsable asset amount `{}` at precision {}",
                    self.amount, self.precision
                );
                Decimal::ZERO
            })
    }

    /// Unscaled share count, used for the VESTS to HIVE conversion.
    pub fn raw(&self) -> Decimal {
        match self.amount.parse::<Decimal>() {
            Ok(shares) => shares,
            Err(_) => {
                warn!("unparsable share amount `{}`", self.amount);
                Decimal::ZERO
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferPayload {
    pub from: String,
    pub to: String,
    pub amount: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterestPayload {
    pub owner: String,
    pub interest: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FillVestingWithdrawPayload {
    pub from_account: String,
    pub to_account: String,
    pub deposited: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurationRewardPayload {
    pub curator: String,
    pub reward: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProducerRewardPayload {
    pub producer: String,
    pub vesting_shares: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FillConvertRequestPayload {
    pub owner: String,
    pub amount_out: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertPayload {
    pub owner: String,
    pub amount: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentBenefactorRewardPayload {
    pub benefactor: String,
    pub hbd_payout: AssetAmount,
    pub hive_payout: AssetAmount,
    pub vesting_payout: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorRewardPayload {
    pub author: String,
    pub hbd_payout: AssetAmount,
    pub hive_payout: AssetAmount,
    pub vesting_payout: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FillOrderPayload {
    pub current_owner: String,
    pub current_pays: AssetAmount,
    pub open_owner: String,
    pub open_pays: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProposalPayPayload {
    pub payer: String,
    pub receiver: String,
    pub payment: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferToVestingPayload {
    pub from: String,
    pub amount: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DelegateVestingSharesPayload {
    pub delegator: String,
    pub delegatee: String,
    pub vesting_shares: AssetAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReturnVestingDelegationPayload {
    pub account: String,
    pub vesting_shares: AssetAmount,
}

/// One variant per operation kind, each with its own typed payload, so a
/// newly added kind is a compile error at every match site instead of a
/// silently ignored field lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Operation {
    Transfer(TransferPayload),
    Interest(InterestPayload),
    FillVestingWithdraw(FillVestingWithdrawPayload),
    CurationReward(CurationRewardPayload),
    ProducerReward(ProducerRewardPayload),
    FillConvertRequest(FillConvertRequestPayload),
    Convert(ConvertPayload),
    CommentBenefactorReward(CommentBenefactorRewardPayload),
    AuthorReward(AuthorRewardPayload),
    FillOrder(FillOrderPayload),
    ProposalPay(ProposalPayPayload),
    TransferToVesting(TransferToVestingPayload),
    DelegateVestingShares(DelegateVestingSharesPayload),
    ReturnVestingDelegation(ReturnVestingDelegationPayload),
}

impl Operation {
    /// Decode a `{type, value}` envelope. Kinds outside the supported set
    /// return `Ok(None)`: new chain operations must not break the export.
    pub fn decode(kind: &str, value: serde_json::Value) -> Result<Option<Self>, serde_json::Error> {
        if OperationKind::parse(kind).is_none() {
            return Ok(None);
        }
        serde_json::from_value(serde_json::json!({ "type": kind, "value": value })).map(Some)
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Transfer(_) => OperationKind::Transfer,
            Operation::Interest(_) => OperationKind::Interest,
            Operation::FillVestingWithdraw(_) => OperationKind::FillVestingWithdraw,
            Operation::CurationReward(_) => OperationKind::CurationReward,
            Operation::ProducerReward(_) => OperationKind::ProducerReward,
            Operation::FillConvertRequest(_) => OperationKind::FillConvertRequest,
            Operation::Convert(_) => OperationKind::Convert,
            Operation::CommentBenefactorReward(_) => OperationKind::CommentBenefactorReward,
            Operation::AuthorReward(_) => OperationKind::AuthorReward,
            Operation::FillOrder(_) => OperationKind::FillOrder,
            Operation::ProposalPay(_) => OperationKind::ProposalPay,
            Operation::TransferToVesting(_) => OperationKind::TransferToVesting,
            Operation::DelegateVestingShares(_) => OperationKind::DelegateVestingShares,
            Operation::ReturnVestingDelegation(_) => OperationKind::ReturnVestingDelegation,
        }
    }

    /// Whether the account appears on either side of the payload. Narrow
    /// range queries drop the account predicate server-side and rely on
    /// this re-filter.
    pub fn involves(&self, account: &str) -> bool {
        match self {
            Operation::Transfer(p) => p.from == account || p.to == account,
            Operation::Interest(p) => p.owner == account,
            Operation::FillVestingWithdraw(p) => {
                p.from_account == account || p.to_account == account
            }
            Operation::CurationReward(p) => p.curator == account,
            Operation::ProducerReward(p) => p.producer == account,
            Operation::FillConvertRequest(p) => p.owner == account,
            Operation::Convert(p) => p.owner == account,
            Operation::CommentBenefactorReward(p) => p.benefactor == account,
            Operation::AuthorReward(p) => p.author == account,
            Operation::FillOrder(p) => p.current_owner == account || p.open_owner == account,
            Operation::ProposalPay(p) => p.payer == account || p.receiver == account,
            Operation::TransferToVesting(p) => p.from == account,
            Operation::DelegateVestingShares(p) => {
                p.delegator == account || p.delegatee == account
            }
            Operation::ReturnVestingDelegation(p) => p.account == account,
        }
    }
}

/// A raw history record as returned by the history source. Never mutated.
#[derive(Debug, Clone)]
pub struct RawOperation {
    pub timestamp: NaiveDateTime,
    pub block: u64,
    pub op: Operation,
}

/// The normalized output unit. Invariant: `amount > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTransaction {
    pub date: NaiveDate,
    pub kind: OperationKind,
    pub direction: Direction,
    pub sender: String,
    pub recipient: String,
    pub currency: Currency,
    pub amount: Decimal,
}
