// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{
    AssetAmount, CanonicalTransaction, Currency, Direction, Operation, RawOperation,
    DELEGATED_HIVE, HIVE_MARKET, HIVE_REWARDS, STAKED_HIVE,
};
use crate::ratio::{vests_to_hive, RatioCache, RatioSource};

/// Map one raw operation to zero or more canonical transactions from the
/// perspective of `account`. VESTS-denominated amounts are converted with
/// the ratio at the operation's block; records that compute to a
/// non-positive amount are suppressed.
pub fn classify<R: RatioSource>(
    op: &RawOperation,
    account: &str,
    ratios: &mut RatioCache<'_, R>,
) -> Vec<CanonicalTransaction> {
    let mut recs: Vec<(Direction, String, String, Currency, Decimal)> = Vec::new();

    match &op.op {
        Operation::Transfer(p) => {
            if let Some(currency) = p.amount.currency() {
                let direction = if p.to == account {
                    Direction::Incoming
                } else {
                    Direction::Outgoing
                };
                recs.push((
                    direction,
                    p.from.clone(),
                    p.to.clone(),
                    currency,
                    p.amount.to_decimal(),
                ));
            } else {
                warn!("transfer at block {} carries unknown asset {}", op.block, p.amount.nai);
            }
        }

        Operation::Interest(p) => {
            if let Some(currency) = p.interest.currency() {
                recs.push((
                    Direction::Incoming,
                    HIVE_REWARDS.to_string(),
                    p.owner.clone(),
                    currency,
                    p.interest.to_decimal(),
                ));
            } else {
                warn!("interest at block {} carries unknown asset {}", op.block, p.interest.nai);
            }
        }

        Operation::FillVestingWithdraw(p) => {
            // Self-withdrawals come out of the staking pool; routed
            // withdrawals name the source account.
            let sender = if p.to_account == p.from_account {
                STAKED_HIVE.to_string()
            } else {
                p.from_account.clone()
            };
            recs.push((
                Direction::Unstake,
                sender,
                p.to_account.clone(),
                Currency::Hive,
                p.deposited.to_decimal(),
            ));
        }

        Operation::CurationReward(p) => {
            let ratio = ratios.ratio_for(op.block);
            recs.push((
                Direction::Incoming,
                HIVE_REWARDS.to_string(),
                p.curator.clone(),
                Currency::Hp,
                vests_to_hive(p.reward.raw(), ratio),
            ));
        }

        Operation::ProducerReward(p) => {
            let ratio = ratios.ratio_for(op.block);
            recs.push((
                Direction::Incoming,
                HIVE_REWARDS.to_string(),
                p.producer.clone(),
                Currency::Hp,
                vests_to_hive(p.vesting_shares.raw(), ratio),
            ));
        }

        Operation::FillConvertRequest(p) => {
            recs.push((
                Direction::Incoming,
                p.owner.clone(),
                p.owner.clone(),
                Currency::Hive,
                p.amount_out.to_decimal(),
            ));
        }

        Operation::Convert(p) => {
            recs.push((
                Direction::Outgoing,
                p.owner.clone(),
                p.owner.clone(),
                Currency::Hbd,
                p.amount.to_decimal(),
            ));
        }

        Operation::CommentBenefactorReward(p) => {
            push_payouts(
                &mut recs,
                &p.benefactor,
                &p.hbd_payout,
                &p.hive_payout,
                &p.vesting_payout,
                op.block,
                ratios,
            );
        }

        Operation::AuthorReward(p) => {
            push_payouts(
                &mut recs,
                &p.author,
                &p.hbd_payout,
                &p.hive_payout,
                &p.vesting_payout,
                op.block,
                ratios,
            );
        }

        Operation::FillOrder(p) => match (p.current_pays.currency(), p.open_pays.currency()) {
            (Some(current_ccy), Some(open_ccy)) => {
                if p.current_owner == account {
                    recs.push((
                        Direction::Outgoing,
                        p.current_owner.clone(),
                        HIVE_MARKET.to_string(),
                        current_ccy,
                        p.current_pays.to_decimal(),
                    ));
                    recs.push((
                        Direction::Incoming,
                        HIVE_MARKET.to_string(),
                        p.current_owner.clone(),
                        open_ccy,
                        p.open_pays.to_decimal(),
                    ));
                } else if p.open_owner == account {
                    recs.push((
                        Direction::Incoming,
                        HIVE_MARKET.to_string(),
                        p.open_owner.clone(),
                        current_ccy,
                        p.current_pays.to_decimal(),
                    ));
                    recs.push((
                        Direction::Outgoing,
                        p.open_owner.clone(),
                        HIVE_MARKET.to_string(),
                        open_ccy,
                        p.open_pays.to_decimal(),
                    ));
                } else {
                    warn!("fill_order at block {} does not involve {account}", op.block);
                }
            }
            _ => warn!("fill_order at block {} carries unknown assets", op.block),
        },

        Operation::ProposalPay(p) => {
            recs.push((
                Direction::Incoming,
                p.payer.clone(),
                p.receiver.clone(),
                Currency::Hbd,
                p.payment.to_decimal(),
            ));
        }

        Operation::TransferToVesting(p) => {
            recs.push((
                Direction::Stake,
                p.from.clone(),
                STAKED_HIVE.to_string(),
                Currency::Hive,
                p.amount.to_decimal(),
            ));
        }

        Operation::DelegateVestingShares(p) => {
            let ratio = ratios.ratio_for(op.block);
            recs.push((
                Direction::Delegate,
                p.delegator.clone(),
                p.delegatee.clone(),
                Currency::Hp,
                vests_to_hive(p.vesting_shares.raw(), ratio),
            ));
        }

        Operation::ReturnVestingDelegation(p) => {
            let ratio = ratios.ratio_for(op.block);
            recs.push((
                Direction::Undelegate,
                DELEGATED_HIVE.to_string(),
                p.account.clone(),
                Currency::Hp,
                vests_to_hive(p.vesting_shares.raw(), ratio),
            ));
        }
    }

    let date = op.timestamp.date();
    let kind = op.op.kind();
    recs.into_iter()
        .filter(|(_, _, _, _, amount)| *amount > Decimal::ZERO)
        .map(
            |(direction, sender, recipient, currency, amount)| CanonicalTransaction {
                date,
                kind,
                direction,
                sender,
                recipient,
                currency,
                amount,
            },
        )
        .collect()
}

/// Reward payouts split into one record per non-zero component. The VESTS
/// component only touches the ratio cache when it is non-zero.
fn push_payouts<R: RatioSource>(
    recs: &mut Vec<(Direction, String, String, Currency, Decimal)>,
    beneficiary: &str,
    hbd_payout: &AssetAmount,
    hive_payout: &AssetAmount,
    vesting_payout: &AssetAmount,
    block: u64,
    ratios: &mut RatioCache<'_, R>,
) {
    recs.push((
        Direction::Incoming,
        HIVE_REWARDS.to_string(),
        beneficiary.to_string(),
        Currency::Hbd,
        hbd_payout.to_decimal(),
    ));
    recs.push((
        Direction::Incoming,
        HIVE_REWARDS.to_string(),
        beneficiary.to_string(),
        Currency::Hive,
        hive_payout.to_decimal(),
    ));
    let shares = vesting_payout.raw();
    if shares > Decimal::ZERO {
        let ratio = ratios.ratio_for(block);
        recs.push((
            Direction::Incoming,
            HIVE_REWARDS.to_string(),
            beneficiary.to_string(),
            Currency::Hp,
            vests_to_hive(shares, ratio),
        ));
    }
}
