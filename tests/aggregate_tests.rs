// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use hiveclip::aggregate::aggregate;
use hiveclip::models::{CanonicalTransaction, Currency, Direction, OperationKind};

fn tx(date: (i32, u32, u32), kind: OperationKind, amount: &str) -> CanonicalTransaction {
    CanonicalTransaction {
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        kind,
        direction: Direction::Incoming,
        sender: "hive.rewards".to_string(),
        recipient: "alice".to_string(),
        currency: Currency::Hp,
        amount: amount.parse().unwrap(),
    }
}

#[test]
fn same_key_records_sum_into_one_row() {
    let rows = aggregate(vec![
        tx((2024, 1, 5), OperationKind::CurationReward, "0.25"),
        tx((2024, 1, 5), OperationKind::CurationReward, "0.5"),
        tx((2024, 1, 5), OperationKind::CurationReward, "0.125"),
    ]);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, "0.875".parse::<Decimal>().unwrap());
}

#[test]
fn key_tuples_never_repeat_in_output() {
    let rows = aggregate(vec![
        tx((2024, 1, 5), OperationKind::CurationReward, "1"),
        tx((2024, 1, 5), OperationKind::AuthorReward, "1"),
        tx((2024, 1, 6), OperationKind::CurationReward, "1"),
        tx((2024, 1, 5), OperationKind::CurationReward, "1"),
    ]);

    assert_eq!(rows.len(), 3);
    let keys: std::collections::HashSet<_> = rows
        .iter()
        .map(|r| (r.date, r.kind, r.direction, r.sender.clone(), r.recipient.clone(), r.currency))
        .collect();
    assert_eq!(keys.len(), rows.len());
}

#[test]
fn output_is_date_ascending_with_first_occurrence_tie_order() {
    let rows = aggregate(vec![
        tx((2024, 2, 1), OperationKind::AuthorReward, "1"),
        tx((2024, 1, 5), OperationKind::ProducerReward, "1"),
        tx((2024, 2, 1), OperationKind::CurationReward, "1"),
        tx((2024, 1, 5), OperationKind::ProducerReward, "2"),
    ]);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].kind, OperationKind::ProducerReward);
    assert_eq!(rows[0].amount, "3".parse::<Decimal>().unwrap());
    // Same-date rows keep the order their keys first appeared in.
    assert_eq!(rows[1].kind, OperationKind::AuthorReward);
    assert_eq!(rows[2].kind, OperationKind::CurationReward);
}

#[test]
fn empty_input_yields_empty_output() {
    assert!(aggregate(Vec::new()).is_empty());
}
