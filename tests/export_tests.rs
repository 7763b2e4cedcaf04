// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use tempfile::tempdir;

use hiveclip::aggregate::AggregatedRow;
use hiveclip::export::{csv_filename, write_csv};
use hiveclip::models::{Currency, Direction, OperationKind};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn filename_encodes_account_and_range() {
    let name = csv_filename("alice", date(2023, 12, 1), date(2024, 1, 1));
    assert_eq!(name, "alice_transactions_20231201_to_20240101.csv");
}

#[test]
fn csv_has_fixed_columns_and_normalized_amounts() {
    let rows = vec![
        AggregatedRow {
            date: date(2024, 1, 5),
            kind: OperationKind::Transfer,
            direction: Direction::Incoming,
            sender: "bob".to_string(),
            recipient: "alice".to_string(),
            currency: Currency::Hive,
            amount: "0.500".parse().unwrap(),
        },
        AggregatedRow {
            date: date(2024, 1, 5),
            kind: OperationKind::CurationReward,
            direction: Direction::Incoming,
            sender: "hive.rewards".to_string(),
            recipient: "alice".to_string(),
            currency: Currency::Hp,
            amount: "2.000".parse().unwrap(),
        },
    ];

    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");
    write_csv(&rows, &path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("date,type,direction,sender,recipient,currency,amount")
    );
    assert_eq!(
        lines.next(),
        Some("2024-01-05,transfer,incoming,bob,alice,HIVE,0.5")
    );
    assert_eq!(
        lines.next(),
        Some("2024-01-05,curation_reward,incoming,hive.rewards,alice,HP,2")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn empty_table_still_writes_the_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    write_csv(&[], &path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents.trim_end(),
        "date,type,direction,sender,recipient,currency,amount"
    );
}
