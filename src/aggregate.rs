// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::{CanonicalTransaction, Currency, Direction, OperationKind};

/// One output row per distinct (date, kind, direction, sender, recipient,
/// currency) tuple; `amount` sums every contributing transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    pub date: NaiveDate,
    pub kind: OperationKind,
    pub direction: Direction,
    pub sender: String,
    pub recipient: String,
    pub currency: Currency,
    pub amount: Decimal,
}

type RowKey = (NaiveDate, OperationKind, Direction, String, String, Currency);

/// Group and sum canonical transactions. Output is ordered by date
/// ascending; same-date rows keep the order in which their key first
/// appeared in the input.
pub fn aggregate(records: impl IntoIterator<Item = CanonicalTransaction>) -> Vec<AggregatedRow> {
    let mut index: HashMap<RowKey, usize> = HashMap::new();
    let mut rows: Vec<AggregatedRow> = Vec::new();

    for tx in records {
        let key = (
            tx.date,
            tx.kind,
            tx.direction,
            tx.sender.clone(),
            tx.recipient.clone(),
            tx.currency,
        );
        match index.get(&key) {
            Some(&at) => rows[at].amount += tx.amount,
            None => {
                index.insert(key, rows.len());
                rows.push(AggregatedRow {
                    date: tx.date,
                    kind: tx.kind,
                    direction: tx.direction,
                    sender: tx.sender,
                    recipient: tx.recipient,
                    currency: tx.currency,
                    amount: tx.amount,
                });
            }
        }
    }

    // Stable sort: date ties keep first-occurrence order.
    rows.sort_by_key(|row| row.date);
    rows
}
