// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use crate::aggregate::AggregatedRow;

/// Deterministic per-account output name over the requested date range.
pub fn csv_filename(account: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{account}_transactions_{}_to_{}.csv",
        start.format("%Y%m%d"),
        end.format("%Y%m%d")
    )
}

pub fn write_csv(rows: &[AggregatedRow], path: &Path) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("Create CSV {}", path.display()))?;
    wtr.write_record([
        "date",
        "type",
        "direction",
        "sender",
        "recipient",
        "currency",
        "amount",
    ])?;
    for row in rows {
        wtr.write_record([
            row.date.to_string(),
            row.kind.to_string(),
            row.direction.to_string(),
            row.sender.clone(),
            row.recipient.clone(),
            row.currency.to_string(),
            row.amount.normalize().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
