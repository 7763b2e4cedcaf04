// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{ensure, Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::aggregate::{aggregate, AggregatedRow};
use crate::classify::classify;
use crate::client::HafSqlClient;
use crate::export::{csv_filename, write_csv};
use crate::fetch::{fetch_resilient, FetchRange, HistoryQuery, HistorySource};
use crate::models::OperationKind;
use crate::ratio::{RatioCache, RatioSource};
use crate::utils::{parse_date, pretty_table};

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let accounts: Vec<String> = m
        .get_many::<String>("account")
        .unwrap()
        .cloned()
        .collect();
    let start = parse_date(m.get_one::<String>("start").unwrap())?;
    let end = parse_date(m.get_one::<String>("end").unwrap())?;
    ensure!(start <= end, "start date {start} is after end date {end}");
    let out_dir = PathBuf::from(m.get_one::<String>("out").unwrap());
    let preview = m.get_flag("preview");

    let client = HafSqlClient::new(m.get_one::<String>("rpc-url").unwrap())?;

    for account in &accounts {
        let path = export_account(&client, &client, account, start, end, &out_dir, preview)?;
        println!("CSV file saved as: {}", path.display());
    }
    Ok(())
}

/// One account's full pass: fetch every operation kind over the range,
/// classify, aggregate, write the CSV. A fetch that exhausts the interval
/// ladder aborts before any file is created; a truncated ledger export is
/// worse than no export.
pub fn export_account<H, R>(
    history: &H,
    ratios: &R,
    account: &str,
    start: NaiveDate,
    end: NaiveDate,
    out_dir: &Path,
    preview: bool,
) -> Result<PathBuf>
where
    H: HistorySource,
    R: RatioSource,
{
    println!("Fetching transactions for account {account}...");
    let range = FetchRange::for_dates(start, end);
    let mut cache = RatioCache::new(ratios);

    let mut canonical = Vec::new();
    for kind in OperationKind::ALL {
        let query = HistoryQuery::new(account, kind);
        let ops = fetch_resilient(history, &query, &range)
            .with_context(|| format!("Giving up on {kind} transactions for {account}"))?;
        let before = canonical.len();
        for op in &ops {
            canonical.extend(classify(op, account, &mut cache));
        }
        println!("{kind} transactions collected: {}", canonical.len() - before);
    }
    println!("Total transactions collected: {}", canonical.len());

    let rows = aggregate(canonical);
    if preview {
        print_preview(&rows);
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Create output dir {}", out_dir.display()))?;
    let path = out_dir.join(csv_filename(account, start, end));
    write_csv(&rows, &path)?;
    Ok(path)
}

fn print_preview(rows: &[AggregatedRow]) {
    let data = rows
        .iter()
        .map(|row| {
            vec![
                row.date.to_string(),
                row.kind.to_string(),
                row.direction.to_string(),
                row.sender.clone(),
                row.recipient.clone(),
                row.currency.to_string(),
                row.amount.normalize().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Type", "Direction", "Sender", "Recipient", "Currency", "Amount"],
            data
        )
    );
}
