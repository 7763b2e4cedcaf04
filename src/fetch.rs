// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::warn;

use crate::models::{OperationKind, RawOperation};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history RPC transport error")]
    Transport(#[from] reqwest::Error),

    #[error("history query rejected: {0}")]
    Rejected(String),

    #[error("malformed history response")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed getting {kind} transactions for {account} even with the smallest intervals")]
    Exhausted { account: String, kind: OperationKind },
}

/// Closed timestamp interval, `start <= end`. Sub-ranges produced by
/// `tile` abut at one-second boundaries so a parent range is covered with
/// no gap and no overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl FetchRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Whole-day range over inclusive calendar dates.
    pub fn for_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(
            start.and_time(NaiveTime::MIN),
            end.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::seconds(1),
        )
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    /// Partition into consecutive sub-ranges of at most `span` each.
    pub fn tile(&self, span: Duration) -> Vec<FetchRange> {
        debug_assert!(span > Duration::zero());
        let mut out = Vec::new();
        let mut cursor = self.start;
        loop {
            let stop = (cursor + span).min(self.end);
            out.push(FetchRange::new(cursor, stop));
            if stop >= self.end {
                break;
            }
            cursor = stop + Duration::seconds(1);
        }
        out
    }
}

pub struct Rung {
    pub name: &'static str,
    pub span: Duration,
}

/// Retry granularities, coarse to fine. The upstream failure boundary is
/// data-dependent and unobservable in advance, so narrowing steps through
/// this ladder instead of estimating row counts.
pub static INTERVAL_LADDER: Lazy<[Rung; 7]> = Lazy::new(|| {
    [
        Rung { name: "yearly", span: Duration::days(366) },
        Rung { name: "half-yearly", span: Duration::days(183) },
        Rung { name: "monthly", span: Duration::days(31) },
        Rung { name: "weekly", span: Duration::days(7) },
        Rung { name: "daily", span: Duration::days(1) },
        Rung { name: "6-hour", span: Duration::hours(6) },
        Rung { name: "hourly", span: Duration::hours(1) },
    ]
});

/// Spans at or below this lose the server-side account predicate; the
/// fetcher re-filters rows client-side instead.
static ACCOUNT_FILTER_THRESHOLD: Lazy<Duration> = Lazy::new(|| Duration::days(1));

/// Bounded history query for one account and one operation kind. Narrow
/// interval retries drop the server-side account predicate; the fetcher
/// then re-filters rows client-side.
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    pub account: String,
    pub kind: OperationKind,
    account_predicate: bool,
}

impl HistoryQuery {
    pub fn new(account: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            account: account.into(),
            kind,
            account_predicate: true,
        }
    }

    pub fn without_account_predicate(&self) -> Self {
        Self {
            account_predicate: false,
            ..self.clone()
        }
    }

    pub fn has_account_predicate(&self) -> bool {
        self.account_predicate
    }
}

/// Bounded-range history provider. One call per range; retry orchestration
/// belongs to `fetch_resilient`, never to implementations.
pub trait HistorySource {
    fn fetch_range(
        &self,
        query: &HistoryQuery,
        range: &FetchRange,
    ) -> Result<Vec<RawOperation>, HistoryError>;
}

/// Fetch the full range, narrowing through the interval ladder on failure.
/// Sub-ranges run sequentially in chronological order; a sub-range failure
/// abandons the whole rung and moves to the next finer one. Exhausting the
/// ladder is fatal: a silent gap here would be undetected data loss.
pub fn fetch_resilient<H: HistorySource>(
    source: &H,
    query: &HistoryQuery,
    range: &FetchRange,
) -> Result<Vec<RawOperation>, FetchError> {
    match source.fetch_range(query, range) {
        Ok(ops) => return Ok(ops),
        Err(err) => warn!("full-range {} query failed: {err}", query.kind),
    }

    for rung in INTERVAL_LADDER.iter().filter(|rung| rung.span < range.span()) {
        println!(
            "Failed getting {} transactions. Trying {} intervals...",
            query.kind, rung.name
        );
        match fetch_tiled(source, query, range, rung) {
            Ok(ops) => return Ok(ops),
            Err(err) => warn!("{} intervals failed for {}: {err}", rung.name, query.kind),
        }
    }

    Err(FetchError::Exhausted {
        account: query.account.clone(),
        kind: query.kind,
    })
}

fn fetch_tiled<H: HistorySource>(
    source: &H,
    query: &HistoryQuery,
    range: &FetchRange,
    rung: &Rung,
) -> Result<Vec<RawOperation>, HistoryError> {
    let refilter = rung.span <= *ACCOUNT_FILTER_THRESHOLD;
    let sub_query = if refilter {
        query.without_account_predicate()
    } else {
        query.clone()
    };

    let mut out = Vec::new();
    for sub in range.tile(rung.span) {
        let mut ops = source.fetch_range(&sub_query, &sub)?;
        if refilter {
            ops.retain(|op| op.op.involves(&query.account));
        }
        out.append(&mut ops);
    }
    Ok(out)
}
