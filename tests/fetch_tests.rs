// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, NaiveDate};
use std::cell::Cell;

use hiveclip::fetch::{
    fetch_resilient, FetchError, FetchRange, HistoryError, HistoryQuery, HistorySource,
};
use hiveclip::models::{
    AssetAmount, Operation, OperationKind, RawOperation, TransferPayload, NAI_HIVE,
};

fn day_range(from: (i32, u32, u32), to: (i32, u32, u32)) -> FetchRange {
    FetchRange::for_dates(
        NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap(),
        NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap(),
    )
}

fn transfer_at(range: &FetchRange, to: &str) -> RawOperation {
    RawOperation {
        timestamp: range.start,
        block: 80_000_000,
        op: Operation::Transfer(TransferPayload {
            from: "faucet".to_string(),
            to: to.to_string(),
            amount: AssetAmount::new("1000", 3, NAI_HIVE),
        }),
    }
}

/// Succeeds only at or below a span threshold; one op per successful call.
struct ThresholdSource {
    max_span: Duration,
    calls: Cell<usize>,
}

impl ThresholdSource {
    fn new(max_span: Duration) -> Self {
        Self {
            max_span,
            calls: Cell::new(0),
        }
    }
}

impl HistorySource for ThresholdSource {
    fn fetch_range(
        &self,
        query: &HistoryQuery,
        range: &FetchRange,
    ) -> Result<Vec<RawOperation>, HistoryError> {
        self.calls.set(self.calls.get() + 1);
        if range.span() > self.max_span {
            return Err(HistoryError::Rejected("too many rows".to_string()));
        }
        let mut ops = vec![transfer_at(range, &query.account)];
        if !query.has_account_predicate() {
            // Narrow query forms return everyone's rows.
            ops.push(transfer_at(range, "mallory"));
        }
        Ok(ops)
    }
}

struct AlwaysFail;

impl HistorySource for AlwaysFail {
    fn fetch_range(
        &self,
        _query: &HistoryQuery,
        _range: &FetchRange,
    ) -> Result<Vec<RawOperation>, HistoryError> {
        Err(HistoryError::Rejected("statement timeout".to_string()))
    }
}

#[test]
fn tiling_covers_the_parent_exactly() {
    let range = day_range((2024, 1, 1), (2024, 1, 10));
    let tiles = range.tile(Duration::days(1));

    assert_eq!(tiles.first().unwrap().start, range.start);
    assert_eq!(tiles.last().unwrap().end, range.end);
    for pair in tiles.windows(2) {
        // Adjacent sub-ranges abut at one-second boundaries.
        assert_eq!(pair[1].start, pair[0].end + Duration::seconds(1));
    }
    for tile in &tiles {
        assert!(tile.span() <= Duration::days(1));
        assert!(tile.start <= tile.end);
    }
}

#[test]
fn degenerate_range_tiles_to_itself() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let range = FetchRange::new(start, start);
    let tiles = range.tile(Duration::hours(1));
    assert_eq!(tiles, vec![range]);
}

#[test]
fn whole_range_success_needs_a_single_call() {
    let range = day_range((2024, 1, 1), (2024, 12, 31));
    let source = ThresholdSource::new(Duration::days(400));
    let query = HistoryQuery::new("alice", OperationKind::Transfer);

    let ops = fetch_resilient(&source, &query, &range).unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(source.calls.get(), 1);
}

#[test]
fn failures_narrow_down_the_ladder_and_concatenate_in_order() {
    // Only monthly-or-smaller spans succeed: the coarser rungs fail and
    // the monthly rung covers the year.
    let range = day_range((2024, 1, 1), (2024, 12, 31));
    let source = ThresholdSource::new(Duration::days(31));
    let query = HistoryQuery::new("alice", OperationKind::Transfer);

    let ops = fetch_resilient(&source, &query, &range).unwrap();
    let expected_tiles = range.tile(Duration::days(31)).len();
    assert_eq!(ops.len(), expected_tiles);
    for pair in ops.windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp);
    }
}

#[test]
fn narrow_rungs_refilter_by_account() {
    // A three-day range forces the daily rung, whose query form drops the
    // account predicate; mallory's rows must be filtered back out.
    let range = day_range((2024, 1, 1), (2024, 1, 3));
    let source = ThresholdSource::new(Duration::days(1));
    let query = HistoryQuery::new("alice", OperationKind::Transfer);

    let ops = fetch_resilient(&source, &query, &range).unwrap();
    assert_eq!(ops.len(), 3);
    assert!(ops.iter().all(|op| op.op.involves("alice")));
    assert!(!ops.iter().any(|op| op.op.involves("mallory")));
}

#[test]
fn exhausting_the_ladder_is_fatal() {
    let range = day_range((2024, 1, 1), (2024, 12, 31));
    let query = HistoryQuery::new("alice", OperationKind::FillOrder);

    let err = fetch_resilient(&AlwaysFail, &query, &range).unwrap_err();
    assert!(matches!(
        err,
        FetchError::Exhausted { ref account, kind } if account == "alice" && kind == OperationKind::FillOrder
    ));
}
