// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::fetch::{FetchRange, HistoryError, HistoryQuery, HistorySource};
use crate::models::{Operation, RawOperation};
use crate::ratio::{RatioError, RatioSource};
use crate::utils::http_client;

pub const DEFAULT_RPC_URL: &str = "https://rpc.mahdiyari.info";

const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%S";

/// Blocking JSON-RPC client for a HafSQL gateway. Serves both the history
/// and the ratio lookups; retry policy lives entirely with the callers.
pub struct HafSqlClient {
    http: reqwest::blocking::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    message: String,
}

/// One history row: a `{timestamp, block, type, value}` envelope.
#[derive(Debug, Deserialize)]
struct OpEnvelope {
    timestamp: NaiveDateTime,
    block: u64,
    #[serde(rename = "type")]
    kind: String,
    value: Value,
}

#[derive(Debug, Deserialize)]
struct GlobalProperties {
    total_vesting_fund_hive: String,
    total_vesting_shares: String,
}

impl HafSqlClient {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            url: url.trim_end_matches('/').to_string(),
        })
    }

    fn post(&self, method: &str, params: Value) -> Result<RpcResponse, reqwest::Error> {
        self.http
            .post(&self.url)
            .json(&json!({
                "jsonrpc": "2.0",
                "method": method,
                "params": params,
                "id": 1,
            }))
            .send()?
            .error_for_status()?
            .json()
    }
}

impl HistorySource for HafSqlClient {
    fn fetch_range(
        &self,
        query: &HistoryQuery,
        range: &FetchRange,
    ) -> Result<Vec<RawOperation>, HistoryError> {
        let mut params = json!({
            "kind": query.kind.as_str(),
            "from": range.start.format(TIMESTAMP_FMT).to_string(),
            "to": range.end.format(TIMESTAMP_FMT).to_string(),
        });
        if query.has_account_predicate() {
            params["account"] = json!(query.account);
        }

        let resp = self.post("hafsql.operation_history", params)?;
        if let Some(err) = resp.error {
            return Err(HistoryError::Rejected(err.message));
        }
        let result = resp
            .result
            .ok_or_else(|| HistoryError::Rejected("response carries no result".to_string()))?;
        let rows: Vec<OpEnvelope> = serde_json::from_value(result)?;

        let mut ops = Vec::with_capacity(rows.len());
        for row in rows {
            match Operation::decode(&row.kind, row.value)? {
                Some(op) => ops.push(RawOperation {
                    timestamp: row.timestamp,
                    block: row.block,
                    op,
                }),
                None => warn!(
                    "skipping unrecognized operation kind `{}` at block {}",
                    row.kind, row.block
                ),
            }
        }
        Ok(ops)
    }
}

impl RatioSource for HafSqlClient {
    fn vests_to_hive_ratio(&self, block: u64) -> Result<Decimal, RatioError> {
        let resp = self.post("hafsql.dynamic_global_properties", json!({ "block_num": block }))?;
        if let Some(err) = resp.error {
            return Err(RatioError::Malformed(err.message));
        }
        let result = resp
            .result
            .ok_or_else(|| RatioError::Malformed("response carries no result".to_string()))?;
        let rows: Vec<GlobalProperties> = serde_json::from_value(result)
            .map_err(|err| RatioError::Malformed(err.to_string()))?;
        let props = rows
            .into_iter()
            .next()
            .ok_or_else(|| RatioError::Malformed(format!("no properties row for block {block}")))?;

        let fund: Decimal = props
            .total_vesting_fund_hive
            .parse()
            .map_err(|_| RatioError::Malformed(props.total_vesting_fund_hive.clone()))?;
        let shares: Decimal = props
            .total_vesting_shares
            .parse()
            .map_err(|_| RatioError::Malformed(props.total_vesting_shares.clone()))?;
        if shares <= Decimal::ZERO {
            return Err(RatioError::Malformed(format!(
                "non-positive total_vesting_shares at block {block}"
            )));
        }
        Ok(fund / shares)
    }
}
