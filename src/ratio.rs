// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum RatioError {
    #[error("ratio RPC transport error")]
    Transport(#[from] reqwest::Error),

    #[error("ratio lookup returned no usable result: {0}")]
    Malformed(String),
}

/// Block-level VESTS to HIVE conversion ratio provider. Must be idempotent
/// for a fixed block.
pub trait RatioSource {
    fn vests_to_hive_ratio(&self, block: u64) -> Result<Decimal, RatioError>;
}

const RETRY_PAUSE: Duration = Duration::from_millis(250);

/// Memoizes the conversion ratio per block so the source is hit at most
/// once per distinct block for the lifetime of the cache. One cache is
/// owned by one account's export pass.
pub struct RatioCache<'a, R> {
    source: &'a R,
    ratios: HashMap<u64, Decimal>,
}

impl<'a, R: RatioSource> RatioCache<'a, R> {
    pub fn new(source: &'a R) -> Self {
        Self {
            source,
            ratios: HashMap::new(),
        }
    }

    /// Ratio as of the given block. Failed lookups are retried until the
    /// source answers; a failure is never cached.
    pub fn ratio_for(&mut self, block: u64) -> Decimal {
        if let Some(ratio) = self.ratios.get(&block) {
            return *ratio;
        }
        let ratio = loop {
            match self.source.vests_to_hive_ratio(block) {
                Ok(ratio) if ratio > Decimal::ZERO => break ratio,
                Ok(ratio) => warn!("non-positive vesting ratio {ratio} at block {block}, retrying"),
                Err(err) => warn!("vesting ratio lookup failed at block {block}: {err}, retrying"),
            }
            thread::sleep(RETRY_PAUSE);
        };
        self.ratios.insert(block, ratio);
        ratio
    }
}

/// VESTS share count to HIVE, mirroring the server-side
/// `hafsql.vests_to_hive` function: scale by 1/1000 and settle at the
/// chain's 3 decimal places.
pub fn vests_to_hive(shares: Decimal, ratio: Decimal) -> Decimal {
    (shares * ratio / Decimal::ONE_THOUSAND).round_dp(3)
}
