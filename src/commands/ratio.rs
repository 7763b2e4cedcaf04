// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::client::HafSqlClient;
use crate::ratio::RatioSource;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let block = *m.get_one::<u64>("block").unwrap();
    let client = HafSqlClient::new(m.get_one::<String>("rpc-url").unwrap())?;
    let ratio = client.vests_to_hive_ratio(block)?;
    println!("VESTS to HIVE ratio at block {block}: {ratio}");
    Ok(())
}
