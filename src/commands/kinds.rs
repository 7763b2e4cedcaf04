// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::models::OperationKind;
use crate::utils::pretty_table;

pub fn handle() -> Result<()> {
    let rows = OperationKind::ALL
        .iter()
        .map(|kind| vec![kind.to_string(), kind.summary().to_string()])
        .collect();
    println!("{}", pretty_table(&["Kind", "Classification"], rows));
    Ok(())
}
