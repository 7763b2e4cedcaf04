// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

use crate::client::DEFAULT_RPC_URL;

pub fn build_cli() -> Command {
    Command::new("hiveclip")
        .version(crate_version!())
        .about("Hive account ledger export: fetch, classify, aggregate, CSV")
        .subcommand(
            Command::new("export")
                .about("Export ledger activity for one or more accounts to CSV")
                .arg(
                    Arg::new("account")
                        .long("account")
                        .short('a')
                        .action(ArgAction::Append)
                        .required(true)
                        .help("Account name (repeatable)"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .required(true)
                        .help("Start date, YYYY-MM-DD (inclusive)"),
                )
                .arg(
                    Arg::new("end")
                        .long("end")
                        .required(true)
                        .help("End date, YYYY-MM-DD (inclusive)"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .default_value(".")
                        .help("Output directory for the CSV files"),
                )
                .arg(
                    Arg::new("rpc-url")
                        .long("rpc-url")
                        .default_value(DEFAULT_RPC_URL)
                        .help("HafSQL JSON-RPC endpoint"),
                )
                .arg(
                    Arg::new("preview")
                        .long("preview")
                        .action(ArgAction::SetTrue)
                        .help("Print the aggregated table before writing"),
                ),
        )
        .subcommand(
            Command::new("ratio")
                .about("Look up the VESTS to HIVE ratio at a block")
                .arg(
                    Arg::new("block")
                        .long("block")
                        .required(true)
                        .value_parser(clap::value_parser!(u64))
                        .help("Block number"),
                )
                .arg(
                    Arg::new("rpc-url")
                        .long("rpc-url")
                        .default_value(DEFAULT_RPC_URL)
                        .help("HafSQL JSON-RPC endpoint"),
                ),
        )
        .subcommand(Command::new("kinds").about("List the operation kinds included in exports"))
}
