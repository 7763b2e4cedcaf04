// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use hiveclip::{cli, commands};

fn main() -> Result<()> {
    // `RUST_LOG` overrides the INFO default, e.g. `RUST_LOG=debug hiveclip ...`
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("export", sub)) => commands::export::handle(sub)?,
        Some(("ratio", sub)) => commands::ratio::handle(sub)?,
        Some(("kinds", _)) => commands::kinds::handle()?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
