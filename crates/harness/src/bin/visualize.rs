// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

use clap::Parser;
use eyre::Result;
use harness::cli::{self, VisualizeArgs};

/// Charts corpus growth, memory use and detection time from the state-overhead results.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[clap(flatten)]
    args: VisualizeArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::visualize(&cli.args)
}
